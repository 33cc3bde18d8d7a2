pub mod home;
pub mod rooms;
pub mod session;
pub mod system;
