pub mod filter;
pub mod image;
pub mod listing;
pub mod samples;
pub mod session;
