pub mod extractors;
pub mod image_lifecycle;
pub mod listings;
pub mod session;
