pub mod entities;
pub mod filter;
pub mod images;
pub mod use_cases;
