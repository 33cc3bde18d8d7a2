pub mod listing;
pub mod object_store;
pub mod sqlx_repo;
pub mod token;
