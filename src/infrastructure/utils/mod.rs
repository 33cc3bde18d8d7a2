pub mod contact_links;
pub mod uploads;
pub mod valid_uuid;
