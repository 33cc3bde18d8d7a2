use uuid::Uuid;

use crate::errors::AppError;

/// Parses a listing id taken from a request path.
pub fn valid_uuid(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim())
        .map_err(|_| AppError::InvalidInput(format!("'{}' is not a valid room id", id)))
}
