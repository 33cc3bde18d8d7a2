use actix_multipart::form::{json::JsonConfig as MultipartJsonConfig, MultipartFormConfig};
use actix_web::{error::QueryPayloadError, web};

use crate::errors::AppError;

/// Upper bound for a whole listing submission.
pub const MAX_SUBMISSION_BYTES: usize = 64 * 1024 * 1024;
const MAX_IN_MEMORY_BYTES: usize = 2 * 1024 * 1024;

/// Renders extractor failures in the API's JSON error shape.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::InvalidInput(format!("JSON payload error: {}", err)).into()
    }));

    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let message = match err {
            QueryPayloadError::Deserialize(e) => e.to_string(),
            other => other.to_string(),
        };
        AppError::InvalidInput(format!("Query string error: {}", message)).into()
    }));

    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::InvalidInput(format!("Path error: {}", err)).into()
    }));

    cfg.app_data(
        MultipartFormConfig::default()
            .total_limit(MAX_SUBMISSION_BYTES)
            .memory_limit(MAX_IN_MEMORY_BYTES)
            .error_handler(|err, _req| AppError::from(err).into()),
    );

    // Browsers send the `listing` part of a FormData body without a content type.
    cfg.app_data(MultipartJsonConfig::default().validate_content_type(false));
}
