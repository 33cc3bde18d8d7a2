use actix_multipart::form::tempfile::TempFile;

use crate::{
    entities::image::{ImageCandidate, MAX_IMAGE_BYTES},
    errors::AppError,
};

/// Reads spooled multipart files into image candidates, in upload order.
///
/// Files over the size limit are not read; they keep their reported size so
/// screening can turn them into a notice.
pub async fn into_candidates(files: Vec<TempFile>) -> Result<Vec<ImageCandidate>, AppError> {
    let mut candidates = Vec::with_capacity(files.len());

    for file in files {
        let file_name = file.file_name.clone().unwrap_or_else(|| "image".to_string());
        let content_type = file.content_type.as_ref().map(|mime| mime.essence_str().to_string());

        let data = if file.size <= MAX_IMAGE_BYTES {
            tokio::fs::read(file.file.path()).await.map_err(|e| {
                tracing::error!(%file_name, "Failed to read spooled upload: {}", e);
                AppError::InternalError("Failed to read uploaded file".into())
            })?
        } else {
            Vec::new()
        };

        candidates.push(ImageCandidate {
            file_name,
            content_type,
            size: file.size,
            data,
        });
    }

    Ok(candidates)
}
