use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    background_task::{CleanupQueue, CleanupReason},
    entities::image::{AcceptedImage, StoredImage},
    errors::AppError,
    images::{object_key, random_token},
    repositories::object_store::ObjectStore,
};

/// Uploads and releases the stored images of listings.
pub struct ImageLifecycle<S>
where
    S: ObjectStore + ?Sized,
{
    pub store: Arc<S>,
    pub cleanup: CleanupQueue,
    pub max_images: usize,
}

impl<S> ImageLifecycle<S>
where
    S: ObjectStore + ?Sized,
{
    pub fn new(store: Arc<S>, cleanup: CleanupQueue, max_images: usize) -> Self {
        ImageLifecycle { store, cleanup, max_images }
    }

    /// Uploads every image in order. On the first failure the images already
    /// stored by this call are released and the error is returned.
    pub async fn upload_all(
        &self,
        owner_id: &Uuid,
        images: Vec<AcceptedImage>,
    ) -> Result<Vec<StoredImage>, AppError> {
        let mut stored = Vec::with_capacity(images.len());

        for image in images {
            let key = object_key(owner_id, &image, Utc::now(), &random_token());
            let content_type = image.kind.mime_type();

            if let Err(e) = self.store.upload(&key, image.data, content_type).await {
                tracing::warn!(%key, file_name = %image.file_name, "Image upload failed: {}", e);
                self.release_stored(&stored, CleanupReason::SubmissionAborted);
                return Err(e.into());
            }

            let url = self.store.public_url(&key);
            stored.push(StoredImage { key, url });
        }

        Ok(stored)
    }

    /// Queues removal of objects stored by an aborted submission.
    pub fn release_stored(&self, stored: &[StoredImage], reason: CleanupReason) {
        for image in stored {
            self.cleanup.release(image.key.clone(), reason);
        }
    }

    /// Queues removal of the objects behind public URLs. URLs this store
    /// cannot map to a key are skipped.
    pub fn release_urls(&self, urls: &[String], reason: CleanupReason) {
        for url in urls {
            match self.store.key_for_url(url) {
                Some(key) => self.cleanup.release(key, reason),
                None => tracing::warn!(%url, "Image URL is not managed by the object store, skipping delete"),
            }
        }
    }
}
