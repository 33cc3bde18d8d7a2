use std::sync::Arc;

use uuid::Uuid;

use crate::{
    background_task::{CleanupQueue, CleanupReason},
    entities::{
        filter::FilterCriteria,
        image::{ImageCandidate, ImageNotice},
        listing::{Listing, ListingInsert, ListingUpdate, ListingWritten, RoomForm},
        samples::sample_listings,
        session::Session,
    },
    errors::{AppError, FieldError},
    filter::FilteredView,
    images::{screen_candidates, EditPlan},
    repositories::{listing::ListingRepository, object_store::ObjectStore},
    use_cases::image_lifecycle::ImageLifecycle,
};

pub const ROOM_NOT_FOUND: &str = "Room not found";
pub const NOT_OWNER: &str = "You can only edit your own listings.";

/// Image error for a submission left without images, carrying the reason
/// each offered file was turned away.
fn no_usable_images(message: &str, notices: &[ImageNotice]) -> AppError {
    let errors = std::iter::once(message.to_string())
        .chain(notices.iter().map(ImageNotice::describe))
        .map(|message| FieldError { field: "images".to_string(), message })
        .collect();

    AppError::ValidationError(errors)
}

pub struct ListingHandler<R, S>
where
    R: ListingRepository,
    S: ObjectStore + ?Sized,
{
    pub listing_repo: R,
    pub images: ImageLifecycle<S>,
    pub sample_fallback: bool,
}

impl<R, S> ListingHandler<R, S>
where
    R: ListingRepository,
    S: ObjectStore + ?Sized,
{
    pub fn new(
        listing_repo: R,
        store: Arc<S>,
        cleanup: CleanupQueue,
        max_images: usize,
        sample_fallback: bool,
    ) -> Self {
        ListingHandler {
            listing_repo,
            images: ImageLifecycle::new(store, cleanup, max_images),
            sample_fallback,
        }
    }

    /// Available listings narrowed by `criteria`, newest first.
    pub async fn browse(&self, criteria: FilterCriteria) -> Result<Vec<Listing>, AppError> {
        let mut listings = self.listing_repo.list_available().await?;

        if listings.is_empty() && self.sample_fallback {
            tracing::debug!("No listings stored, serving sample listings");
            listings = sample_listings();
        }

        Ok(FilteredView::new(listings, criteria).into_visible())
    }

    /// Retrieves a listing by its ID. Sample listings resolve too while the
    /// sample fallback is on, so browsed samples can be opened.
    pub async fn get_listing(&self, id: &Uuid) -> Result<Listing, AppError> {
        if let Some(listing) = self.listing_repo.get_listing(id).await? {
            return Ok(listing);
        }

        self.sample_fallback
            .then(|| sample_listings().into_iter().find(|sample| sample.id == *id))
            .flatten()
            .ok_or_else(|| AppError::NotFound(ROOM_NOT_FOUND.to_string()))
    }

    /// Every listing owned by the session's user, whatever its availability
    pub async fn my_listings(&self, session: &Session) -> Result<Vec<Listing>, AppError> {
        self.listing_repo.list_by_owner(&session.user_id).await
    }

    /// Creates a listing owned by the session's user.
    ///
    /// Nothing is uploaded unless at least one offered image is accepted,
    /// and no row is written unless every upload succeeded.
    pub async fn create_listing(
        &self,
        session: &Session,
        form: RoomForm,
        candidates: Vec<ImageCandidate>,
    ) -> Result<ListingWritten, AppError> {
        let form = form.normalized()?;
        let intake = screen_candidates(candidates, 0, self.images.max_images);

        if intake.accepted.is_empty() {
            return Err(no_usable_images("Please upload at least one image", &intake.notices));
        }

        let stored = self.images.upload_all(&session.user_id, intake.accepted).await?;

        let insert = ListingInsert {
            owner_id: session.user_id,
            form,
            images: stored.iter().map(|s| s.url.clone()).collect(),
        };

        match self.listing_repo.insert_listing(&insert).await {
            Ok(listing) => {
                tracing::info!(listing_id = %listing.id, images = listing.images.len(), "Listing created");
                Ok(ListingWritten { listing, notices: intake.notices })
            }
            Err(e) => {
                self.images.release_stored(&stored, CleanupReason::SubmissionAborted);
                Err(e)
            }
        }
    }

    /// Applies an edit: field changes, removal of stored images and new
    /// uploads. Removed images are released only after the row is updated.
    pub async fn update_listing(
        &self,
        session: &Session,
        id: &Uuid,
        form: RoomForm,
        removals: Vec<String>,
        candidates: Vec<ImageCandidate>,
    ) -> Result<ListingWritten, AppError> {
        let current = self.owned_listing(session, id).await?;
        let form = form.normalized()?;

        let plan = EditPlan::new(&current.images, &removals);
        if !plan.ignored.is_empty() {
            tracing::warn!(listing_id = %id, ignored = ?plan.ignored, "Ignoring removal of images not on this listing");
        }

        let intake = screen_candidates(candidates, plan.kept.len(), self.images.max_images);
        if plan.kept.is_empty() && intake.accepted.is_empty() {
            return Err(no_usable_images("Please keep at least one image or upload new ones", &intake.notices));
        }

        let stored = self.images.upload_all(&session.user_id, intake.accepted).await?;
        let update = ListingUpdate {
            form,
            images: plan.final_images(stored.iter().map(|s| s.url.clone())),
        };

        let updated = match self.listing_repo.update_listing(id, &session.user_id, &update).await {
            Ok(Some(listing)) => listing,
            Ok(None) => {
                self.images.release_stored(&stored, CleanupReason::SubmissionAborted);
                return Err(AppError::NotFound(ROOM_NOT_FOUND.to_string()));
            }
            Err(e) => {
                self.images.release_stored(&stored, CleanupReason::SubmissionAborted);
                return Err(e);
            }
        };

        self.images.release_urls(&plan.removed, CleanupReason::RemovedFromListing);
        tracing::info!(listing_id = %id, removed = plan.removed.len(), added = stored.len(), "Listing updated");

        Ok(ListingWritten { listing: updated, notices: intake.notices })
    }

    /// Flips the availability flag of an owned listing.
    pub async fn toggle_availability(&self, session: &Session, id: &Uuid) -> Result<Listing, AppError> {
        self.owned_listing(session, id).await?;

        self.listing_repo
            .toggle_availability(id, &session.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(ROOM_NOT_FOUND.to_string()))
    }

    /// Deletes an owned listing. Its images are queued for release first;
    /// failures there never block the row deletion.
    pub async fn delete_listing(&self, session: &Session, id: &Uuid) -> Result<(), AppError> {
        let listing = self.owned_listing(session, id).await?;

        self.images.release_urls(&listing.images, CleanupReason::ListingDeleted);

        if !self.listing_repo.delete_listing(id, &session.user_id).await? {
            return Err(AppError::NotFound(ROOM_NOT_FOUND.to_string()));
        }

        tracing::info!(listing_id = %id, "Listing deleted");
        Ok(())
    }

    async fn owned_listing(&self, session: &Session, id: &Uuid) -> Result<Listing, AppError> {
        let listing = self.get_listing(id).await?;

        if !listing.is_owned_by(&session.user_id) {
            tracing::warn!(listing_id = %id, user_id = %session.user_id, "Rejected write to listing owned by someone else");
            return Err(AppError::ForbiddenAccess(NOT_OWNER.to_string()));
        }

        Ok(listing)
    }
}
