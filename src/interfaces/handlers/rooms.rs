use actix_multipart::form::{json::Json as MpJson, tempfile::TempFile, MultipartForm};
use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{
        filter::{FilterCriteria, FilterOptions, FilterQuery},
        listing::{ListingDetails, RoomForm},
    },
    errors::AppError,
    use_cases::extractors::{CurrentUser, MaybeUser},
    utils::{contact_links::contact_links, uploads::into_candidates, valid_uuid::valid_uuid},
    AppState,
};

/// New listing: the fields as a JSON part plus the selected images.
///
/// Image parts are bounded only by the submission limit; oversized files are
/// spooled and then turned away one by one during screening.
#[derive(Debug, MultipartForm)]
pub struct RoomUploadForm {
    pub listing: MpJson<RoomForm>,
    pub images: Vec<TempFile>,
}

/// Listing edit: replacement fields, stored image URLs to drop and new images.
#[derive(Debug, MultipartForm)]
pub struct RoomEditForm {
    pub listing: MpJson<RoomForm>,
    pub remove_images: Option<MpJson<Vec<String>>>,
    pub images: Vec<TempFile>,
}

#[instrument(skip(state, query))]
pub async fn browse_rooms(
    state: web::Data<AppState>,
    query: web::Query<FilterQuery>,
) -> Result<impl Responder, AppError> {
    let criteria = FilterCriteria::from(&query.into_inner());
    let listings = state.listings.browse(criteria).await?;

    Ok(HttpResponse::Ok().json(listings))
}

pub async fn filter_options() -> impl Responder {
    HttpResponse::Ok().json(FilterOptions::catalog())
}

#[instrument(skip(state, user))]
pub async fn get_room(
    room_id: web::Path<String>,
    state: web::Data<AppState>,
    user: MaybeUser,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&room_id)?;
    let listing = state.listings.get_listing(&id).await?;

    let is_owner = user.0.is_some_and(|session| listing.is_owned_by(&session.user_id));
    let details = ListingDetails {
        cover_image: listing.cover_image().map(str::to_string),
        contact_links: contact_links(&listing),
        is_owner,
        listing,
    };

    Ok(HttpResponse::Ok().json(details))
}

#[instrument(skip(user, state, form), fields(user_id = %user.0.user_id))]
pub async fn create_room(
    user: CurrentUser,
    state: web::Data<AppState>,
    form: MultipartForm<RoomUploadForm>,
) -> Result<impl Responder, AppError> {
    let form = form.into_inner();
    let candidates = into_candidates(form.images).await?;

    let written = state
        .listings
        .create_listing(&user.0, form.listing.into_inner(), candidates)
        .await?;

    Ok(HttpResponse::Created().json(written))
}

#[instrument(skip(user, state, form), fields(user_id = %user.0.user_id))]
pub async fn update_room(
    user: CurrentUser,
    room_id: web::Path<String>,
    state: web::Data<AppState>,
    form: MultipartForm<RoomEditForm>,
) -> Result<impl Responder, AppError> {
    let form = form.into_inner();
    let id = valid_uuid(&room_id)?;
    let removals = form.remove_images.map(|r| r.into_inner()).unwrap_or_default();
    let candidates = into_candidates(form.images).await?;

    let written = state
        .listings
        .update_listing(&user.0, &id, form.listing.into_inner(), removals, candidates)
        .await?;

    Ok(HttpResponse::Ok().json(written))
}

#[instrument(skip(user, state), fields(user_id = %user.0.user_id))]
pub async fn toggle_availability(
    user: CurrentUser,
    room_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&room_id)?;
    let listing = state.listings.toggle_availability(&user.0, &id).await?;

    Ok(HttpResponse::Ok().json(listing))
}

#[instrument(skip(user, state), fields(user_id = %user.0.user_id))]
pub async fn delete_room(
    user: CurrentUser,
    room_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&room_id)?;
    state.listings.delete_listing(&user.0, &id).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(user, state), fields(user_id = %user.0.user_id))]
pub async fn my_rooms(
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let listings = state.listings.my_listings(&user.0).await?;
    Ok(HttpResponse::Ok().json(listings))
}
