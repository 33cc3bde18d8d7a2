use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    errors::AuthError,
    use_cases::extractors::{bearer_token, CurrentUser},
    AppState,
};

#[instrument(skip(req, user, state), fields(user_id = %user.0.user_id))]
pub async fn sign_out(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<impl Responder, AuthError> {
    let token = bearer_token(&req).ok_or(AuthError::MissingCredentials)?;
    let signed_out = state.sessions.sign_out(&token, &user.0).await?;

    Ok(HttpResponse::Ok().json(signed_out))
}
