use chrono::Utc;
use redis::{AsyncCommands, Client as RedisClient};

use crate::{
    entities::session::{Session, SignedOut},
    errors::AuthError,
    repositories::token::TokenVerifier,
};

const REVOKED_PREFIX: &str = "revoked";

pub struct SessionHandler<T>
where
    T: TokenVerifier,
{
    pub token_service: T,
    pub redis_client: Option<RedisClient>,
}

impl<T> SessionHandler<T>
where
    T: TokenVerifier,
{
    pub fn new(token_service: T, redis_client: Option<RedisClient>) -> Self {
        SessionHandler { token_service, redis_client }
    }

    /// Resolves a bearer token into the session it identifies
    pub async fn authenticate(&self, token: &str) -> Result<Session, AuthError> {
        let claims = self.token_service.decode_jwt(token)?;
        let session = Session::try_from(&claims)?;

        if self.is_revoked(token).await? {
            return Err(AuthError::TokenRevoked);
        }

        Ok(session)
    }

    /// Ends a session by denying its token for the rest of its lifetime
    pub async fn sign_out(&self, token: &str, session: &Session) -> Result<SignedOut, AuthError> {
        let client = self.redis_client.as_ref().ok_or(AuthError::RedisNotConfigured)?;

        let now = Utc::now().timestamp().max(0) as usize;
        let ttl_seconds = session.expires_at.saturating_sub(now).max(1) as u64;

        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(revoked_key(token), 1u8, ttl_seconds).await?;

        tracing::info!(user_id = %session.user_id, "Session signed out");
        Ok(SignedOut { message: "Signed out successfully".to_string() })
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, AuthError> {
        let Some(client) = &self.redis_client else {
            return Ok(false);
        };

        let mut conn = client.get_multiplexed_async_connection().await?;
        let revoked: bool = conn.exists(revoked_key(token)).await?;
        Ok(revoked)
    }
}

fn revoked_key(token: &str) -> String {
    format!("{}:{}", REVOKED_PREFIX, token)
}
