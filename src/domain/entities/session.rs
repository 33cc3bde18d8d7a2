use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AuthError;

/// Claims carried by access tokens from the identity provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub iat: Option<usize>,
}

/// The signed-in user, handed explicitly to every write operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
    /// Expiry of the token that established the session (unix seconds).
    #[serde(skip)]
    pub expires_at: usize,
}

impl TryFrom<&Claims> for Session {
    type Error = AuthError;

    fn try_from(claims: &Claims) -> Result<Self, Self::Error> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidUserId)?;
        Ok(Session {
            user_id,
            email: claims.email.clone(),
            expires_at: claims.exp,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SignedOut {
    pub message: String,
}
