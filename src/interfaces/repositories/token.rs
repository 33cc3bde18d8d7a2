use crate::{entities::session::Claims, errors::AuthError};

pub trait TokenVerifier: Send + Sync {
    /// Decodes and validates an access token issued by the identity provider
    fn decode_jwt(&self, token: &str) -> Result<Claims, AuthError>;
}
