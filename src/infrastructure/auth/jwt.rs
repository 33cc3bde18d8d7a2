use std::fmt;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use zeroize::Zeroizing;

use crate::entities::session::Claims;
use crate::errors::AuthError;
use crate::repositories::token::TokenVerifier;
use crate::settings::AppConfig;

pub const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Verifies access tokens signed by the identity provider.
#[derive(Clone)]
pub struct JwtService {
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        let secret = Zeroizing::new(config.jwt_secret.clone());

        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        match &config.jwt_audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        JwtService {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn decode_jwt(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(AuthError::from)
    }
}

impl TokenVerifier for JwtService {
    fn decode_jwt(&self, token: &str) -> Result<Claims, AuthError> {
        self.decode_jwt(token)
    }
}

impl fmt::Debug for JwtService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtService")
            .field("decoding", &"[REDACTED]")
            .field("algorithm", &JWT_ALGORITHM)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AppEnvironment;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "identity-provider-secret-for-tests-0123456789";

    fn config(audience: Option<&str>) -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "test".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            database_url: "postgres://localhost/rooms".into(),
            database_max_connections: 1,
            run_migrations: false,
            redis_url: None,
            cors_allowed_origins: vec!["*".into()],
            jwt_secret: SECRET.into(),
            jwt_audience: audience.map(str::to_string),
            storage_url: "https://storage.example.com".into(),
            storage_bucket: "room-images".into(),
            storage_api_key: "key".into(),
            max_images_per_listing: 5,
            sample_listings_fallback: false,
        }
    }

    fn token(claims: serde_json::Value, secret: &str) -> String {
        encode(&Header::new(JWT_ALGORITHM), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn exp_in(seconds: i64) -> i64 {
        Utc::now().timestamp() + seconds
    }

    #[test]
    fn accepts_provider_token() {
        let service = JwtService::new(&config(Some("authenticated")));
        let jwt = token(
            json!({"sub": "5f0c6a43-4b5c-4a38-9d0e-1f2a3b4c5d6e", "email": "owner@example.com", "aud": "authenticated", "exp": exp_in(600)}),
            SECRET,
        );

        let claims = service.decode_jwt(&jwt).unwrap();
        assert_eq!(claims.email.as_deref(), Some("owner@example.com"));
    }

    #[test]
    fn rejects_foreign_signature() {
        let service = JwtService::new(&config(None));
        let jwt = token(json!({"sub": "x", "exp": exp_in(600)}), "some-other-secret-that-is-long-enough");
        assert!(matches!(service.decode_jwt(&jwt), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn reports_expiry_separately() {
        let service = JwtService::new(&config(None));
        let jwt = token(json!({"sub": "x", "exp": exp_in(-60)}), SECRET);
        assert!(matches!(service.decode_jwt(&jwt), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn enforces_audience_when_configured() {
        let service = JwtService::new(&config(Some("authenticated")));
        let jwt = token(json!({"sub": "x", "aud": "anon", "exp": exp_in(600)}), SECRET);
        assert!(matches!(service.decode_jwt(&jwt), Err(AuthError::InvalidToken)));
    }
}
