//! Session token verification.
//!
//! Users sign in with the external auth provider, which hands the browser an
//! HS256 JWT. This module only checks that token; it never issues credentials
//! of its own apart from [`issue_token`], which mints provider-shaped tokens
//! for tests and local tooling.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Claims carried by the provider's access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User identifier.
    pub sub: String,
    pub aud: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Identity context passed explicitly into every service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
        }
    }
}

/// Validate a session token and return the identity it asserts.
pub fn validate_token(token: &str, jwt_secret: &str, audience: &str) -> Result<Session, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[audience]);

    let claims = jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            AppError::Unauthorized
        })?;

    if claims.sub.is_empty() {
        return Err(AppError::Unauthorized);
    }

    Ok(Session {
        user_id: claims.sub,
        email: claims.email,
    })
}

/// Mint a token the way the auth provider does.
pub fn issue_token(
    user_id: &str,
    jwt_secret: &str,
    audience: &str,
    expiry_secs: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        aud: audience.to_string(),
        email: None,
        exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-jwt";

    #[test]
    fn token_round_trip() {
        let token = issue_token("user-a", SECRET, "authenticated", 900).unwrap();
        let session = validate_token(&token, SECRET, "authenticated").unwrap();
        assert_eq!(session.user_id, "user-a");
        assert_eq!(session.email, None);
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue_token("user-a", SECRET, "authenticated", 900).unwrap();
        let result = validate_token(&token, "other-secret", "authenticated");
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn wrong_audience_rejected() {
        let token = issue_token("user-a", SECRET, "anon", 900).unwrap();
        assert!(validate_token(&token, SECRET, "authenticated").is_err());
    }

    #[test]
    fn invalid_token_rejected() {
        assert!(validate_token("garbage.token.here", SECRET, "authenticated").is_err());
    }

    #[test]
    fn expired_token_rejected() {
        // Well beyond the 60s leeway window
        let token = issue_token("user-a", SECRET, "authenticated", -3600).unwrap();
        assert!(validate_token(&token, SECRET, "authenticated").is_err());
    }
}
