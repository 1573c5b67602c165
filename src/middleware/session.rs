//! Session extractors for Axum handlers.
//!
//! The token is read from `Authorization: Bearer <jwt>`, falling back to the
//! provider's session cookie. Write handlers take [`Session`] and reject with
//! 401; read handlers take [`MaybeSession`] and serve empty results instead.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::errors::AppError;
use crate::services::session::{self as session_service};
use crate::AppState;

pub use crate::services::session::Session;

fn token_from_parts(parts: &Parts, cookie_name: &str) -> Option<String> {
    let bearer = parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(cookie_name)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token =
            token_from_parts(parts, &state.config.session_cookie).ok_or(AppError::Unauthorized)?;

        session_service::validate_token(
            &token,
            &state.config.jwt_secret,
            &state.config.jwt_audience,
        )
    }
}

/// Session when one is present and valid, `None` otherwise. Never rejects.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(
            Session::from_request_parts(parts, state).await.ok(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_header_wins() {
        let p = parts(
            Request::builder()
                .header("Authorization", "Bearer abc")
                .header("Cookie", "sb-access-token=def"),
        );
        assert_eq!(token_from_parts(&p, "sb-access-token").as_deref(), Some("abc"));
    }

    #[test]
    fn falls_back_to_cookie() {
        let p = parts(Request::builder().header("Cookie", "theme=dark; sb-access-token=def"));
        assert_eq!(token_from_parts(&p, "sb-access-token").as_deref(), Some("def"));
    }

    #[test]
    fn no_token() {
        let p = parts(Request::builder().header("Authorization", "Basic Zm9vOmJhcg=="));
        assert_eq!(token_from_parts(&p, "sb-access-token"), None);
    }
}
