//! Request authentication.
//!
//! [`CurrentUser`] is an extractor: handlers that take it only run for requests
//! carrying a valid token, either as `Authorization: Bearer <token>` or in the
//! `access_token` cookie set by the login form.

use crate::core::access::{Scope, ensure_any};
use crate::errors::{Error, Result};
use crate::web::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;

/// Name of the cookie holding the access token
pub const TOKEN_COOKIE: &str = "access_token";

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Token subject
    pub email: String,
    /// Scopes carried by the token
    pub scopes: Vec<Scope>,
}

impl CurrentUser {
    /// Fails with 403 unless the caller holds one of `allowed`.
    pub fn require(&self, allowed: &[Scope]) -> Result<()> {
        ensure_any(&self.scopes, allowed)
    }
}

fn bearer_header(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn token_cookie(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| {
            let value = value.trim_matches('"');
            value.strip_prefix("Bearer ").unwrap_or(value)
        })
}

/// Token sent with the request, header first
fn request_token(parts: &Parts) -> Option<&str> {
    bearer_header(parts)
        .or_else(|| token_cookie(parts))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = request_token(parts).ok_or_else(|| Error::unauthorized("Not authenticated"))?;
        let claims = state.tokens.verify(token)?;
        let scopes = claims.scopes();
        Ok(Self {
            email: claims.sub,
            scopes,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use axum::http::Request;

    fn parts(header: &str, value: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .header(header, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_header_token() {
        let p = parts("Authorization", "Bearer abc.def");
        assert_eq!(request_token(&p), Some("abc.def"));
    }

    #[test]
    fn test_wrong_scheme_ignored() {
        let p = parts("Authorization", "Basic dXNlcjpwYXNz");
        assert_eq!(request_token(&p), None);
    }

    #[test]
    fn test_cookie_token_with_and_without_prefix() {
        let p = parts("Cookie", "theme=dark; access_token=abc.def");
        assert_eq!(request_token(&p), Some("abc.def"));

        let p = parts("Cookie", "access_token=\"Bearer abc.def\"");
        assert_eq!(request_token(&p), Some("abc.def"));
    }

    #[test]
    fn test_empty_cookie_is_no_token() {
        let p = parts("Cookie", "access_token=");
        assert_eq!(request_token(&p), None);
    }

    #[test]
    fn test_require() {
        let user = CurrentUser {
            email: "sup@transit.test".to_string(),
            scopes: vec![Scope::Supervisor],
        };
        assert!(user.require(&[Scope::Admin, Scope::Supervisor]).is_ok());
        assert!(matches!(
            user.require(&[Scope::Admin]).unwrap_err(),
            Error::Forbidden { .. }
        ));
    }
}
