//! Signed access tokens.
//!
//! Tokens are HS256 JWTs carrying the user's email as `sub`, their scopes as one
//! space-separated `scope` claim, and an `exp` timestamp. The same secret signs
//! and verifies, so a token is only ever accepted by the service that issued it.

use crate::core::access::{Scope, join_scopes, parse_scopes};
use crate::errors::{Error, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Claims written into every token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Email of the authenticated user
    pub sub: String,
    /// Space-separated scope names
    pub scope: String,
    /// Expiry as a Unix timestamp
    pub exp: i64,
}

impl Claims {
    /// Scopes named in the claim that this service recognises
    #[must_use]
    pub fn scopes(&self) -> Vec<Scope> {
        parse_scopes(&self.scope)
    }
}

/// Issues and verifies access tokens with one shared secret
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Creates a service signing with `secret`; tokens expire after `ttl`.
    #[must_use]
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issues a token for `subject` carrying `scopes`.
    ///
    /// # Errors
    /// Returns an error if the claims cannot be signed.
    pub fn issue(&self, subject: &str, scopes: &[Scope]) -> Result<String> {
        let claims = Claims {
            sub: subject.to_string(),
            scope: join_scopes(scopes),
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            Error::Config {
                message: format!("Failed to sign token: {e}"),
            }
        })
    }

    /// Verifies signature and expiry and returns the claims.
    ///
    /// # Errors
    /// Returns [`Error::Unauthorized`] ("Invalid token") for any token that is
    /// malformed, signed with another key or expired.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        tracing::debug!("Rejected expired token");
                    }
                    _ => tracing::debug!("Rejected token: {e}"),
                }
                Error::unauthorized("Invalid token")
            })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn service() -> TokenService {
        TokenService::new("unit-test-secret", Duration::minutes(30))
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = service();
        let token = tokens
            .issue("ops@transit.test", &[Scope::Admin, Scope::Supervisor])
            .unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, "ops@transit.test");
        assert_eq!(claims.scope, "admin supervisor");
        assert_eq!(claims.scopes(), vec![Scope::Admin, Scope::Supervisor]);
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = TokenService::new("unit-test-secret", Duration::minutes(-10));
        let token = tokens.issue("late@transit.test", &[Scope::Admin]).unwrap();

        let err = tokens.verify(&token).unwrap_err();
        assert_eq!(err.to_string(), "Invalid token");
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let other = TokenService::new("someone-else", Duration::minutes(30));
        let token = other.issue("x@transit.test", &[Scope::System]).unwrap();

        assert!(matches!(
            service().verify(&token).unwrap_err(),
            Error::Unauthorized { .. }
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(service().verify("not-a-token").is_err());
    }
}
