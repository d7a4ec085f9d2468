use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use super::domain::{IdentityPayload, SessionClaims};
use super::errors::AuthError;

/// Stateless session credential issuer/verifier backed by an HMAC secret.
///
/// # Examples
/// ```
/// use service::token::TokenService;
///
/// let tokens = TokenService::new("secret");
/// let mut identity = serde_json::Map::new();
/// identity.insert("email".into(), serde_json::Value::String("u@e.com".into()));
/// let token = tokens.issue(identity).unwrap();
/// let claims = tokens.verify(Some(&token)).unwrap();
/// assert_eq!(claims.email(), Some("u@e.com"));
/// ```
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl: Duration,
}

impl TokenService {
    /// Credentials carry the fixed one-hour validity window.
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_ttl(secret, Duration::hours(1))
    }

    /// Custom validity window, used by tests to produce expired credentials.
    pub fn with_ttl(secret: impl Into<String>, ttl: Duration) -> Self {
        Self { secret: secret.into(), ttl }
    }

    /// Sign the identity payload into a transportable credential.
    pub fn issue(&self, identity: IdentityPayload) -> Result<String, AuthError> {
        let exp = (Utc::now() + self.ttl).timestamp() as usize;
        let claims = SessionClaims { identity, exp };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(|e| AuthError::Token(e.to_string()))
    }

    /// Decode and validate a credential. Missing, forged, and expired
    /// credentials all collapse into `Unauthenticated`; verification never
    /// mutates state.
    pub fn verify(&self, token: Option<&str>) -> Result<SessionClaims, AuthError> {
        let token = token.ok_or(AuthError::Unauthenticated)?;
        let validation = Validation::new(Algorithm::HS256);
        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(error = %e, "token verification failed");
            AuthError::Unauthenticated
        })
    }
}
