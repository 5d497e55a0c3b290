//! JWT validation for WebSocket connection admission.
//!
//! New connections present an opaque signed token before any session-level
//! event is accepted. Verification covers signature and expiry (HS256 with a
//! configured secret). Internally the error distinguishes expired from
//! invalid credentials for logging; externally every failure surfaces as the
//! same generic authentication rejection.
//!
//! No membership or store mutation happens on this path.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by a connection credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject the token was issued to
    pub sub: String,
    /// Expiration timestamp (Unix seconds)
    pub exp: u64,
}

/// Authentication failure, kept generic towards the client
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("credential missing")]
    Missing,
    #[error("credential expired")]
    Expired,
    #[error("credential invalid")]
    Invalid,
}

/// Verifier for connection credentials
pub struct AuthConfig {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthConfig {
    /// Create a verifier for the given signing secret
    pub fn new(secret: &[u8]) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Validate a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid,
            })
    }
}
