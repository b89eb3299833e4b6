//! JWT bearer token verification

use std::fmt::Debug;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{CallerIdentity, DomainError};

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl JwtClaims {
    /// Get user ID from claims
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// Configuration for JWT verification
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 shared secret
    pub secret: String,
    /// Required `iss` claim, if any
    pub issuer: Option<String>,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: None,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }
}

/// Verifies HS256 bearer tokens and maps them to caller identities
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("issuer", &self.validation.iss)
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);

        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Validate a JWT token and return the claims
    pub fn verify(&self, token: &str) -> Result<JwtClaims, DomainError> {
        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| DomainError::validation(format!("Invalid JWT: {}", e)))?;

        Ok(token_data.claims)
    }

    /// Identity for an optional bearer token
    ///
    /// Missing, invalid or expired tokens resolve to the anonymous caller.
    pub fn resolve(&self, token: Option<&str>) -> CallerIdentity {
        let Some(token) = token else {
            return CallerIdentity::Anonymous;
        };

        match self.verify(token) {
            Ok(claims) if !claims.sub.trim().is_empty() => CallerIdentity::user(claims.sub),
            Ok(_) => CallerIdentity::Anonymous,
            Err(e) => {
                debug!(error = %e, "Ignoring bearer token");
                CallerIdentity::Anonymous
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    use super::JwtClaims;

    pub fn sign(secret: &str, sub: &str, iss: Option<&str>, ttl: Duration) -> String {
        let claims = JwtClaims {
            sub: sub.to_string(),
            exp: (Utc::now() + ttl).timestamp(),
            iss: iss.map(str::to_string),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }
}
