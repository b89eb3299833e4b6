//! Authentication infrastructure module
//!
//! Bearer tokens are optional; they only decide which caller a request
//! belongs to.

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtVerifier};

#[cfg(test)]
pub(crate) use jwt::test_tokens;
