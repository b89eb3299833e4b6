//! Caller identity attached to incoming requests

use std::fmt;

/// Cache-key segment used when no authenticated caller is present
pub const ANONYMOUS: &str = "anonymous";

/// Identity of the caller that issued a request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CallerIdentity {
    /// No (valid) credentials were presented
    #[default]
    Anonymous,
    /// An authenticated user, identified by the token subject
    User(String),
}

impl CallerIdentity {
    /// Creates an identity for an authenticated user
    pub fn user(id: impl Into<String>) -> Self {
        Self::User(id.into())
    }

    /// Returns the user id, if authenticated
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(id),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Segment used when deriving cache keys
    pub fn as_key_segment(&self) -> &str {
        match self {
            Self::Anonymous => ANONYMOUS,
            Self::User(id) => id,
        }
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key_segment())
    }
}
