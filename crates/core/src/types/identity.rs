//! Storage identity.
//!
//! An identity is only a partition key for stored collections. It is derived
//! from an unverified token or a locally generated guest id and must never be
//! used for authorization.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::GuestId;

/// Where an identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    /// The token's `sub` claim.
    Subject,
    /// The token's `id` claim.
    UserId,
    /// The token's `email` claim.
    Email,
    /// A locally generated guest id.
    Guest,
}

impl fmt::Display for IdentitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subject => write!(f, "subject"),
            Self::UserId => write!(f, "user_id"),
            Self::Email => write!(f, "email"),
            Self::Guest => write!(f, "guest"),
        }
    }
}

/// Resolved storage identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    key: String,
    source: IdentitySource,
}

impl Identity {
    /// Identity taken from a token claim.
    #[must_use]
    pub fn from_claim(source: IdentitySource, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            source,
        }
    }

    /// Identity for a guest.
    #[must_use]
    pub fn guest(id: GuestId) -> Self {
        Self {
            key: id.into_inner(),
            source: IdentitySource::Guest,
        }
    }

    /// The partition key used in storage keys.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Where this identity came from.
    #[must_use]
    pub const fn source(&self) -> IdentitySource {
        self.source
    }

    /// Whether this is a guest identity.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self.source, IdentitySource::Guest)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
