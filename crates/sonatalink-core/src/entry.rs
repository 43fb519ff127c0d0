//! Configuration-entry types
//!
//! Represents the host/token pair produced by a completed setup flow and the
//! persisted entry record that wraps it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Integration domain for all SonataLink entries
pub const DOMAIN: &str = "sonata";

/// Display title for newly created entries
pub const DEFAULT_NAME: &str = "Sonata Music Hub";

/// Unique identifier for a configuration entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub Uuid);

impl EntryId {
    /// Generate a new random entry ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authentication token issued by a hub
///
/// Cannot be empty: `new` returns `None` for an empty string, so any
/// `ConnectionInfo` holding an `AuthToken` is usable by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a token string, rejecting empty input
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AuthToken {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "authentication token cannot be empty".to_string())
    }
}

/// Host/token pair produced by a successful authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Network address of the hub
    pub host: String,
    /// Token the hub issued during pairing
    #[serde(rename = "api_key")]
    pub token: AuthToken,
}

impl ConnectionInfo {
    pub fn new(host: impl Into<String>, token: AuthToken) -> Self {
        Self {
            host: host.into(),
            token,
        }
    }
}

/// A persisted configuration entry for a linked hub
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Unique entry identifier
    pub id: EntryId,
    /// Integration domain this entry belongs to
    pub domain: String,
    /// Human-readable entry title
    pub title: String,
    /// Connection data for the hub
    pub info: ConnectionInfo,
    /// When this entry was created
    pub created_at: DateTime<Utc>,
}

impl ConfigEntry {
    /// Create a new entry with the given title and connection data
    pub fn new(title: impl Into<String>, info: ConnectionInfo) -> Self {
        Self {
            id: EntryId::new(),
            domain: DOMAIN.to_string(),
            title: title.into(),
            info,
            created_at: Utc::now(),
        }
    }

    /// Host the entry points at
    pub fn host(&self) -> &str {
        &self.info.host
    }
}
