//! Common types and utilities shared across dormant crates.
//!
//! This crate defines the domain records exchanged between the API client and
//! the pipeline, the shared error taxonomy, and observability helpers. It is
//! intentionally lightweight so every crate can depend on it.
//!
//! # Overview
//!
//! - [`Handle`]: a validated account handle
//! - [`UserIdentity`] and [`Post`]: immutable records fetched from the API
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`DormantError`] and [`Result`]: shared error handling
//!
//! # Examples
//!
//! ```rust
//! use dormant_common::Handle;
//!
//! let handle: Handle = "alice_01".parse().unwrap();
//! assert_eq!(handle.as_str(), "alice_01");
//! assert!("@alice".parse::<Handle>().is_err());
//! ```
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;
use time::OffsetDateTime;

pub mod observability;

const HANDLE_PATTERN: &str = r"^[A-Za-z0-9_]{1,15}$";

/// Compiled once from the literal pattern above, which is known to be valid.
static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(HANDLE_PATTERN).expect("constant pattern"));

/// Public username identifying an account: 1-15 letters, digits or underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Handle {
    type Err = DormantError;

    fn from_str(s: &str) -> Result<Self> {
        if HANDLE_RE.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(DormantError::InvalidHandle(s.to_string()))
        }
    }
}

impl TryFrom<String> for Handle {
    type Error = DormantError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Handle> for String {
    fn from(value: Handle) -> Self {
        value.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An account as returned by the lookup and following endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub name: String,
    /// Handle exactly as the API reports it; not re-validated.
    pub username: String,
    pub protected: bool,
    pub following_count: Option<u64>,
}

/// A single post (tweet). Only the fields the ranking needs are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author_id: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Error types used across the dormant workspace.
#[derive(thiserror::Error, Debug)]
pub enum DormantError {
    /// The handle given on the command line is malformed.
    #[error(
        "Invalid user name '{0}'. User name must be between 1 and 15 characters long and can contain only letters, numbers and underscores."
    )]
    InvalidHandle(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No bearer token could be located.
    #[error("credentials.txt not found (searched: {}). Create it and paste your Twitter app bearer token.", display_paths(.searched))]
    MissingCredentials { searched: Vec<PathBuf> },

    /// The target handle does not resolve to an account.
    #[error("User '{0}' is not registered on Twitter")]
    UserNotFound(String),

    /// The API rejected our credentials; nothing further can succeed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The app is not allowed to use the endpoint (HTTP 403, e.g.
    /// `client-not-enrolled`); every later request would fail the same way.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Any other API or transport failure.
    #[error("API error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Api {
        status: Option<u16>,
        message: String,
    },
}

impl DormantError {
    /// Errors after which continuing the run is pointless.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DormantError::Api { .. })
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "-".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenient alias for results that use [`DormantError`].
pub type Result<T> = std::result::Result<T, DormantError>;
