//! Client-side session identifiers.
//!
//! A session id correlates one submission with its progress queries and the
//! consolidated reports generated for it. It lives only in memory.

use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LensError, Result};

const SUFFIX_LEN: usize = 8;

/// Opaque per-analysis correlation token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Generates `session_{unix_millis}_{random suffix}`.
    pub fn generate() -> Self {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SUFFIX_LEN)
            .map(|b| (b as char).to_ascii_lowercase())
            .collect();
        Self(format!("session_{}_{}", Utc::now().timestamp_millis(), suffix))
    }

    /// Parses an id supplied from outside the process.
    ///
    /// Ids end up in URL paths and download file names, so only ASCII
    /// alphanumerics, `_` and `-` are accepted.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(LensError::validation("session_id", "Session id is empty"));
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(LensError::validation(
                "session_id",
                format!("Session id '{raw}' may only contain letters, digits, '_' and '-'"),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// Wraps an id that is already known to be well formed.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SessionId {
    type Error = LensError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

/// When the controller mints a new session id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPolicy {
    /// One id for the lifetime of the controller
    #[default]
    PerPageLoad,
    /// A fresh id for every submission
    PerSubmission,
}
