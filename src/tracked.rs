//! Status tracking for messages handed back to the caller

use crate::error::{ExtractError, Result};
use crate::types::{NormalizedMessage, RawMessage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Lifecycle status of a tracked message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    New,
    Read,
    Sent,
    Draft,
    Moved,
    Replied,
    Deleted,
    Scheduled,
    Forwarded,
}

impl Status {
    pub const ALL: [Self; 9] = [
        Self::New,
        Self::Read,
        Self::Sent,
        Self::Draft,
        Self::Moved,
        Self::Replied,
        Self::Deleted,
        Self::Scheduled,
        Self::Forwarded,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Sent => "sent",
            Self::Draft => "draft",
            Self::Moved => "moved",
            Self::Replied => "replied",
            Self::Deleted => "deleted",
            Self::Scheduled => "scheduled",
            Self::Forwarded => "forwarded",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ExtractError::TypeMismatch {
                expected: "message status",
                found: wanted.to_string(),
            })
    }
}

/// One entry of the status history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: Status,
    pub at: DateTime<Utc>,
}

/// Summary of a tracked message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingStats<'a> {
    pub id: &'a str,
    pub status: Status,
    pub thread: &'a str,
    pub labels: &'a [String],
}

/// A normalized message together with its provider identity and status history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedMessage {
    id: String,
    thread: String,
    labels: Vec<String>,
    received_at: Option<DateTime<Utc>>,
    status: Status,
    history: Vec<StatusChange>,
    details: NormalizedMessage,
}

impl TrackedMessage {
    /// Track a normalized message; the raw message must carry `id` and `threadId`
    pub fn new(raw: &RawMessage, details: NormalizedMessage) -> Result<Self> {
        let id = raw
            .id
            .clone()
            .ok_or_else(|| ExtractError::MissingKey("id".to_string()))?;
        let thread = raw
            .thread_id
            .clone()
            .ok_or_else(|| ExtractError::MissingKey("threadId".to_string()))?;

        let mut tracked = Self {
            id,
            thread,
            labels: raw.label_ids.clone(),
            received_at: raw.received_at(),
            status: Status::New,
            history: Vec::new(),
            details,
        };
        tracked.update_status(Status::New);
        Ok(tracked)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn thread(&self) -> &str {
        &self.thread
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub const fn received_at(&self) -> Option<DateTime<Utc>> {
        self.received_at
    }

    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn history(&self) -> &[StatusChange] {
        &self.history
    }

    #[must_use]
    pub const fn details(&self) -> &NormalizedMessage {
        &self.details
    }

    /// Set the current status and record it in the history
    pub fn update_status(&mut self, status: Status) {
        debug!("Updating status of {} to {status}", self.id);
        self.status = status;
        self.history.push(StatusChange {
            status,
            at: Utc::now(),
        });
    }

    pub fn clear_history(&mut self) {
        debug!("Deleting status history of {}", self.id);
        self.history.clear();
    }

    #[must_use]
    pub fn stats(&self) -> TrackingStats<'_> {
        TrackingStats {
            id: &self.id,
            status: self.status,
            thread: &self.thread,
            labels: &self.labels,
        }
    }

    /// Pretty JSON suitable for saving to disk
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| ExtractError::Unexpected(err.to_string()))
    }
}
