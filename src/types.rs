//! Core types for raw provider payloads and normalized messages

use crate::error::{ExtractError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// One message as returned by the provider's "get message" call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    /// Provider message id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Provider thread id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,

    /// Labels attached to the message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub label_ids: Vec<String>,

    /// Short preview text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    /// Receive time in milliseconds since the epoch, as a decimal string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_date: Option<String>,

    /// Root content node; absent for minimal-format responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

impl RawMessage {
    /// Build a message from loosely typed JSON, rejecting wrongly shaped input
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ExtractError::type_mismatch("message object", &value));
        }
        serde_json::from_value(value).map_err(|err| ExtractError::TypeMismatch {
            expected: "message payload",
            found: err.to_string(),
        })
    }

    /// Payload headers, or an empty slice when there are none
    #[must_use]
    pub fn headers(&self) -> &[Header] {
        self.payload
            .as_ref()
            .and_then(|payload| payload.headers.as_deref())
            .unwrap_or_default()
    }

    /// Parse `internalDate` into a timestamp
    #[must_use]
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        let millis = self.internal_date.as_deref()?.trim().parse::<i64>().ok()?;
        DateTime::from_timestamp_millis(millis)
    }
}

/// The root content node has the same shape as any other part
pub type Payload = Part;

/// A MIME-like content node; parts form a tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_id: Option<String>,

    /// Declared content type, e.g. `text/plain`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Attachment file name; empty for inline body parts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Header lines in delivery order, duplicates included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<Header>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<PartBody>,

    /// Child nodes for `multipart/*` types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<Part>>,
}

impl Part {
    /// Whether the part carries a non-empty file name
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.filename.as_deref().is_some_and(|name| !name.is_empty())
    }
}

/// Body of a part: inline data or a reference to a separately stored attachment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// URL-safe base64 content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// A single header line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
        }
    }
}

/// First value of the header called `name`
#[must_use]
pub fn header_value<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|header| header.name.as_deref() == Some(name))
        .and_then(|header| header.value.as_deref())
}

/// The flattened record produced by [`crate::assemble`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedMessage {
    /// Sender address, without display name
    pub from: Option<String>,

    /// Recipient address, without display name
    pub to: Option<String>,

    /// Every `Subject` header, in encounter order
    pub subject: Vec<String>,

    /// Cleaned body text of all text parts
    pub message: String,

    pub links: Links,

    /// Raw header list, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<Header>>,

    /// Decoded attachment blobs, when collected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Vec<u8>>>,
}

/// Links attached to a normalized message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    pub count: usize,
    pub values: Vec<String>,
}

impl Links {
    #[must_use]
    pub const fn from_values(values: Vec<String>) -> Self {
        Self {
            count: values.len(),
            values,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Which link representation to attach to a normalized message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    /// No links
    #[default]
    None,
    /// Unique scheme-and-domain prefixes
    #[serde(alias = "links_basic")]
    Basic,
    /// Unique full URLs
    #[serde(alias = "links_detailed")]
    Detailed,
}

impl LinkMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Detailed => "detailed",
        }
    }
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkMode {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "basic" | "links_basic" => Ok(Self::Basic),
            "detailed" | "links_detailed" => Ok(Self::Detailed),
            other => Err(ExtractError::TypeMismatch {
                expected: "link mode (none, basic, detailed)",
                found: other.to_string(),
            }),
        }
    }
}

/// Caller-selected options for [`crate::assemble`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssembleOptions {
    pub link_mode: LinkMode,

    /// Keep the raw header list on the normalized message
    pub store_headers: bool,
}

impl AssembleOptions {
    #[must_use]
    pub const fn with_links(mut self, link_mode: LinkMode) -> Self {
        self.link_mode = link_mode;
        self
    }

    #[must_use]
    pub const fn with_headers(mut self, store_headers: bool) -> Self {
        self.store_headers = store_headers;
        self
    }
}

/// Outcome of a stage that has a defined "nothing to extract" case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction<T> {
    /// The input legitimately had nothing to extract
    Empty,
    Found(T),
}

impl<T> Extraction<T> {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Empty => None,
            Self::Found(value) => Some(value),
        }
    }
}

impl<T: Default> Extraction<T> {
    pub fn unwrap_or_default(self) -> T {
        self.into_option().unwrap_or_default()
    }
}
