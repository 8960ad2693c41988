// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Gmail Payload Extraction
//!
//! Pure transformations that turn the nested message structure returned by
//! the Gmail API into a flat, predictable record: sender, recipient,
//! subjects, cleaned body text, links and attachments.
//!
//! Fetching messages, OAuth and rate limiting stay with the caller; every
//! function here works on already-fetched data and is safe to call from
//! many threads at once.
//!
//! # Example
//!
//! ```rust
//! use gmail_extract::{AssembleOptions, LinkMode, RawMessage, assemble};
//! use serde_json::json;
//!
//! let raw = RawMessage::from_value(json!({
//!     "id": "18c2",
//!     "payload": {
//!         "headers": [
//!             {"name": "From", "value": "Jane <jane@example.com>"},
//!             {"name": "Subject", "value": "Hello"}
//!         ],
//!         "parts": [
//!             {"mimeType": "text/plain", "body": {"data": "SGkgaHR0cHM6Ly9leGFtcGxlLmNvbS94IHRoZXJl"}}
//!         ]
//!     }
//! }))
//! .unwrap();
//!
//! let options = AssembleOptions::default().with_links(LinkMode::Detailed);
//! let message = assemble(&raw, &options).unwrap();
//!
//! assert_eq!(message.from.as_deref(), Some("jane@example.com"));
//! assert_eq!(message.links.values, vec!["https://example.com/x"]);
//! assert_eq!(message.message, "Hi  there");
//! ```

mod assemble;
mod attachment;
mod body;
mod error;
mod headers;
mod links;
mod normalize;
mod pattern;
mod tracked;
mod types;

pub use assemble::{assemble, assemble_batch, assemble_with_attachments};
pub use attachment::{
    AttachmentOptions, AttachmentRef, AttachmentSource, attachment_refs, collect_attachments,
    extension_for, is_allowed,
};
pub use body::{BodyWalk, decode_url_safe, walk};
pub use error::{AssembleError, BoxError, ExtractError, Result};
pub use headers::{BasicInfo, extract_address, resolve};
pub use links::{
    extract_basic, extract_basic_value, extract_detailed, extract_detailed_value, string_items,
};
pub use normalize::{clean_whitespace, normalize, normalize_or_original, normalize_value};
pub use tracked::{Status, StatusChange, TrackedMessage, TrackingStats};
pub use types::*;
