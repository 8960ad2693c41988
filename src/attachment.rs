//! Attachment allow-listing and collection

use crate::body::decode_url_safe;
use crate::error::{BoxError, ExtractError, Result};
use crate::types::{Part, RawMessage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Allowed content types and the file extension each maps to
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpeg"),
    ("image/jpg", "jpg"),
    ("image/webp", "webp"),
    ("application/pdf", "pdf"),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xlsx",
    ),
    ("application/xml", "xml"),
    ("text/xml", "xml"),
];

/// Whether a declared content type may be collected. Parameters after `;` are ignored.
#[must_use]
pub fn is_allowed(content_type: &str) -> bool {
    extension_for(content_type).is_some()
}

/// File extension for an allowed content type
#[must_use]
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let bare = content_type.split(';').next().unwrap_or_default().trim();
    if bare.is_empty() {
        return None;
    }

    ALLOWED_TYPES
        .iter()
        .find(|(mime_type, _)| mime_type.eq_ignore_ascii_case(bare))
        .map(|(_, extension)| *extension)
}

/// An allowed attachment part that can be fetched by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentRef {
    /// Dotted position of the part in the tree, e.g. `"1"` or `"0.2"`
    pub part: String,
    pub filename: String,
    pub mime_type: String,
    pub attachment_id: String,
    pub extension: &'static str,
}

/// Supplies base64 attachment data; implemented by the network layer
pub trait AttachmentSource {
    /// Fetch the URL-safe base64 data of one attachment, `None` when the
    /// provider returned no data
    fn fetch(&self, message_id: &str, attachment_id: &str)
    -> std::result::Result<Option<String>, BoxError>;
}

impl<F> AttachmentSource for F
where
    F: Fn(&str, &str) -> std::result::Result<Option<String>, BoxError>,
{
    fn fetch(
        &self,
        message_id: &str,
        attachment_id: &str,
    ) -> std::result::Result<Option<String>, BoxError> {
        self(message_id, attachment_id)
    }
}

/// Options for [`collect_attachments`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentOptions {
    /// Stop after this many blobs; `None` or `0` means no limit
    pub limit: Option<usize>,
}

impl AttachmentOptions {
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }

    fn effective_limit(self) -> Option<usize> {
        self.limit.filter(|limit| *limit > 0)
    }
}

/// Every named part with an allowed type and an attachment id, in tree order.
///
/// Named parts with a disallowed type are skipped with a warning. A named,
/// allowed part without a `body` is a [`ExtractError::MissingKey`].
pub fn attachment_refs(message: &RawMessage) -> Result<Vec<AttachmentRef>> {
    info!("Searching for attachments");

    let mut refs = Vec::new();
    let Some(parts) = message.payload.as_ref().and_then(|p| p.parts.as_deref()) else {
        debug!("No parts in message payload");
        return Ok(refs);
    };

    collect_refs(parts, "", &mut refs)?;
    debug!("Found {} attachment(s)", refs.len());
    Ok(refs)
}

fn collect_refs(parts: &[Part], prefix: &str, refs: &mut Vec<AttachmentRef>) -> Result<()> {
    for (index, part) in parts.iter().enumerate() {
        let location = if prefix.is_empty() {
            index.to_string()
        } else {
            format!("{prefix}.{index}")
        };

        if let Some(children) = &part.parts {
            collect_refs(children, &location, refs)?;
            continue;
        }
        if !part.is_named() {
            continue;
        }

        let mime_type = part.mime_type.as_deref().unwrap_or_default();
        let Some(extension) = extension_for(mime_type) else {
            warn!("Attachment type '{mime_type}' excluded from processing");
            continue;
        };

        let body = part
            .body
            .as_ref()
            .ok_or_else(|| ExtractError::MissingKey(format!("parts[{location}].body")))?;
        let Some(attachment_id) = body.attachment_id.clone() else {
            debug!("Attachment part {location} has no attachmentId");
            continue;
        };

        refs.push(AttachmentRef {
            part: location,
            filename: part.filename.clone().unwrap_or_default(),
            mime_type: mime_type.to_string(),
            attachment_id,
            extension,
        });
    }
    Ok(())
}

/// Fetch and decode the message's allowed attachments, in tree order
pub fn collect_attachments<S: AttachmentSource + ?Sized>(
    message: &RawMessage,
    source: &S,
    options: &AttachmentOptions,
) -> Result<Vec<Vec<u8>>> {
    let refs = attachment_refs(message)?;
    if refs.is_empty() {
        return Ok(Vec::new());
    }

    let message_id = message
        .id
        .as_deref()
        .ok_or_else(|| ExtractError::MissingKey("id".to_string()))?;
    let limit = options.effective_limit();
    let mut blobs = Vec::new();

    for reference in &refs {
        if limit.is_some_and(|limit| blobs.len() >= limit) {
            debug!("Reached attachment limit: {}", blobs.len());
            break;
        }

        let data = source
            .fetch(message_id, &reference.attachment_id)
            .map_err(|source| ExtractError::Source {
                attachment_id: reference.attachment_id.clone(),
                source,
            })?;
        let Some(data) = data else {
            debug!("No data for attachment {}", reference.attachment_id);
            continue;
        };

        let bytes = decode_url_safe(&data).map_err(|err| ExtractError::Encoding {
            part: reference.part.clone(),
            details: err.to_string(),
        })?;
        debug!(
            "Collected attachment {} ({} bytes)",
            reference.filename,
            bytes.len()
        );
        blobs.push(bytes);
    }

    Ok(blobs)
}
