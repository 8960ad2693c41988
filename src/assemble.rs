//! Merge header, body and link extraction into one normalized message

use crate::attachment::{AttachmentOptions, AttachmentSource, collect_attachments};
use crate::body::walk;
use crate::error::{AssembleError, Result};
use crate::headers::resolve;
use crate::normalize::normalize;
use crate::types::{AssembleOptions, Extraction, NormalizedMessage, RawMessage};
use tracing::{debug, info, warn};

/// Normalize one raw message.
///
/// A message without payload yields the empty default record. Missing keys
/// surface as [`AssembleError::Payload`], every other failure as
/// [`AssembleError::Service`]; on error nothing is returned.
pub fn assemble(
    message: &RawMessage,
    options: &AssembleOptions,
) -> std::result::Result<NormalizedMessage, AssembleError> {
    debug!(
        "Extracting message. Links type: {} Store headers: {}",
        options.link_mode, options.store_headers
    );
    build(message, options).map_err(AssembleError::from)
}

/// [`assemble`], then fetch the allowed attachments into `attachments`
pub fn assemble_with_attachments<S: AttachmentSource + ?Sized>(
    message: &RawMessage,
    options: &AssembleOptions,
    source: &S,
    attachment_options: &AttachmentOptions,
) -> std::result::Result<NormalizedMessage, AssembleError> {
    let mut normalized = assemble(message, options)?;
    normalized.attachments = Some(collect_attachments(message, source, attachment_options)?);
    Ok(normalized)
}

/// Assemble each message independently, keeping the caller's order
pub fn assemble_batch(
    messages: &[RawMessage],
    options: &AssembleOptions,
) -> Vec<std::result::Result<NormalizedMessage, AssembleError>> {
    info!("Assembling {} message(s)", messages.len());
    messages
        .iter()
        .map(|message| assemble(message, options))
        .collect()
}

fn build(message: &RawMessage, options: &AssembleOptions) -> Result<NormalizedMessage> {
    let Some(payload) = &message.payload else {
        info!("No payload in message");
        return Ok(NormalizedMessage::default());
    };

    let mut normalized = NormalizedMessage::default();
    let mut links = Vec::new();

    if let Some(headers) = payload.headers.as_deref() {
        let basic = resolve(headers)?;
        normalized.from = basic.from;
        normalized.to = basic.to;
        normalized.subject = basic.subject;
    } else {
        warn!("Missing headers in message, sender and recipient unknown");
    }

    if let Extraction::Found(walked) = walk(message)? {
        normalized.message = walked.message;
        links = walked.links;
    }

    if let Some(extracted) = options.link_mode.extract(&links)? {
        debug!("Added {} link(s)", extracted.count);
        normalized.links = extracted;
    }

    debug!("Cleaning message text from unicode characters");
    normalized.message = normalize(&normalized.message)?;

    if options.store_headers {
        debug!("Adding headers information");
        normalized.headers = Some(payload.headers.clone().unwrap_or_default());
    }

    Ok(normalized)
}
