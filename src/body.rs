//! Body text extraction from the payload's part tree

use crate::error::{ExtractError, Result};
use crate::normalize::clean_whitespace;
use crate::pattern::{HTTP_HTTPS_URL, compiled};
use crate::types::{Extraction, Part, RawMessage};
use base64::Engine;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use regex::Regex;
use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{debug, info};

/// URL-safe alphabet that accepts data with or without trailing padding
const URL_SAFE_ANY_PADDING: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Text and links gathered from a message's text parts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyWalk {
    /// Visible text of every text part, links removed, concatenated in part order
    pub message: String,

    /// Raw link tokens in encounter order, duplicates kept
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextKind {
    Plain,
    Html,
}

/// Walk the part tree depth-first and collect body text and links.
///
/// A message without payload, or a payload without parts, is
/// [`Extraction::Empty`]. A `text/plain` or `text/html` part lacking
/// `body.data` is a [`ExtractError::MissingKey`].
pub fn walk(message: &RawMessage) -> Result<Extraction<BodyWalk>> {
    info!("Collecting message text from parts");

    let Some(payload) = &message.payload else {
        debug!("No payload in message");
        return Ok(Extraction::Empty);
    };
    let Some(parts) = &payload.parts else {
        debug!("No parts in message payload");
        return Ok(Extraction::Empty);
    };

    let url = compiled(&HTTP_HTTPS_URL)?;
    let mut walked = BodyWalk::default();
    walk_parts(parts, &mut Vec::new(), url, &mut walked)?;

    debug!(
        "Collected {} char(s) of text and {} link(s)",
        walked.message.chars().count(),
        walked.links.len()
    );
    Ok(Extraction::Found(walked))
}

fn walk_parts(
    parts: &[Part],
    path: &mut Vec<usize>,
    url: &Regex,
    walked: &mut BodyWalk,
) -> Result<()> {
    for (index, part) in parts.iter().enumerate() {
        path.push(index);
        let result = walk_part(part, path, url, walked);
        path.pop();
        result?;
    }
    Ok(())
}

fn walk_part(part: &Part, path: &mut Vec<usize>, url: &Regex, walked: &mut BodyWalk) -> Result<()> {
    let Some(mime_type) = part.mime_type.as_deref() else {
        debug!("Part {} has no mimeType, skipping", part_path(path));
        return Ok(());
    };

    if let Some(children) = &part.parts {
        return walk_parts(children, path, url, walked);
    }

    let kind = match mime_type {
        "text/plain" => TextKind::Plain,
        "text/html" => TextKind::Html,
        _ => return Ok(()),
    };

    let location = part_path(path);
    if part.is_named() {
        debug!("Part {location} is a text attachment, skipping");
        return Ok(());
    }

    let data = part
        .body
        .as_ref()
        .ok_or_else(|| ExtractError::MissingKey(format!("parts[{location}].body")))?
        .data
        .as_deref()
        .ok_or_else(|| ExtractError::MissingKey(format!("parts[{location}].body.data")))?;

    let chunk = decode_text(data, &location)?;
    let visible: Cow<'_, str> = match kind {
        TextKind::Html => Cow::Owned(strip_html(&chunk)),
        TextKind::Plain => Cow::Borrowed(&chunk),
    };

    // Links hidden in markup are collected from the raw text, not the visible text
    walked
        .links
        .extend(url.find_iter(&chunk).map(|found| found.as_str().to_string()));

    let without_links = url.replace_all(&visible, "");
    walked.message.push_str(&clean_whitespace(&without_links)?);

    Ok(())
}

/// Decode URL-safe base64, with or without padding
pub fn decode_url_safe(data: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_ANY_PADDING.decode(data.trim())
}

fn decode_text(data: &str, location: &str) -> Result<String> {
    let bytes = decode_url_safe(data).map_err(|err| ExtractError::Encoding {
        part: location.to_string(),
        details: err.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|err| ExtractError::Encoding {
        part: location.to_string(),
        details: err.to_string(),
    })
}

fn part_path(path: &[usize]) -> String {
    path.iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

const BLOCK_ELEMENTS: [&str; 10] = ["p", "div", "li", "tr", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Visible text of an HTML document: comments, scripts and styles dropped, entities decoded
fn strip_html(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::with_capacity(html.len());
    visible_text(document.root_element(), &mut text);
    text
}

fn visible_text(element: ElementRef<'_>, text: &mut String) {
    let name = element.value().name();
    if HIDDEN_ELEMENTS.contains(&name) {
        return;
    }
    if name == "br" {
        text.push('\n');
        return;
    }

    for child in element.children() {
        if let Node::Text(chunk) = child.value() {
            text.push_str(chunk);
        } else if let Some(child) = ElementRef::wrap(child) {
            visible_text(child, text);
        }
    }

    if BLOCK_ELEMENTS.contains(&name) {
        text.push('\n');
    }
}
