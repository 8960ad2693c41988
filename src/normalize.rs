//! Text cleanup applied to extracted body text

use crate::error::{ExtractError, Result, json_kind};
use crate::pattern::{
    DISALLOWED_CHARS, INVISIBLE_SEPARATORS, NEWLINE_RUNS, ZERO_WIDTH, compiled,
};
use serde_json::Value;
use tracing::debug;

/// Full cleanup: drop zero-width and non-word characters, then [`clean_whitespace`].
///
/// Word characters, whitespace and the Latin-1 Supplement / Latin Extended-A
/// letters (U+00C0 to U+017F) survive; punctuation does not. The result is
/// stable under repeated application.
pub fn normalize(text: &str) -> Result<String> {
    let stripped = strip_unicode(text).map_err(formatting)?;
    clean_whitespace(&stripped)
}

/// Like [`normalize`], but hands back the input unchanged if cleanup fails
#[must_use]
pub fn normalize_or_original(text: &str) -> String {
    normalize(text).unwrap_or_else(|err| {
        debug!("Keeping original text after normalization failure: {err}");
        text.to_string()
    })
}

/// Normalize a loosely typed value.
///
/// Non-string input is a [`ExtractError::Formatting`] error, unless `silent` is
/// set, in which case the value's JSON text is returned untouched.
pub fn normalize_value(value: &Value, silent: bool) -> Result<String> {
    match value {
        Value::String(text) if silent => Ok(normalize_or_original(text)),
        Value::String(text) => normalize(text),
        other if silent => Ok(other.to_string()),
        other => Err(ExtractError::Formatting(format!(
            "expected text, got {}",
            json_kind(other)
        ))),
    }
}

/// Whitespace-only cleanup: drop invisible separators, collapse blank-line runs, trim
pub fn clean_whitespace(text: &str) -> Result<String> {
    if text.is_empty() {
        return Ok(String::new());
    }

    let invisible = compiled(&INVISIBLE_SEPARATORS).map_err(formatting)?;
    let newline_runs = compiled(&NEWLINE_RUNS).map_err(formatting)?;

    // Separators go first so that removing them cannot leave new newline runs
    let visible = invisible.replace_all(text, "");
    let collapsed = newline_runs.replace_all(&visible, "\n");
    Ok(collapsed.trim().to_string())
}

fn strip_unicode(text: &str) -> Result<String> {
    let zero_width = compiled(&ZERO_WIDTH)?;
    let disallowed = compiled(&DISALLOWED_CHARS)?;

    let without_zero_width = zero_width.replace_all(text, "");
    Ok(disallowed.replace_all(&without_zero_width, "").into_owned())
}

fn formatting(err: ExtractError) -> ExtractError {
    match err {
        ExtractError::Formatting(_) => err,
        other => ExtractError::Formatting(other.to_string()),
    }
}
