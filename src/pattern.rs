//! Fixed matching patterns shared by the extraction stages

use crate::error::{ExtractError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// A lazily compiled pattern that keeps its compile error instead of panicking
pub type Pattern = LazyLock<std::result::Result<Regex, regex::Error>>;

/// Any `http(s)://` or `www.` token, as embedded in body text
pub static HTTP_HTTPS_URL: Pattern = LazyLock::new(|| Regex::new(r"(?:https?://|www\.)\S+"));

/// Full URL up to the next whitespace
pub static DETAILED_LINK: Pattern = LazyLock::new(|| Regex::new(r"https?://\S+"));

/// Scheme and authority only: stops at the first path, query or fragment delimiter
pub static BASIC_LINK: Pattern = LazyLock::new(|| Regex::new(r"https?://[^/?#\s]+"));

/// Loose mailbox match used when a header value is not RFC 5322 parseable
pub static EMAIL_ADDRESS: Pattern = LazyLock::new(|| Regex::new(r"[\w.-]+@[\w.-]+"));

pub static ZERO_WIDTH: Pattern = LazyLock::new(|| Regex::new(r"[\x{200C}\x{200B}\x{A0}]+"));

pub static DISALLOWED_CHARS: Pattern =
    LazyLock::new(|| Regex::new(r"[^\w\s\x{C0}-\x{17F}]"));

pub static INVISIBLE_SEPARATORS: Pattern =
    LazyLock::new(|| Regex::new(r"[\x{2000}-\x{200F}\x{2028}\x{2029}\x{202A}-\x{202F}]"));

pub static NEWLINE_RUNS: Pattern = LazyLock::new(|| Regex::new(r"(?:\r\n|\n|\r){2,}"));

/// Borrow the compiled regex, surfacing a compile failure as [`ExtractError::Pattern`]
pub fn compiled(pattern: &'static Pattern) -> Result<&'static Regex> {
    pattern
        .as_ref()
        .map_err(|err| ExtractError::Pattern(err.clone()))
}
