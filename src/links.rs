//! Link de-duplication in full-URL and domain-only modes

use crate::error::{ExtractError, Result};
use crate::pattern::{BASIC_LINK, DETAILED_LINK, compiled};
use crate::types::{LinkMode, Links};
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};

/// Unique `http(s)://` URLs, each running up to the next whitespace.
///
/// Every input string may hold any number of links. Values keep their
/// original casing and come back in first-seen order; treat them as a set.
pub fn extract_detailed<S: AsRef<str>>(links: &[S]) -> Result<Vec<String>> {
    info!("Preparing detailed links");
    let unique = unique_matches(compiled(&DETAILED_LINK)?, links);
    debug!("Unique detailed link(s): {}", unique.len());
    Ok(unique)
}

/// Unique `http(s)://host[:port]` prefixes, cut before the first `/`, `?` or `#`
pub fn extract_basic<S: AsRef<str>>(links: &[S]) -> Result<Vec<String>> {
    info!("Preparing basic links");
    let unique = unique_matches(compiled(&BASIC_LINK)?, links);
    debug!("Unique basic link(s): {}", unique.len());
    Ok(unique)
}

/// [`extract_detailed`] over loosely typed input, which must be an array of strings
pub fn extract_detailed_value(links: &Value) -> Result<Vec<String>> {
    extract_detailed(&string_items(links)?)
}

/// [`extract_basic`] over loosely typed input, which must be an array of strings
pub fn extract_basic_value(links: &Value) -> Result<Vec<String>> {
    extract_basic(&string_items(links)?)
}

/// Borrow every element of a JSON array as a string
pub fn string_items(value: &Value) -> Result<Vec<&str>> {
    let items = value
        .as_array()
        .ok_or_else(|| ExtractError::type_mismatch("list of strings", value))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .ok_or_else(|| ExtractError::type_mismatch("string link", item))
        })
        .collect()
}

impl LinkMode {
    /// Run the extractor for this mode; `None` attaches nothing
    pub fn extract<S: AsRef<str>>(self, links: &[S]) -> Result<Option<Links>> {
        let values = match self {
            Self::None => return Ok(None),
            Self::Basic => extract_basic(links)?,
            Self::Detailed => extract_detailed(links)?,
        };
        Ok(Some(Links::from_values(values)))
    }
}

fn unique_matches<S: AsRef<str>>(pattern: &Regex, inputs: &[S]) -> Vec<String> {
    debug!("Scanning {} link candidate(s)", inputs.len());

    let mut seen = HashSet::new();
    inputs
        .iter()
        .flat_map(|input| pattern.find_iter(input.as_ref()))
        .map(|found| found.as_str())
        .filter(|link| seen.insert(*link))
        .map(str::to_string)
        .collect()
}
