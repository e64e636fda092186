//! Lossy, URL-safe event identifiers of the form `<sport>-<match>-<timestamp>`.
//!
//! Encoding keeps only the normalized sport and match text plus the start
//! timestamp. Collisions are not prevented here; [`crate::resolver`] settles
//! them when a slug is looked up.

use crate::errors::SlugError;
use crate::models::Event;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static NON_ALNUM_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Timestamp and text tokens recovered from a slug
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSlug {
    pub timestamp: i64,
    pub tokens: Vec<String>,
}

impl DecodedSlug {
    /// The slug text with its timestamp suffix stripped
    pub fn text(&self) -> String {
        self.tokens.join("-")
    }
}

/// Lowercase `text` and collapse every run of non-alphanumerics into one `-`.
pub fn normalize(text: &str) -> String {
    let lower = text.to_lowercase();
    NON_ALNUM_RUN
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

pub fn encode(event: &Event) -> Slug {
    Slug(format!(
        "{}-{}-{}",
        normalize(&event.sport),
        normalize(&event.matchup),
        event.timestamp
    ))
}

pub fn decode(slug: &str) -> Result<DecodedSlug, SlugError> {
    let lower = slug.to_lowercase();
    let segments: Vec<&str> = lower.split('-').collect();

    if segments.len() < 2 {
        return Err(SlugError::InvalidSlugFormat(slug.to_string()));
    }

    let (last, rest) = segments
        .split_last()
        .ok_or_else(|| SlugError::InvalidSlugFormat(slug.to_string()))?;

    if last.is_empty() || !last.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SlugError::InvalidTimestamp(last.to_string()));
    }
    let timestamp = last
        .parse::<i64>()
        .map_err(|_| SlugError::InvalidTimestamp(last.to_string()))?;

    let tokens = rest
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();

    Ok(DecodedSlug { timestamp, tokens })
}
