//! Data models for upstream news items and the proxy command.
//!
//! The upstream list endpoint returns an array of loosely-shaped objects;
//! every field is optional in practice, so [`NewsItem`] defaults each one
//! rather than failing the whole payload over a single sparse record. The
//! camelCase field names on [`FetchCommand`] match the proxy's wire schema.

use serde::{Deserialize, Serialize};

/// One entry from the publisher's latest-news JSON list.
///
/// Upstream order is preserved end to end; this type enforces no uniqueness
/// or ordering of its own.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewsItem {
    /// Article title.
    #[serde(default)]
    pub headline: String,
    /// Canonical article link.
    #[serde(default)]
    pub url: String,
    /// Optional summary text.
    #[serde(default)]
    pub description: String,
    /// Optional thumbnail image URL.
    #[serde(default)]
    pub thumb: Option<String>,
}

impl NewsItem {
    /// A record with neither headline nor link cannot produce a meaningful
    /// feed entry and is silently skipped by the renderer.
    pub fn is_blank(&self) -> bool {
        self.headline.trim().is_empty() && self.url.trim().is_empty()
    }
}

/// Command body sent to the browser-emulation proxy.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchCommand<'a> {
    command: &'static str,
    target_url: &'a str,
    max_timeout_ms: u64,
}

impl<'a> FetchCommand<'a> {
    /// Build a browser-GET command for `target_url` with the given
    /// page-load budget in milliseconds.
    pub fn get(target_url: &'a str, max_timeout_ms: u64) -> Self {
        Self {
            command: "fetch-via-browser",
            target_url,
            max_timeout_ms,
        }
    }
}
