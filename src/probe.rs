//! Category-existence collaborators.
//!
//! The category assigner guesses category names and only uses a guess when
//! the category actually exists on the target wiki. The probe is the seam
//! for that check: a live MediaWiki-backed implementation for real runs and
//! deterministic doubles for tests and offline replays.

use std::collections::HashSet;

use reqwest::blocking::Client;

/// Boolean existence query against the target wiki.
///
/// Implementations receive the full category name including the
/// `Category:` prefix.
pub trait CategoryProbe {
    /// Whether the category page exists.
    fn category_exists(&self, category: &str) -> bool;
}

/// Probe that reports no category as existing.
///
/// Used for offline runs: every guessed category falls back to its exact
/// tabled form, which keeps replays deterministic without a live wiki.
#[derive(Debug, Default)]
pub struct NoProbe;

impl CategoryProbe for NoProbe {
    fn category_exists(&self, _category: &str) -> bool {
        false
    }
}

/// Probe backed by a fixed set of existing categories.
#[derive(Debug, Default)]
pub struct FixedProbe {
    existing: HashSet<String>,
}

impl FixedProbe {
    /// Build a probe from category names, with or without prefix.
    #[must_use]
    pub fn new<I, S>(existing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            existing: existing.into_iter().map(prefixed).collect(),
        }
    }
}

impl CategoryProbe for FixedProbe {
    fn category_exists(&self, category: &str) -> bool {
        self.existing.contains(&prefixed(category))
    }
}

/// Normalize a category name to its `Category:`-prefixed form.
#[must_use]
pub fn prefixed(category: impl Into<String>) -> String {
    let category = category.into();
    if category.to_lowercase().starts_with("category:") {
        category
    } else {
        format!("Category:{category}")
    }
}

/// Probe backed by the MediaWiki API of the target wiki.
pub struct WikiProbe {
    client: Client,
    api_url: String,
}

impl WikiProbe {
    /// Commons API endpoint.
    pub const COMMONS_API: &'static str = "https://commons.wikimedia.org/w/api.php";

    /// Create a probe against an API endpoint.
    #[must_use]
    pub fn new(client: Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    fn query_exists(&self, category: &str) -> crate::error::Result<bool> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("titles", category),
            ])
            .send()?
            .error_for_status()?;

        let body: serde_json::Value = serde_json::from_str(&response.text()?)?;
        let exists = body["query"]["pages"]
            .as_array()
            .and_then(|pages| pages.first())
            .map(|page| !page["missing"].as_bool().unwrap_or(false))
            .unwrap_or(false);
        Ok(exists)
    }
}

impl CategoryProbe for WikiProbe {
    fn category_exists(&self, category: &str) -> bool {
        match self.query_exists(category) {
            Ok(exists) => exists,
            Err(error) => {
                tracing::warn!(category, %error, "existence probe failed, assuming missing");
                false
            }
        }
    }
}
