//! Search API client: paging, record splitting and harvest orchestration.
//!
//! Pages through the K-samsök search API for each configured keyword,
//! splits every result page into record elements and runs each through the
//! record pipeline. Throttling and retry live here, outside the pure core.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use roxmltree::{Document, Node};
use serde::Deserialize;

use crate::config::{search_url, HITS_PER_PAGE, PRESENTATION_NS, THROTTLE_MS};
use crate::error::{HarvestError, Result};
use crate::http::download_text;
use crate::record::parse_record;
use crate::types::KmbRecord;
use crate::xml::{descendants_named, find_descendant, find_descendant_ns};

/// Harvest settings: API key plus the keywords to search for.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_key: String,
    pub keywords: Vec<String>,
}

/// Load settings from a JSON file.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| HarvestError::SettingsLoad {
        file: path.display().to_string(),
        source,
    })
}

/// Extract the total number of hits from a search result page.
pub fn total_hits(doc: &Document<'_>) -> Result<u32> {
    let node = find_descendant(doc.root_element(), "totalHits").ok_or_else(|| {
        HarvestError::MissingElement {
            element: "totalHits".to_string(),
            context: "search result".to_string(),
        }
    })?;
    let text = node.text().unwrap_or_default().trim();
    text.parse().map_err(|_| HarvestError::MissingElement {
        element: "totalHits".to_string(),
        context: format!("search result (unparsable value '{text}')"),
    })
}

/// All record elements of a search result page, in document order.
pub fn record_nodes<'a, 'input>(
    doc: &'a Document<'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    descendants_named(doc.root_element(), "record")
}

/// The KMB id of an unprocessed record element.
pub fn record_id(record: Node<'_, '_>) -> Option<String> {
    find_descendant_ns(record, PRESENTATION_NS, "id")
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Harvest all records matching one keyword.
///
/// Pages through the API until an empty page, de-duplicating by record id
/// (first hit wins) and throttling between pages. Returns the records keyed
/// by id; the ordered map keeps reruns byte-identical.
///
/// # Errors
/// Network failures after retries, unparsable XML and structural depicted
/// URI violations all abort the keyword.
pub fn harvest_keyword(
    client: &Client,
    api_base: &str,
    api_key: &str,
    keyword: &str,
) -> Result<BTreeMap<String, KmbRecord>> {
    let mut results = BTreeMap::new();
    let mut start_at = 1;
    let mut counter: u32 = 0;

    loop {
        let url = search_url(api_base, api_key, HITS_PER_PAGE, start_at, keyword);
        let xml = download_text(client, &url)?;
        let doc = Document::parse(&xml)?;
        let total = total_hits(&doc)?;

        let mut records_on_page = 0;
        for record in record_nodes(&doc) {
            records_on_page += 1;
            counter += 1;

            let Some(id) = record_id(record) else {
                tracing::warn!(keyword, "record without id, skipped");
                continue;
            };
            if results.contains_key(&id) {
                continue;
            }
            let parsed = parse_record(record, &*id)?;
            results.insert(id, parsed);

            if counter % 100 == 0 {
                tracing::info!(keyword, processed = counter, total, "parsing records");
            }
        }

        if records_on_page == 0 {
            break;
        }
        start_at += HITS_PER_PAGE;
        thread::sleep(Duration::from_millis(THROTTLE_MS));
    }

    Ok(results)
}
