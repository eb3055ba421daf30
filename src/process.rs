//! Batch driver for the category-generation phase.
//!
//! Loads harvested records, skips the ones with accumulated problems and
//! builds the per-file upload information (filename, description template,
//! content and meta categories) against a shared mapping snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::categories::CategoryAssigner;
use crate::description::{filename, info_template};
use crate::mappings::Mappings;
use crate::probe::CategoryProbe;
use crate::types::KmbRecord;

/// Upload-ready information for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedItem {
    /// Target filename without extension.
    pub filename: String,
    /// Rendered information template.
    pub info: String,
    /// Content categories, ordered, without prefix.
    pub content_cats: Vec<String>,
    /// Meta categories, ordered, without prefix.
    pub meta_cats: Vec<String>,
}

/// Outcome of one processing run.
#[derive(Debug, Default)]
pub struct ProcessOutcome {
    /// Processed items keyed by record id.
    pub items: BTreeMap<String, ProcessedItem>,
    /// Ids of records that were skipped, with the reason.
    pub skipped: Vec<(String, String)>,
}

/// Process all harvested records against one mapping snapshot.
///
/// Records with problems are skipped and logged; the disposition mirrors
/// the problem list accumulated during harvesting. Records without a name
/// cannot produce a filename and are skipped as well.
pub fn process_records(
    data: &BTreeMap<String, KmbRecord>,
    mappings: &Mappings,
    probe: &dyn CategoryProbe,
) -> ProcessOutcome {
    let mut assigner = CategoryAssigner::new(mappings, probe);
    let mut outcome = ProcessOutcome::default();

    for (id, rec) in data {
        if !rec.is_clean() {
            let reason = rec.problem.join("\n");
            tracing::info!(id = %id, reason = %reason, "image was skipped");
            outcome.skipped.push((id.clone(), reason));
            continue;
        }
        let Some(filename) = filename(rec) else {
            tracing::info!(id = %id, "image was skipped: no name to derive a filename from");
            outcome
                .skipped
                .push((id.clone(), "no name to derive a filename from".to_string()));
            continue;
        };

        let cats = assigner.assign(rec);
        outcome.items.insert(
            id.clone(),
            ProcessedItem {
                filename,
                info: info_template(rec, mappings),
                content_cats: cats.content(),
                meta_cats: cats.meta(),
            },
        );
    }

    outcome
}
