//! Record assembly: the full transformation of one XML record.
//!
//! Runs extraction, depiction resolution and the normalizers in a fixed
//! order over a single mutable record. The record is returned regardless of
//! accumulated problems; the publish/skip decision belongs to the caller.

use roxmltree::Node;

use crate::depicted::process_depicted;
use crate::error::Result;
use crate::extract::{depicted_urls, extract_coordinates, extract_fields, extract_tags};
use crate::license::resolve_license;
use crate::normalize::{backfill_gotland, collapse_date, normalize_byline, normalize_ids};
use crate::types::KmbRecord;

/// Transform one XML record element into a normalized record.
///
/// # Errors
/// Only a structural violation in a depicted URI aborts the transformation;
/// every other data gap lands in the record as an absent value or a problem
/// note.
pub fn parse_record(node: Node<'_, '_>, id: impl Into<String>) -> Result<KmbRecord> {
    let mut rec = KmbRecord::new(id);

    extract_fields(node, &mut rec);
    extract_coordinates(node, &mut rec);
    for url in depicted_urls(node) {
        process_depicted(&mut rec, &url)?;
    }
    extract_tags(node, &mut rec);

    collapse_date(&mut rec);
    normalize_byline(&mut rec);
    // license resolution relies on the normalized byline
    resolve_license(&mut rec);
    normalize_ids(&mut rec);
    backfill_gotland(&mut rec);

    Ok(rec)
}
