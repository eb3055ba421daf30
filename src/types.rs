//! Core data types for the harvester.
//!
//! `KmbRecord` is the central entity: one per source image, with every field
//! the pipeline can produce enumerated explicitly. Serialization keys match
//! the established data-blob spelling (`ID`, `dateFrom`, `kommunName`, ...)
//! so downstream tooling keeps working.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A normalized metadata record for a single KMB image.
///
/// Missing source data is represented as `None` or an empty collection,
/// never as an error. Non-fatal issues accumulate in `problem`; an empty
/// list means the record is clean and the publish/skip decision is left to
/// the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KmbRecord {
    /// Stable KMB identifier, the unique key of the record.
    #[serde(rename = "ID")]
    pub id: String,

    /// Item label.
    pub namn: Option<String>,

    /// Free-text description.
    pub beskrivning: Option<String>,

    /// Photographer byline. Raw on extraction; normalized in place to
    /// "Given Surname" or one of the placeholder templates.
    pub byline: Option<String>,

    /// Motif; either the same as the label or a free-text description.
    pub motiv: Option<String>,

    /// Copyright holder string.
    pub copyright: Option<String>,

    /// License code, stripped of its URI prefix during resolution.
    pub license: Option<String>,

    /// Render-ready license statement. Only set after byline normalization;
    /// absent when the license could not be mapped to a free template.
    pub license_text: Option<String>,

    /// Source URL of the image.
    pub source: Option<String>,

    /// Thumbnail URL.
    pub thumbnail: Option<String>,

    /// Image designation (bildbeteckning).
    pub bildbeteckning: Option<String>,

    /// Derived display date.
    pub date: Option<String>,

    /// Start of the date range.
    #[serde(rename = "dateFrom")]
    pub date_from: Option<String>,

    /// End of the date range.
    #[serde(rename = "dateTo")]
    pub date_to: Option<String>,

    /// Historical province name.
    pub landskap: Option<String>,

    /// County name.
    pub lan: Option<String>,

    /// Country code, upper-cased during normalization.
    pub land: Option<String>,

    /// Municipality code, zero-padded to four digits.
    pub kommun: Option<String>,

    /// Municipality name.
    #[serde(rename = "kommunName")]
    pub kommun_name: Option<String>,

    /// Parish code, zero-padded to four digits.
    pub socken: Option<String>,

    /// Parish name.
    #[serde(rename = "sockenName")]
    pub socken_name: Option<String>,

    /// Latitude in decimal degrees, truncated precision.
    pub latitude: Option<String>,

    /// Longitude in decimal degrees, truncated precision.
    pub longitude: Option<String>,

    /// Listed-building registry identifiers depicted by the image.
    pub bbr: BTreeSet<String>,

    /// Archaeological-monument registry identifiers depicted by the image.
    pub fmis: BTreeSet<String>,

    /// Rendered depiction citations, in encounter order.
    pub avbildar: Vec<String>,

    /// Classification tags from the item-class vocabulary.
    pub item_classes: Vec<String>,

    /// Classification tags from the keyword vocabulary.
    pub item_keywords: Vec<String>,

    /// Accumulated non-fatal problems. Empty when the record is clean.
    pub problem: Vec<String>,
}

impl KmbRecord {
    /// Create an empty record for the given identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Whether the record accumulated no problems.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.problem.is_empty()
    }

    /// Record a non-fatal problem.
    pub fn add_problem(&mut self, note: impl Into<String>) {
        self.problem.push(note.into());
    }

    /// Whether the record belongs to the home country.
    ///
    /// An absent or empty country code is assumed to mean the home country.
    #[must_use]
    pub fn is_home_country(&self) -> bool {
        self.land
            .as_deref()
            .map_or(true, |l| l.is_empty() || l == crate::config::HOME_COUNTRY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_clean() {
        let rec = KmbRecord::new("16000300035205");
        assert_eq!(rec.id, "16000300035205");
        assert!(rec.is_clean());
        assert!(rec.avbildar.is_empty());
    }

    #[test]
    fn test_add_problem() {
        let mut rec = KmbRecord::new("1");
        rec.add_problem("Coord was not a point: \",\"");
        assert!(!rec.is_clean());
        assert_eq!(rec.problem.len(), 1);
    }

    #[test]
    fn test_is_home_country() {
        let mut rec = KmbRecord::new("1");
        assert!(rec.is_home_country());
        rec.land = Some(String::new());
        assert!(rec.is_home_country());
        rec.land = Some("SE".to_string());
        assert!(rec.is_home_country());
        rec.land = Some("DK".to_string());
        assert!(!rec.is_home_country());
    }

    #[test]
    fn test_serialization_keys() {
        let mut rec = KmbRecord::new("123");
        rec.date_from = Some("1992-06-01".to_string());
        rec.kommun_name = Some("Tyresö".to_string());

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["ID"], "123");
        assert_eq!(json["dateFrom"], "1992-06-01");
        assert_eq!(json["kommunName"], "Tyresö");
        assert!(json["license_text"].is_null());
    }

    #[test]
    fn test_roundtrip() {
        let mut rec = KmbRecord::new("123");
        rec.bbr.insert("21400000440251".to_string());
        rec.avbildar.push("{{BBR|21400000440251|b}}".to_string());

        let json = serde_json::to_string(&rec).unwrap();
        let back: KmbRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, back);
    }
}
