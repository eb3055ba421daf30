//! Read-only lookup tables for the category-generation phase.
//!
//! The tables are produced ahead of time (Wikidata queries, the heritage
//! database, link searches) and consumed here as an immutable snapshot for
//! the duration of one batch run. Acquisition is out of scope; this module
//! only loads the dumped JSON files from a mappings directory.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{HarvestError, Result};

/// Wikidata id plus category for a municipality or parish code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlaceMapping {
    /// Wikidata Qid.
    pub wd: Option<String>,
    /// Commons category, without prefix.
    pub commonscat: Option<String>,
}

/// Category mapping for one classification tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TagMapping {
    /// Category for home-country records.
    #[serde(rename = "SE")]
    pub se: Option<String>,
    /// Cross-country category template with one `{}` country slot.
    pub base: Option<String>,
    /// Country-agnostic fallback category.
    pub default: Option<String>,
}

/// Category mapping for one registry identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistryMapping {
    /// Wikidata Qid.
    pub wd: Option<String>,
    /// Commons category, without prefix.
    pub cat: Option<String>,
}

/// Wikidata references for a matched photographer byline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PhotographerMapping {
    /// Creator template name.
    pub creator: Option<String>,
    /// Commons category, without prefix.
    pub commonscat: Option<String>,
}

/// Registry-id to category tables, one per registry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommonscatMappings {
    pub bbr: HashMap<String, RegistryMapping>,
    pub fmis: HashMap<String, RegistryMapping>,
}

/// The full lookup snapshot consumed by one batch run.
#[derive(Debug, Clone, Default)]
pub struct Mappings {
    /// Municipality code to place mapping.
    pub kommun: HashMap<String, PlaceMapping>,
    /// Parish code to place mapping.
    pub socken: HashMap<String, PlaceMapping>,
    /// Country code to category display form.
    pub countries: HashMap<String, String>,
    /// Classification tag to category mapping.
    pub tags: HashMap<String, TagMapping>,
    /// Tags considered primary subject classes.
    pub primary_classes: Vec<String>,
    /// Photographer byline to Wikidata references.
    pub photographers: HashMap<String, PhotographerMapping>,
    /// KMB id to already-uploaded file names.
    pub kmb_files: HashMap<String, Vec<String>>,
    /// Registry id to category tables.
    pub commonscat: CommonscatMappings,
}

impl Mappings {
    /// Load the snapshot from a mappings directory.
    ///
    /// # Errors
    /// Fails when a file is missing or not valid JSON for its table shape.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            kommun: read_json(&dir.join("kommun.json"))?,
            socken: read_json(&dir.join("socken.json"))?,
            countries: read_json(&dir.join("countries_for_cats.json"))?,
            tags: read_json(&dir.join("tags.json"))?,
            primary_classes: read_json(&dir.join("primary_classes.json"))?,
            photographers: read_json(&dir.join("photographers.json"))?,
            kmb_files: read_json(&dir.join("kmb_files.json"))?,
            commonscat: read_json(&dir.join("commonscat.json"))?,
        })
    }

    /// Files on the target wiki already linking to a given KMB id.
    ///
    /// This is the duplicate-file lookup; an empty slice means no known
    /// duplicates.
    #[must_use]
    pub fn existing_files(&self, kmb_id: &str) -> &[String] {
        self.kmb_files
            .get(kmb_id)
            .map_or(&[], |files| files.as_slice())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| HarvestError::MappingLoad {
        file: path.display().to_string(),
        source,
    })
}
