//! Tiered category assignment for processed records.
//!
//! Three tiers, each short-circuiting the later ones for the same subject
//! area: registry-backed categories, tag-vocabulary categories, explicit
//! place categories. Guessed category names are only used once the
//! existence probe confirms them; replies are cached for the lifetime of
//! the batch run.

use std::collections::{BTreeSet, HashMap};

use crate::config::{maintenance_category, BATCH_CAT};
use crate::mappings::Mappings;
use crate::probe::{prefixed, CategoryProbe};
use crate::types::KmbRecord;

/// National-level fallback when no listed-building category can be verified.
const BBR_NATIONAL_FALLBACK: &str = "Listed buildings in Sweden";

/// Tag restating the archaeological-monument fallback.
const FMIS_RESTATEMENT_TAG: &str = "Fornminnen";

/// Tag prefix restating the listed-building fallback.
const BBR_RESTATEMENT_PREFIX: &str = "Byggnadsminnen";

/// Per-record category accumulator.
///
/// Content categories describe subject matter; meta categories are process
/// flags. Both render as ordered, duplicate-free lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    content: BTreeSet<String>,
    meta: BTreeSet<String>,
}

impl Categories {
    /// Add a content category.
    pub fn add_content(&mut self, category: impl Into<String>) {
        self.content.insert(category.into());
    }

    /// Add a meta category.
    pub fn add_meta(&mut self, category: impl Into<String>) {
        self.meta.insert(category.into());
    }

    /// Content categories as an ordered list, without prefix.
    #[must_use]
    pub fn content(&self) -> Vec<String> {
        self.content.iter().cloned().collect()
    }

    /// Meta categories as an ordered list, without prefix.
    #[must_use]
    pub fn meta(&self) -> Vec<String> {
        self.meta.iter().cloned().collect()
    }

    fn has_content(&self) -> bool {
        !self.content.is_empty()
    }
}

/// Category assigner for one batch run.
///
/// Holds the read-only mapping snapshot, the existence-probe collaborator
/// and the per-run existence cache. Construct once and reuse across all
/// records of the run; the cache is append-only and never invalidated
/// mid-run.
pub struct CategoryAssigner<'a> {
    mappings: &'a Mappings,
    probe: &'a dyn CategoryProbe,
    cache: HashMap<String, bool>,
}

impl<'a> CategoryAssigner<'a> {
    /// Create an assigner over a mapping snapshot and a probe.
    pub fn new(mappings: &'a Mappings, probe: &'a dyn CategoryProbe) -> Self {
        Self {
            mappings,
            probe,
            cache: HashMap::new(),
        }
    }

    /// Assign content and meta categories for one record.
    #[must_use]
    pub fn assign(&mut self, rec: &KmbRecord) -> Categories {
        let mut cats = Categories::default();
        let mut needs_place_cat = true;

        let found_registry = self.registry_categories(rec, &mut cats, &mut needs_place_cat);
        if !found_registry {
            self.class_categories(rec, &mut cats, &mut needs_place_cat);
            self.keyword_categories(rec, &mut cats, &mut needs_place_cat);
        }
        if needs_place_cat && rec.is_home_country() {
            self.place_category(rec, &mut cats);
        }
        self.meta_categories(rec, &mut cats);

        cats
    }

    /// Check category existence through the cache.
    fn category_exists(&mut self, category: &str) -> bool {
        let key = prefixed(category);
        if let Some(&exists) = self.cache.get(&key) {
            return exists;
        }
        let exists = self.probe.category_exists(&key);
        self.cache.insert(key, exists);
        exists
    }

    /// Tier 1: categories from depicted registry entries.
    ///
    /// Returns whether any identifier hit the registry-to-category table;
    /// misses fall back to verified place-level guesses.
    fn registry_categories(
        &mut self,
        rec: &KmbRecord,
        cats: &mut Categories,
        needs_place_cat: &mut bool,
    ) -> bool {
        let mut found = false;

        for fmis_id in &rec.fmis {
            match self
                .mappings
                .commonscat
                .fmis
                .get(fmis_id)
                .and_then(|m| m.cat.clone())
            {
                Some(cat) => {
                    found = true;
                    cats.add_content(cat);
                }
                None => self.default_fmis_category(rec, cats, needs_place_cat),
            }
        }
        for bbr_id in &rec.bbr {
            match self
                .mappings
                .commonscat
                .bbr
                .get(bbr_id)
                .and_then(|m| m.cat.clone())
            {
                Some(cat) => {
                    found = true;
                    cats.add_content(cat);
                }
                None => self.default_bbr_category(rec, cats, needs_place_cat),
            }
        }

        if found {
            *needs_place_cat = false;
        }
        found
    }

    /// Default archaeological-monument categories by municipality.
    ///
    /// Falls back to the county category when no municipal category can be
    /// verified; the historical province category is always added.
    fn default_fmis_category(
        &mut self,
        rec: &KmbRecord,
        cats: &mut Categories,
        needs_place_cat: &mut bool,
    ) {
        match self.municipal_subcategory("Archaeological monuments in {}", rec) {
            Some(cat) => {
                *needs_place_cat = false;
                cats.add_content(cat);
            }
            None => {
                cats.add_content(format!(
                    "Archaeological monuments in {} County",
                    rec.lan.as_deref().unwrap_or_default()
                ));
            }
        }
        cats.add_content(format!(
            "Archaeological monuments in {}",
            rec.landskap.as_deref().unwrap_or_default()
        ));
    }

    /// Default listed-building categories by municipality.
    ///
    /// Falls back to the county category when it exists, else the national
    /// category with a log line since that is the least useful outcome.
    fn default_bbr_category(
        &mut self,
        rec: &KmbRecord,
        cats: &mut Categories,
        needs_place_cat: &mut bool,
    ) {
        if let Some(cat) = self.municipal_subcategory("Listed buildings in {}", rec) {
            *needs_place_cat = false;
            cats.add_content(cat);
            return;
        }

        let county_cat = format!(
            "Listed buildings in {} County",
            rec.lan.as_deref().unwrap_or_default()
        );
        if self.category_exists(&county_cat) {
            cats.add_content(county_cat);
        } else {
            tracing::warn!(id = %rec.id, "had to fall back on \"{BBR_NATIONAL_FALLBACK}\"");
            cats.add_content(BBR_NATIONAL_FALLBACK);
        }
    }

    /// Find a verified municipality-level subcategory for a category stem.
    ///
    /// Tries "<stem> in <Municipality> Municipality" first, then the bare
    /// municipality name; the stem is a format string with one `{}` slot.
    fn municipal_subcategory(&mut self, cat_base: &str, rec: &KmbRecord) -> Option<String> {
        let name = rec.kommun_name.as_deref().filter(|n| !n.is_empty())?;

        let test_cat = cat_base.replace("{}", &format!("{name} Municipality"));
        if self.category_exists(&test_cat) {
            return Some(test_cat);
        }
        let test_cat = cat_base.replace("{}", name);
        if self.category_exists(&test_cat) {
            return Some(test_cat);
        }
        None
    }

    /// Tier 2a: categories from the item-class vocabulary.
    ///
    /// Primary classes are tried first; unless every primary class mapped,
    /// all classes are mapped.
    fn class_categories(
        &mut self,
        rec: &KmbRecord,
        cats: &mut Categories,
        needs_place_cat: &mut bool,
    ) {
        let primary = self.isolate_primary_classes(rec);

        let mut all_mapped = !primary.is_empty();
        for tag in &primary {
            all_mapped &= self.single_tag(rec, tag, cats, needs_place_cat);
        }
        if !all_mapped {
            for tag in &rec.item_classes {
                self.single_tag(rec, tag, cats, needs_place_cat);
            }
        }
    }

    /// Tier 2b: categories from the keyword vocabulary.
    fn keyword_categories(
        &mut self,
        rec: &KmbRecord,
        cats: &mut Categories,
        needs_place_cat: &mut bool,
    ) {
        for tag in &rec.item_keywords {
            self.single_tag(rec, tag, cats, needs_place_cat);
        }
    }

    /// Item classes that are also primary subject classes.
    #[must_use]
    pub fn isolate_primary_classes(&self, rec: &KmbRecord) -> Vec<String> {
        rec.item_classes
            .iter()
            .filter(|c| self.mappings.primary_classes.contains(c))
            .cloned()
            .collect()
    }

    /// Map a single tag to a category.
    ///
    /// Skips tags that merely restate a registry fallback. Home-country
    /// records prefer a verified municipal specialization of the SE
    /// category; foreign records render the cross-country template and use
    /// it only when verified. The country-agnostic default closes the gap.
    ///
    /// Returns whether a category was added.
    fn single_tag(
        &mut self,
        rec: &KmbRecord,
        tag: &str,
        cats: &mut Categories,
        needs_place_cat: &mut bool,
    ) -> bool {
        // avoid duplicating the registry fallback semantics
        if (!rec.fmis.is_empty() && tag == FMIS_RESTATEMENT_TAG)
            || (!rec.bbr.is_empty() && tag.starts_with(BBR_RESTATEMENT_PREFIX))
        {
            return false;
        }

        let Some(entry) = self.mappings.tags.get(tag) else {
            return false;
        };
        let entry = entry.clone();
        let land = rec.land.as_deref().unwrap_or("");

        let mut cat = None;
        if rec.is_home_country() && entry.se.is_some() {
            cat = entry.se.clone();
            if let Some(se_cat) = entry.se.as_deref() {
                let cat_base = se_cat.replace("Sweden", "{}");
                if let Some(test_cat) = self.municipal_subcategory(&cat_base, rec) {
                    *needs_place_cat = false;
                    cat = Some(test_cat);
                }
            }
        } else if let (Some(display), Some(base)) =
            (self.mappings.countries.get(land), entry.base.as_deref())
        {
            let test_cat = base.replace("{}", display);
            if self.category_exists(&test_cat) {
                *needs_place_cat = false;
                cat = Some(test_cat);
            }
        }

        if cat.is_none() {
            cat = entry.default.clone();
        }

        match cat {
            Some(cat) => {
                cats.add_content(cat);
                true
            }
            None => false,
        }
    }

    /// Tier 3: explicit place category from parish or municipality tables.
    fn place_category(&self, rec: &KmbRecord, cats: &mut Categories) {
        let place_cat = rec
            .socken
            .as_deref()
            .and_then(|code| self.mappings.socken.get(code))
            .and_then(|m| m.commonscat.clone())
            .or_else(|| {
                rec.kommun
                    .as_deref()
                    .and_then(|code| self.mappings.kommun.get(code))
                    .and_then(|m| m.commonscat.clone())
            });

        match place_cat {
            Some(cat) => cats.add_content(cat),
            None => cats.add_meta(maintenance_category("needing categorisation (place)")),
        }
    }

    /// Final maintenance-category derivation.
    fn meta_categories(&self, rec: &KmbRecord, cats: &mut Categories) {
        cats.add_meta(BATCH_CAT);

        if !cats.has_content() {
            cats.add_meta(maintenance_category("needing categorisation"));
        }
        if let Some(cat) = self.photographer_category(rec) {
            cats.add_meta(cat);
        }
        if !self.mappings.existing_files(&rec.id).is_empty() {
            cats.add_meta(maintenance_category("with potential duplicates"));
        }
        if !rec.is_home_country() {
            cats.add_meta(maintenance_category("needing categorisation (not from Sweden)"));
        }
        let has_kommun = rec.kommun.as_deref().is_some_and(|k| !k.is_empty());
        let has_region = rec.lan.as_deref().is_some_and(|l| !l.is_empty())
            || rec.landskap.as_deref().is_some_and(|l| !l.is_empty());
        if rec.is_home_country() && !has_kommun && !has_region {
            cats.add_meta(maintenance_category("needing categorisation (no municipality)"));
        }
    }

    /// The commonscat for the photographer, if mapped.
    #[must_use]
    pub fn photographer_category(&self, rec: &KmbRecord) -> Option<String> {
        rec.byline
            .as_deref()
            .and_then(|byline| self.mappings.photographers.get(byline))
            .and_then(|m| m.commonscat.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappings::{PlaceMapping, RegistryMapping, TagMapping};
    use crate::probe::{FixedProbe, NoProbe};

    fn mappings() -> Mappings {
        let mut m = Mappings::default();
        m.commonscat.bbr.insert(
            "21400000440251".to_string(),
            RegistryMapping {
                wd: Some("Q1".to_string()),
                cat: Some("Tyresö slott".to_string()),
            },
        );
        m.tags.insert(
            "Kyrkor".to_string(),
            TagMapping {
                se: Some("Churches in Sweden".to_string()),
                base: Some("Churches in {}".to_string()),
                default: Some("Churches".to_string()),
            },
        );
        m.tags.insert(
            "Fornminnen".to_string(),
            TagMapping {
                se: Some("Archaeological monuments in Sweden".to_string()),
                base: None,
                default: None,
            },
        );
        m.primary_classes.push("Kyrkor".to_string());
        m.countries.insert("DK".to_string(), "Denmark".to_string());
        m.socken.insert(
            "0103".to_string(),
            PlaceMapping {
                wd: Some("Q10688516".to_string()),
                commonscat: Some("Tyresö socken".to_string()),
            },
        );
        m.kommun.insert(
            "0138".to_string(),
            PlaceMapping {
                wd: Some("Q493083".to_string()),
                commonscat: Some("Tyresö Municipality".to_string()),
            },
        );
        m.kmb_files
            .insert("dup1".to_string(), vec!["File:Existing.jpg".to_string()]);
        m
    }

    fn swedish_record(id: &str) -> KmbRecord {
        let mut rec = KmbRecord::new(id);
        rec.land = Some("SE".to_string());
        rec.lan = Some("Stockholm".to_string());
        rec.landskap = Some("Södermanland".to_string());
        rec.kommun = Some("0138".to_string());
        rec.kommun_name = Some("Tyresö".to_string());
        rec
    }

    #[test]
    fn test_registry_hit_short_circuits_tags_and_place() {
        let m = mappings();
        let mut assigner = CategoryAssigner::new(&m, &NoProbe);

        let mut rec = swedish_record("1");
        rec.bbr.insert("21400000440251".to_string());
        rec.item_classes.push("Kyrkor".to_string());

        let cats = assigner.assign(&rec);
        assert_eq!(cats.content(), vec!["Tyresö slott"]);
        assert_eq!(cats.meta(), vec![BATCH_CAT.to_string()]);
    }

    #[test]
    fn test_bbr_miss_falls_back_to_verified_municipality() {
        let m = mappings();
        let probe = FixedProbe::new(["Listed buildings in Tyresö Municipality"]);
        let mut assigner = CategoryAssigner::new(&m, &probe);

        let mut rec = swedish_record("1");
        rec.bbr.insert("21400000999999".to_string());

        let cats = assigner.assign(&rec);
        assert_eq!(cats.content(), vec!["Listed buildings in Tyresö Municipality"]);
    }

    #[test]
    fn test_bbr_miss_falls_back_to_county_then_nation() {
        let m = mappings();
        let probe = FixedProbe::new(["Listed buildings in Stockholm County"]);
        let mut assigner = CategoryAssigner::new(&m, &probe);

        let mut rec = swedish_record("1");
        rec.bbr.insert("21400000999999".to_string());
        let cats = assigner.assign(&rec);
        assert!(cats
            .content()
            .contains(&"Listed buildings in Stockholm County".to_string()));
        // place tier still runs since no municipal category was verified
        assert!(cats.content().contains(&"Tyresö Municipality".to_string()));

        let mut assigner = CategoryAssigner::new(&m, &NoProbe);
        let cats = assigner.assign(&rec);
        assert!(cats.content().contains(&"Listed buildings in Sweden".to_string()));
    }

    #[test]
    fn test_fmis_miss_adds_county_and_province() {
        let m = mappings();
        let mut assigner = CategoryAssigner::new(&m, &NoProbe);

        let mut rec = swedish_record("1");
        rec.fmis.insert("10028201230001".to_string());

        let cats = assigner.assign(&rec);
        let content = cats.content();
        assert!(content.contains(&"Archaeological monuments in Stockholm County".to_string()));
        assert!(content.contains(&"Archaeological monuments in Södermanland".to_string()));
    }

    #[test]
    fn test_tag_municipal_specialization_preferred() {
        let m = mappings();
        let probe = FixedProbe::new(["Churches in Tyresö Municipality"]);
        let mut assigner = CategoryAssigner::new(&m, &probe);

        let mut rec = swedish_record("1");
        rec.item_classes.push("Kyrkor".to_string());

        let cats = assigner.assign(&rec);
        assert_eq!(cats.content(), vec!["Churches in Tyresö Municipality"]);
    }

    #[test]
    fn test_tag_plain_home_category_without_probe_hit() {
        let m = mappings();
        let mut assigner = CategoryAssigner::new(&m, &NoProbe);

        let mut rec = swedish_record("1");
        rec.item_classes.push("Kyrkor".to_string());

        let cats = assigner.assign(&rec);
        let content = cats.content();
        assert!(content.contains(&"Churches in Sweden".to_string()));
        // unverified municipal guess leaves the place tier active
        assert!(content.contains(&"Tyresö socken".to_string()) || content.contains(&"Tyresö Municipality".to_string()));
    }

    #[test]
    fn test_foreign_country_template_probed() {
        let m = mappings();
        let probe = FixedProbe::new(["Churches in Denmark"]);
        let mut assigner = CategoryAssigner::new(&m, &probe);

        let mut rec = KmbRecord::new("1");
        rec.land = Some("DK".to_string());
        rec.item_classes.push("Kyrkor".to_string());

        let cats = assigner.assign(&rec);
        assert_eq!(cats.content(), vec!["Churches in Denmark"]);
        assert!(cats
            .meta()
            .contains(&maintenance_category("needing categorisation (not from Sweden)")));
    }

    #[test]
    fn test_foreign_country_unverified_uses_default() {
        let m = mappings();
        let mut assigner = CategoryAssigner::new(&m, &NoProbe);

        let mut rec = KmbRecord::new("1");
        rec.land = Some("DK".to_string());
        rec.item_classes.push("Kyrkor".to_string());

        let cats = assigner.assign(&rec);
        assert_eq!(cats.content(), vec!["Churches"]);
    }

    #[test]
    fn test_restatement_tags_skipped() {
        let m = mappings();
        let mut assigner = CategoryAssigner::new(&m, &NoProbe);

        // registry id missing from the table, so tier 2 runs; the tag would
        // restate the fmis fallback and must be skipped
        let mut rec = swedish_record("1");
        rec.fmis.insert("999".to_string());
        rec.item_classes.push("Fornminnen".to_string());

        let cats = assigner.assign(&rec);
        assert!(!cats
            .content()
            .contains(&"Archaeological monuments in Sweden".to_string()));
    }

    #[test]
    fn test_place_tier_parish_preferred_over_municipality() {
        let m = mappings();
        let mut assigner = CategoryAssigner::new(&m, &NoProbe);

        let mut rec = swedish_record("1");
        rec.socken = Some("0103".to_string());

        let cats = assigner.assign(&rec);
        assert!(cats.content().contains(&"Tyresö socken".to_string()));
        assert!(!cats.content().contains(&"Tyresö Municipality".to_string()));
    }

    #[test]
    fn test_unmatched_record_gets_exactly_one_needs_categorisation() {
        let m = Mappings::default();
        let mut assigner = CategoryAssigner::new(&m, &NoProbe);

        let mut rec = KmbRecord::new("1");
        rec.lan = Some("Stockholm".to_string());

        let cats = assigner.assign(&rec);
        assert!(cats.content().is_empty());
        let meta = cats.meta();
        let needing: Vec<_> = meta
            .iter()
            .filter(|c| c.ends_with(": needing categorisation"))
            .collect();
        assert_eq!(needing.len(), 1);
    }

    #[test]
    fn test_duplicate_files_flagged() {
        let m = mappings();
        let mut assigner = CategoryAssigner::new(&m, &NoProbe);

        let rec = swedish_record("dup1");
        let cats = assigner.assign(&rec);
        assert!(cats
            .meta()
            .contains(&maintenance_category("with potential duplicates")));
    }

    #[test]
    fn test_no_municipality_flag() {
        let m = Mappings::default();
        let mut assigner = CategoryAssigner::new(&m, &NoProbe);

        let rec = KmbRecord::new("1");
        let cats = assigner.assign(&rec);
        assert!(cats
            .meta()
            .contains(&maintenance_category("needing categorisation (no municipality)")));
    }

    #[test]
    fn test_photographer_category_meta() {
        let mut m = mappings();
        m.photographers.insert(
            "Bengt A Lundberg".to_string(),
            crate::mappings::PhotographerMapping {
                creator: None,
                commonscat: Some("Photographs by Bengt A Lundberg".to_string()),
            },
        );
        let mut assigner = CategoryAssigner::new(&m, &NoProbe);

        let mut rec = swedish_record("1");
        rec.byline = Some("Bengt A Lundberg".to_string());

        let cats = assigner.assign(&rec);
        assert!(cats
            .meta()
            .contains(&"Photographs by Bengt A Lundberg".to_string()));
    }

    #[test]
    fn test_existence_cache_consulted_once() {
        use std::cell::RefCell;

        struct CountingProbe {
            calls: RefCell<usize>,
        }
        impl CategoryProbe for CountingProbe {
            fn category_exists(&self, _category: &str) -> bool {
                *self.calls.borrow_mut() += 1;
                false
            }
        }

        let m = mappings();
        let probe = CountingProbe {
            calls: RefCell::new(0),
        };
        let mut assigner = CategoryAssigner::new(&m, &probe);

        let mut rec = swedish_record("1");
        rec.bbr.insert("21400000999999".to_string());

        let before = {
            let _ = assigner.assign(&rec);
            *probe.calls.borrow()
        };
        let _ = assigner.assign(&rec);
        let after = *probe.calls.borrow();

        assert_eq!(before, after, "second pass must be served from the cache");
    }
}
