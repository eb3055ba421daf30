//! Wikitext rendering for processed records.
//!
//! Builds the per-file description template, the depicted-place statement,
//! the photographer credit and the target filename from a normalized record
//! and the mapping snapshot. All functions are pure over their inputs.

use std::sync::LazyLock;

use regex::Regex;

use crate::mappings::Mappings;
use crate::types::KmbRecord;

/// Source-side cooperation template appended to the source statement.
const COOPERATION_TEMPLATE: &str = "{{Riksantikvarieämbetet cooperation project|coh}}";

/// Collection label used in filenames.
const COLLECTION: &str = "KMB";

/// Characters not welcome in wiki filenames.
#[allow(clippy::expect_used)]
static FILENAME_UNSAFE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\[\]{}|#<>:/\\]"#).expect("valid regex"));

/// Whitespace runs collapsed in filenames.
#[allow(clippy::expect_used)]
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Title-style description for filenames.
///
/// `None` when the record has no label; such records cannot be named and
/// should be skipped by the driver. The common "S:t" abbreviation is
/// expanded since colons are not allowed in filenames.
#[must_use]
pub fn title_description(rec: &KmbRecord) -> Option<String> {
    rec.namn
        .as_deref()
        .filter(|n| !n.is_empty())
        .map(|n| n.replace("S:t", "Sankt"))
}

/// Target filename without extension: `descr - Collection - id`.
#[must_use]
pub fn filename(rec: &KmbRecord) -> Option<String> {
    let descr = title_description(rec)?;
    let descr = FILENAME_UNSAFE.replace_all(&descr, " ");
    let descr = WHITESPACE_RUN.replace_all(descr.trim(), " ");
    Some(format!("{descr} - {COLLECTION} - {id}", id = rec.id))
}

/// Wikitext description: free-text description, distinct motif, citations.
#[must_use]
pub fn wiki_description(rec: &KmbRecord) -> String {
    let descr = rec.beskrivning.as_deref().unwrap_or("");
    let mut text = format!("{}.", descr.trim_end_matches([' ', '.']));

    if rec.motiv != rec.namn && rec.motiv != rec.beskrivning {
        if let Some(motiv) = rec.motiv.as_deref() {
            text.push_str(&format!("\n{}. ", motiv.trim_end_matches([' ', '.'])));
        }
    }

    if !rec.avbildar.is_empty() {
        text.push('\n');
        text.push_str(&rec.avbildar.join(" "));
    }

    text.trim().to_string()
}

/// Original description including motif, keywords and class(es).
///
/// Outputs the primary classes when any are identified, else all classes.
#[must_use]
pub fn original_description(rec: &KmbRecord, mappings: &Mappings) -> String {
    let mut descr = rec.beskrivning.clone().unwrap_or_default();

    if let Some(motiv) = rec.motiv.as_deref().filter(|m| !m.is_empty()) {
        descr.push_str(&format!("<br>\nMotiv: {motiv}"));
    }
    if !rec.item_keywords.is_empty() {
        descr.push_str(&format!("<br>\nNyckelord: {}", rec.item_keywords.join(", ")));
    }
    if !rec.item_classes.is_empty() {
        let primary: Vec<String> = rec
            .item_classes
            .iter()
            .filter(|c| mappings.primary_classes.contains(c))
            .cloned()
            .collect();
        let classes = if primary.is_empty() {
            &rec.item_classes
        } else {
            &primary
        };
        descr.push_str(&format!("<br>\nKategori: {}", classes.join(", ")));
    }

    let descr = descr.trim();
    descr.strip_prefix("<br>").unwrap_or(descr).trim().to_string()
}

/// Linked source statement with the cooperation template.
#[must_use]
pub fn source_statement(rec: &KmbRecord) -> String {
    let mut link_text = String::new();
    if let Some(byline) = rec.byline.as_deref().filter(|b| !b.is_empty()) {
        link_text.push_str(byline);
        link_text.push_str(" / ");
    }
    link_text.push_str("Kulturmiljöbild, Riksantikvarieämbetet");

    format!(
        "[{url} {link_text}]\n{COOPERATION_TEMPLATE}",
        url = rec.source.as_deref().unwrap_or_default()
    )
}

/// Depicted-place statement.
///
/// Home-country records chain the country template with municipality and
/// parish links via their Wikidata ids, falling back to county or province
/// names; foreign records get just the country template.
#[must_use]
pub fn depicted_place(rec: &KmbRecord, mappings: &Mappings) -> String {
    if !rec.is_home_country() {
        return format!(
            "{{{{Country|1={}}}}}",
            rec.land.as_deref().unwrap_or_default()
        );
    }

    let mut place = "{{Country|1=SE}}".to_string();

    let kommun_wd = rec
        .kommun
        .as_deref()
        .and_then(|code| mappings.kommun.get(code))
        .and_then(|m| m.wd.as_deref());

    if let Some(wd) = kommun_wd {
        place.push_str(&format!(", {{{{city|{wd}}}}}"));

        let socken_wd = rec
            .socken
            .as_deref()
            .and_then(|code| mappings.socken.get(code))
            .and_then(|m| m.wd.as_deref());
        if let Some(wd) = socken_wd {
            place.push_str(&format!(", {{{{city|{wd}}}}}"));
        }
    } else if let Some(lan) = rec.lan.as_deref().filter(|l| !l.is_empty()) {
        place.push_str(&format!(", {lan}"));
    } else if let Some(landskap) = rec.landskap.as_deref().filter(|l| !l.is_empty()) {
        place.push_str(&format!(", {landskap}"));
    }

    place
}

/// Photographer credit: creator template when mapped, plain byline otherwise.
#[must_use]
pub fn photographer(rec: &KmbRecord, mappings: &Mappings) -> String {
    let byline = rec.byline.as_deref().unwrap_or_default();

    if !byline.starts_with("{{") {
        if let Some(creator) = mappings
            .photographers
            .get(byline)
            .and_then(|m| m.creator.as_deref())
        {
            return format!("{{{{Creator:{creator}}}}}");
        }
    }
    byline.to_string()
}

/// Gallery of files already on the wiki depicting the same image.
///
/// Empty when no duplicates are known.
#[must_use]
pub fn other_versions(rec: &KmbRecord, mappings: &Mappings) -> String {
    let files = mappings.existing_files(&rec.id);
    if files.is_empty() {
        return String::new();
    }
    format!("<gallery>\n{}\n</gallery>", files.join("\n"))
}

/// The full per-file information template, with the object location
/// appended when coordinates exist.
#[must_use]
pub fn info_template(rec: &KmbRecord, mappings: &Mappings) -> String {
    let fields = [
        ("short title", rec.namn.clone().unwrap_or_default()),
        ("original description", original_description(rec, mappings)),
        ("wiki description", wiki_description(rec)),
        ("photographer", photographer(rec, mappings)),
        ("depicted place", depicted_place(rec, mappings)),
        ("date", rec.date.clone().unwrap_or_default()),
        ("permission", rec.license_text.clone().unwrap_or_default()),
        ("ID", rec.id.clone()),
        ("bildbeteckning", rec.bildbeteckning.clone().unwrap_or_default()),
        ("source", source_statement(rec)),
        ("notes", String::new()),
        ("other versions", other_versions(rec, mappings)),
    ];

    let mut text = String::from("{{Kulturmiljöbild-image\n");
    for (key, value) in fields {
        text.push_str(&format!("| {key} = {value}\n"));
    }
    text.push_str("}}");

    if let (Some(lat), Some(lon)) = (rec.latitude.as_deref(), rec.longitude.as_deref()) {
        text.push_str(&format!("\n{{{{Object location dec|{lat}|{lon}}}}}"));
    }

    text
}
