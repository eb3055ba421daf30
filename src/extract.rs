//! Field extraction from one parsed XML record.
//!
//! A static tag map declares, per record field, which element carries the
//! value and whether it lives in the element text or in an `rdf:resource`
//! attribute with a known URI prefix. Extraction is a pure function over the
//! DOM: a missing element or missing text child yields an absent field,
//! never an error.

use roxmltree::Node;

use crate::config::{
    COUNTRY_URI_PREFIX, MUNICIPALITY_URI_PREFIX, PARISH_URI_PREFIX, PRESENTATION_NS,
};
use crate::types::KmbRecord;
use crate::xml::{attribute_any_ns, descendants_named, find_descendant, find_descendant_ns};

/// Record fields fed by the declarative tag map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Namn,
    Beskrivning,
    Byline,
    Motiv,
    Copyright,
    License,
    Source,
    DateFrom,
    DateTo,
    Bildbeteckning,
    Landskap,
    Lan,
    Land,
    Kommun,
    KommunName,
    Socken,
    SockenName,
    Thumbnail,
}

/// How to pull one field out of a record element.
#[derive(Debug, Clone, Copy)]
pub struct TagSpec {
    /// Target record field.
    pub field: Field,
    /// Element local name.
    pub element: &'static str,
    /// Namespace pin, for local names that collide between blocks.
    pub ns: Option<&'static str>,
    /// Attribute local name when the value is attribute-valued.
    pub attribute: Option<&'static str>,
    /// URI prefix to strip from an attribute value.
    pub strip_prefix: Option<&'static str>,
}

impl TagSpec {
    const fn text(field: Field, element: &'static str) -> Self {
        Self {
            field,
            element,
            ns: None,
            attribute: None,
            strip_prefix: None,
        }
    }

    const fn pres(field: Field, element: &'static str) -> Self {
        Self {
            field,
            element,
            ns: Some(PRESENTATION_NS),
            attribute: None,
            strip_prefix: None,
        }
    }

    const fn resource(field: Field, element: &'static str, prefix: &'static str) -> Self {
        Self {
            field,
            element,
            ns: None,
            attribute: Some("resource"),
            strip_prefix: Some(prefix),
        }
    }
}

/// The extraction contract: one entry per named field, keys unique.
pub const TAG_MAP: &[TagSpec] = &[
    TagSpec::text(Field::Namn, "itemLabel"),
    TagSpec::pres(Field::Beskrivning, "description"),
    TagSpec::pres(Field::Byline, "byline"),
    TagSpec::pres(Field::Motiv, "motive"),
    // the ksamsok-namespace copyright can differ; the presentation one is
    // authoritative for attribution
    TagSpec::pres(Field::Copyright, "copyright"),
    TagSpec::text(Field::License, "mediaLicense"),
    TagSpec::text(Field::Source, "lowresSource"),
    TagSpec::text(Field::DateFrom, "fromTime"),
    TagSpec::text(Field::DateTo, "toTime"),
    TagSpec::pres(Field::Bildbeteckning, "idLabel"),
    TagSpec::text(Field::Landskap, "provinceName"),
    TagSpec::text(Field::Lan, "countyName"),
    TagSpec::resource(Field::Land, "country", COUNTRY_URI_PREFIX),
    TagSpec::resource(Field::Kommun, "municipality", MUNICIPALITY_URI_PREFIX),
    TagSpec::text(Field::KommunName, "municipalityName"),
    TagSpec::resource(Field::Socken, "parish", PARISH_URI_PREFIX),
    TagSpec::text(Field::SockenName, "parishName"),
    TagSpec::text(Field::Thumbnail, "thumbnailSource"),
];

/// Extract all mapped fields into the record.
pub fn extract_fields(record: Node<'_, '_>, rec: &mut KmbRecord) {
    for spec in TAG_MAP {
        let value = extract_one(record, spec);
        store(rec, spec.field, value);
    }
}

/// Extract a single field according to its spec.
fn extract_one(record: Node<'_, '_>, spec: &TagSpec) -> Option<String> {
    let node = match spec.ns {
        Some(ns) => find_descendant_ns(record, ns, spec.element),
        None => find_descendant(record, spec.element),
    }?;

    match spec.attribute {
        Some(attr) => {
            let raw = attribute_any_ns(node, attr)?;
            let stripped = spec
                .strip_prefix
                .and_then(|p| raw.strip_prefix(p))
                .unwrap_or(raw);
            Some(stripped.to_string())
        }
        None => node.text().map(|t| t.trim_matches('"').to_string()),
    }
}

fn store(rec: &mut KmbRecord, field: Field, value: Option<String>) {
    let slot = match field {
        Field::Namn => &mut rec.namn,
        Field::Beskrivning => &mut rec.beskrivning,
        Field::Byline => &mut rec.byline,
        Field::Motiv => &mut rec.motiv,
        Field::Copyright => &mut rec.copyright,
        Field::License => &mut rec.license,
        Field::Source => &mut rec.source,
        Field::DateFrom => &mut rec.date_from,
        Field::DateTo => &mut rec.date_to,
        Field::Bildbeteckning => &mut rec.bildbeteckning,
        Field::Landskap => &mut rec.landskap,
        Field::Lan => &mut rec.lan,
        Field::Land => &mut rec.land,
        Field::Kommun => &mut rec.kommun,
        Field::KommunName => &mut rec.kommun_name,
        Field::Socken => &mut rec.socken,
        Field::SockenName => &mut rec.socken_name,
        Field::Thumbnail => &mut rec.thumbnail,
    };
    *slot = value;
}

/// Extract the coordinate pair from the `georss:where` subtree.
///
/// The coordinate node declares its own separator character in the `cs`
/// attribute; the pair is serialized longitude-first. Anything other than
/// exactly two components is recorded as a problem, not an error.
pub fn extract_coordinates(record: Node<'_, '_>, rec: &mut KmbRecord) {
    let Some(where_node) = find_descendant(record, "where") else {
        return;
    };
    let Some(coord_node) = where_node
        .descendants()
        .find(|n| n.is_element() && n.attributes().any(|a| a.name() == "cs"))
    else {
        return;
    };

    let cs = attribute_any_ns(coord_node, "cs").unwrap_or(",");
    let Some(text) = coord_node.text() else {
        return;
    };

    let coords: Vec<&str> = text.split(cs).collect();
    if coords.len() == 2 {
        rec.latitude = Some(truncate_coordinate(coords[1]));
        rec.longitude = Some(truncate_coordinate(coords[0]));
    } else {
        rec.add_problem(format!("Coord was not a point: \"{cs}\""));
    }
}

/// Truncate a decimal-degree string to 8 characters.
fn truncate_coordinate(value: &str) -> String {
    value.chars().take(8).collect()
}

/// Collect the `rdf:resource` URIs of all depicted entities, in order.
pub fn depicted_urls(record: Node<'_, '_>) -> Vec<String> {
    descendants_named(record, "visualizes")
        .filter_map(|n| attribute_any_ns(n, "resource"))
        .map(str::to_string)
        .collect()
}

/// Extract both classification-tag vocabularies.
///
/// Empty elements are logged and skipped.
pub fn extract_tags(record: Node<'_, '_>, rec: &mut KmbRecord) {
    rec.item_classes = collect_tags(record, "itemClassName", &rec.id);
    rec.item_keywords = collect_tags(record, "itemKeyWord", &rec.id);
}

fn collect_tags(record: Node<'_, '_>, tag: &str, id: &str) -> Vec<String> {
    let mut values = Vec::new();
    for element in descendants_named(record, tag) {
        match element.text().map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => values.push(text.to_string()),
            None => tracing::warn!(id, tag, "empty classification element"),
        }
    }
    values
}
