//! Pure normalizers for extracted record values.
//!
//! Byline flipping, date-range collapsing, geographic id padding and the
//! Gotland municipality backfill. All functions mutate the record in place
//! and never fail; unparsable values surface as problem notes.

use crate::config::{
    GOTLAND_MUNICIPALITY_CODE, GOTLAND_NAME, NOT_PROVIDED, UNKNOWN_PHOTOGRAPHER,
};
use crate::types::KmbRecord;

/// Flip a "Surname, Given" string to "Given Surname".
///
/// Splits on the first comma and trims both parts. Strings without a comma
/// pass through unchanged.
///
/// # Examples
/// ```
/// use kmb_harvester::normalize::flip_name;
///
/// assert_eq!(flip_name("Lundberg, Bengt A"), "Bengt A Lundberg");
/// assert_eq!(flip_name("Bengt A Lundberg"), "Bengt A Lundberg");
/// ```
#[must_use]
pub fn flip_name(name: &str) -> String {
    match name.split_once(',') {
        Some((surname, given)) => format!("{} {}", given.trim(), surname.trim()),
        None => name.to_string(),
    }
}

/// Normalize the byline: unknown-photographer token, empty value, or flip.
///
/// The unknown match is case-insensitive containment, since the source spells
/// the token in several ways ("Okänd", "Okänd, Okänd", "okänd fotograf").
pub fn normalize_byline(rec: &mut KmbRecord) {
    let byline = rec.byline.as_deref().unwrap_or("");
    rec.byline = Some(if byline.to_lowercase().contains("okänd") {
        UNKNOWN_PHOTOGRAPHER.to_string()
    } else if byline.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        flip_name(byline)
    });
}

/// Derive the display date from the raw range.
///
/// Equal endpoints collapse to the single value; a full-year range collapses
/// to the bare year; anything else renders an explicit between marker with
/// both raw values preserved.
pub fn collapse_date(rec: &mut KmbRecord) {
    let from = rec.date_from.as_deref().unwrap_or("");
    let to = rec.date_to.as_deref().unwrap_or("");

    rec.date = if from == to {
        rec.date_from.clone()
    } else if from.get(..4).is_some()
        && from.get(..4) == to.get(..4)
        && from.get(5..) == Some("01-01")
        && to.get(5..) == Some("12-31")
    {
        from.get(..4).map(str::to_string)
    } else {
        Some(format!("{{{{other date|between|{from}|{to}}}}}"))
    };
}

/// Normalize municipality, parish and country codes.
///
/// Numeric codes are zero-padded to four digits; a code that does not parse
/// is left untouched and noted as a problem. Country codes are upper-cased.
pub fn normalize_ids(rec: &mut KmbRecord) {
    let mut problems = Vec::new();

    if let Some(kommun) = rec.kommun.as_mut().filter(|k| !k.is_empty()) {
        match kommun.parse::<u32>() {
            Ok(code) => *kommun = format!("{code:04}"),
            Err(_) => problems.push(format!("Municipality code is not numeric: \"{kommun}\".")),
        }
    }
    if let Some(socken) = rec.socken.as_mut().filter(|s| !s.is_empty()) {
        match socken.parse::<u32>() {
            Ok(code) => *socken = format!("{code:04}"),
            Err(_) => problems.push(format!("Parish code is not numeric: \"{socken}\".")),
        }
    }
    if let Some(land) = rec.land.as_mut() {
        *land = land.to_uppercase();
    }

    rec.problem.extend(problems);
}

/// Backfill the municipality for Gotland records.
///
/// County, province and municipality coincide in this one jurisdiction, and
/// the municipality id is frequently left out of the feed.
pub fn backfill_gotland(rec: &mut KmbRecord) {
    let has_kommun = rec.kommun.as_deref().is_some_and(|k| !k.is_empty());
    let is_gotland = rec.lan.as_deref() == Some(GOTLAND_NAME)
        || rec.landskap.as_deref() == Some(GOTLAND_NAME);

    if !has_kommun && is_gotland {
        rec.kommun = Some(GOTLAND_MUNICIPALITY_CODE.to_string());
        rec.kommun_name = Some(GOTLAND_NAME.to_string());
    }
}
