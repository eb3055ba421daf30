//! Classification of depicted-entity URIs into registry citations.
//!
//! A depicted URI may point at the archaeological-monument registry (FMIS),
//! the listed-building registry (BBR, with three sub-types), or anywhere
//! else. Registry references become typed citations plus bookkeeping ids on
//! the record; everything else is cited verbatim.

use crate::error::{HarvestError, Result};
use crate::types::KmbRecord;

/// BBR sub-types, keyed by the archival code leading the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BbrKind {
    /// Other built environment (code 213).
    A,
    /// Listed building (code 214).
    B,
    /// Built-up area (code 212).
    M,
}

impl BbrKind {
    /// Infer the sub-type from the leading 3-digit code of an identifier.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "213" => Some(Self::A),
            "214" => Some(Self::B),
            "212" => Some(Self::M),
            _ => None,
        }
    }

    /// The sub-type letter used in citations.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::A => 'a',
            Self::B => 'b',
            Self::M => 'm',
        }
    }
}

/// A classified depicted-entity reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepictedRef {
    /// Archaeological-monument registry entry.
    Fmis { id: String },
    /// Listed-building registry entry. `kind` is set when the matched URI
    /// prefix determines the sub-type; otherwise it is inferred at render
    /// time from the identifier itself.
    Bbr { id: String, kind: Option<BbrKind> },
    /// Anything outside the known registries; cited verbatim.
    Other(String),
}

/// Known registry URL prefixes, in match order. The generic `bbr` prefix
/// comes after the typed ones so the sub-type survives when the feed
/// provides it.
const REGISTRY_PREFIXES: &[(&str, RegistryKind)] = &[
    ("http://kulturarvsdata.se/raa/fmi/", RegistryKind::Fmis),
    ("http://kulturarvsdata.se/raa/bbra/", RegistryKind::Bbr(Some(BbrKind::A))),
    ("http://kulturarvsdata.se/raa/bbrb/", RegistryKind::Bbr(Some(BbrKind::B))),
    ("http://kulturarvsdata.se/raa/bbrm/", RegistryKind::Bbr(Some(BbrKind::M))),
    ("http://kulturarvsdata.se/raa/bbr/", RegistryKind::Bbr(None)),
];

#[derive(Debug, Clone, Copy)]
enum RegistryKind {
    Fmis,
    Bbr(Option<BbrKind>),
}

impl DepictedRef {
    /// Classify a depicted URI.
    ///
    /// # Errors
    /// `HarvestError::InvalidDepicted` when the URI starts with a known
    /// registry prefix but the remainder is not a bare identifier segment.
    /// That means the upstream URI grammar changed and silent acceptance
    /// would corrupt the registry bookkeeping.
    pub fn parse(url: &str) -> Result<Self> {
        let idno = url.rsplit('/').next().unwrap_or("");

        for (prefix, kind) in REGISTRY_PREFIXES {
            if let Some(rest) = url.strip_prefix(prefix) {
                if rest.trim() != idno {
                    return Err(HarvestError::InvalidDepicted {
                        prefix: (*prefix).to_string(),
                        url: url.to_string(),
                    });
                }
                let id = idno.to_string();
                return Ok(match kind {
                    RegistryKind::Fmis => Self::Fmis { id },
                    RegistryKind::Bbr(sub) => Self::Bbr { id, kind: *sub },
                });
            }
        }

        Ok(Self::Other(url.to_string()))
    }

    /// Render the citation for this reference.
    #[must_use]
    pub fn citation(&self) -> String {
        match self {
            Self::Fmis { id } => format!("{{{{Fornminne|{id}}}}}"),
            Self::Bbr { id, kind } => {
                match (*kind).or_else(|| id.get(..3).and_then(BbrKind::from_code)) {
                    Some(sub) => format!("{{{{BBR|{id}|{sub}}}}}", sub = sub.letter()),
                    None => format!("{{{{BBR|{id}}}}}"),
                }
            }
            Self::Other(url) => url.clone(),
        }
    }
}

/// Resolve one depicted URI into the record.
///
/// Registry identifiers accumulate in the per-registry sets; the citation is
/// appended in encounter order.
pub fn process_depicted(rec: &mut KmbRecord, url: &str) -> Result<()> {
    let depicted = DepictedRef::parse(url)?;
    match &depicted {
        DepictedRef::Fmis { id } => {
            rec.fmis.insert(id.clone());
        }
        DepictedRef::Bbr { id, .. } => {
            rec.bbr.insert(id.clone());
        }
        DepictedRef::Other(_) => {}
    }
    rec.avbildar.push(depicted.citation());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmis_citation() {
        let r = DepictedRef::parse("http://kulturarvsdata.se/raa/fmi/10028201230001").unwrap();
        assert_eq!(r, DepictedRef::Fmis { id: "10028201230001".to_string() });
        assert_eq!(r.citation(), "{{Fornminne|10028201230001}}");
    }

    #[test]
    fn test_typed_bbr_prefixes() {
        let r = DepictedRef::parse("http://kulturarvsdata.se/raa/bbra/21300000012345").unwrap();
        assert_eq!(r.citation(), "{{BBR|21300000012345|a}}");

        let r = DepictedRef::parse("http://kulturarvsdata.se/raa/bbrb/21400000440251").unwrap();
        assert_eq!(r.citation(), "{{BBR|21400000440251|b}}");

        let r = DepictedRef::parse("http://kulturarvsdata.se/raa/bbrm/21200000021469").unwrap();
        assert_eq!(r.citation(), "{{BBR|21200000021469|m}}");
    }

    #[test]
    fn test_generic_bbr_infers_subtype_from_code() {
        let r = DepictedRef::parse("http://kulturarvsdata.se/raa/bbr/21400000440251").unwrap();
        assert_eq!(
            r,
            DepictedRef::Bbr { id: "21400000440251".to_string(), kind: None }
        );
        assert_eq!(r.citation(), "{{BBR|21400000440251|b}}");
    }

    #[test]
    fn test_generic_bbr_unknown_code_renders_untyped() {
        let r = DepictedRef::parse("http://kulturarvsdata.se/raa/bbr/99900000000001").unwrap();
        assert_eq!(r.citation(), "{{BBR|99900000000001}}");
    }

    #[test]
    fn test_unrelated_uri_cited_verbatim() {
        let url = "http://kulturarvsdata.se/shm/object/12345";
        let r = DepictedRef::parse(url).unwrap();
        assert_eq!(r, DepictedRef::Other(url.to_string()));
        assert_eq!(r.citation(), url);
    }

    #[test]
    fn test_malformed_identifier_is_structural_error() {
        let err =
            DepictedRef::parse("http://kulturarvsdata.se/raa/bbr/214000/00440251").unwrap_err();
        assert!(matches!(err, HarvestError::InvalidDepicted { .. }));
    }

    #[test]
    fn test_process_depicted_bookkeeping() {
        let mut rec = KmbRecord::new("1");
        process_depicted(&mut rec, "http://kulturarvsdata.se/raa/fmi/10028201230001").unwrap();
        process_depicted(&mut rec, "http://kulturarvsdata.se/raa/bbrb/21400000440251").unwrap();
        process_depicted(&mut rec, "http://example.org/elsewhere").unwrap();

        assert!(rec.fmis.contains("10028201230001"));
        assert!(rec.bbr.contains("21400000440251"));
        assert_eq!(
            rec.avbildar,
            vec![
                "{{Fornminne|10028201230001}}",
                "{{BBR|21400000440251|b}}",
                "http://example.org/elsewhere"
            ]
        );
    }
}
