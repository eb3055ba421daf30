//! License and attribution resolution.
//!
//! Maps the feed's license code and copyright holder to a publishable
//! license statement. Possible license codes are listed in
//! <http://kulturarvsdata.se/resurser/license/license.owl>. Must run after
//! byline normalization so placeholder bylines can be excluded from the
//! attribution.

use crate::config::{LICENSE_URI_PREFIX, NOT_PROVIDED, UNKNOWN_PHOTOGRAPHER};
use crate::types::KmbRecord;

/// Copyright phrase marking expired copyright.
const EXPIRED_COPYRIGHT: &str = "Utgången upphovsrätt";

/// Known abbreviation of the institutional copyright holder.
const RAA_ABBREVIATION: &str = "RAÄ";

/// Full institutional name substituted for the abbreviation.
const RAA_FULL_NAME: &str = "Riksantikvarieämbetet";

/// License templates a record can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseTemplate {
    PdSwedenPhoto,
    CcBy,
    CcBySa,
    Cc0,
}

impl LicenseTemplate {
    /// Template name as rendered in the license statement.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PdSwedenPhoto => "PD-Sweden-photo",
            Self::CcBy => "CC-BY-2.5",
            Self::CcBySa => "CC-BY-SA-2.5",
            Self::Cc0 => "CC0",
        }
    }

    /// Whether the template carries an attribution parameter.
    #[must_use]
    pub fn wants_attribution(self) -> bool {
        matches!(self, Self::CcBy | Self::CcBySa)
    }
}

/// Determine the license template, in priority order.
fn determine_template(license: &str, copyright: &str) -> Option<LicenseTemplate> {
    if license == "pdmark" || copyright == EXPIRED_COPYRIGHT {
        Some(LicenseTemplate::PdSwedenPhoto)
    } else if license == "by" {
        Some(LicenseTemplate::CcBy)
    } else if license == "by-sa" {
        Some(LicenseTemplate::CcBySa)
    } else if license == "cc0" {
        Some(LicenseTemplate::Cc0)
    } else {
        None
    }
}

/// Resolve the license statement for a record.
///
/// Trims the copyright string and strips the license URI prefix in place,
/// then either sets `license_text` or notes the unrecognized combination as
/// a problem, leaving the record implicitly non-free.
pub fn resolve_license(rec: &mut KmbRecord) {
    if let Some(copyright) = rec.copyright.as_mut() {
        *copyright = copyright.trim().to_string();
    }
    if let Some(license) = rec.license.as_mut() {
        let trimmed = license.trim();
        *license = trimmed
            .strip_prefix(LICENSE_URI_PREFIX)
            .unwrap_or(trimmed)
            .to_string();
    }

    let license = rec.license.as_deref().unwrap_or("");
    let copyright = rec.copyright.as_deref().unwrap_or("");

    let Some(template) = determine_template(license, copyright) else {
        rec.add_problem(format!(
            "It looks like the license isn't free. Copyright=\"{copyright}\", License=\"{license}\"."
        ));
        rec.license_text = None;
        return;
    };

    let attribution = template
        .wants_attribution()
        .then(|| build_attribution(rec))
        .filter(|parts| !parts.is_empty());

    rec.license_text = Some(match attribution {
        Some(parts) => format!("{{{{{}|{}}}}}", template.as_str(), parts.join(" / ")),
        None => format!("{{{{{}}}}}", template.as_str()),
    });
}

/// Collect the attribution parts: byline unless placeholder, then the
/// copyright holder's display name.
fn build_attribution(rec: &KmbRecord) -> Vec<String> {
    let mut parts = Vec::new();

    if let Some(byline) = rec.byline.as_deref() {
        if byline != UNKNOWN_PHOTOGRAPHER && byline != NOT_PROVIDED {
            parts.push(byline.to_string());
        }
    }

    match rec.copyright.as_deref() {
        Some(RAA_ABBREVIATION) => parts.push(RAA_FULL_NAME.to_string()),
        Some(holder) if !holder.is_empty() => parts.push(holder.to_string()),
        _ => {}
    }

    parts
}
