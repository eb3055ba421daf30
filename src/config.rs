//! Configuration constants and validation functions for the harvester.

use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

use crate::error::{HarvestError, Result};

/// Base URL for the kulturarvsdata object resolver.
pub const KULTURARVSDATA_URL: &str = "http://kulturarvsdata.se";

/// Base URL for the K-samsök search API.
pub const SEARCH_API_URL: &str = "http://kulturarvsdata.se/ksamsok/api";

/// URI prefix carried by license codes in the feed.
pub const LICENSE_URI_PREFIX: &str = "http://kulturarvsdata.se/resurser/License#";

/// URI prefix for country references.
pub const COUNTRY_URI_PREFIX: &str = "http://kulturarvsdata.se/resurser/aukt/geo/country#";

/// URI prefix for municipality references.
pub const MUNICIPALITY_URI_PREFIX: &str =
    "http://kulturarvsdata.se/resurser/aukt/geo/municipality#";

/// URI prefix for parish references.
pub const PARISH_URI_PREFIX: &str = "http://kulturarvsdata.se/resurser/aukt/geo/parish#";

/// Namespace of the presentation block in K-samsök records.
///
/// Several core fields (copyright above all) appear both in the presentation
/// block and in the ksamsok namespace with different values, so presentation
/// fields are matched on namespace and not just local name.
pub const PRESENTATION_NS: &str = "http://kulturarvsdata.se/presentation#";

/// Country code assumed when a record carries no explicit country.
pub const HOME_COUNTRY: &str = "SE";

/// Stem for batch and maintenance categories.
pub const BATCH_CAT: &str = "Media contributed by RAÄ";

/// Branch for this particular batch upload.
pub const BATCH_DATE: &str = "2017-06";

/// Byline placeholder for an unknown photographer.
pub const UNKNOWN_PHOTOGRAPHER: &str = "{{unknown}}";

/// Byline placeholder when the source provides no photographer at all.
pub const NOT_PROVIDED: &str = "{{not provided}}";

/// Municipality code backfilled for Gotland records.
///
/// County, province and municipality coincide only in this one jurisdiction,
/// which is probably also why the municipality id is frequently left out.
pub const GOTLAND_MUNICIPALITY_CODE: &str = "0980";

/// Municipality name backfilled for Gotland records.
pub const GOTLAND_NAME: &str = "Gotland";

/// Hits requested per search API page.
pub const HITS_PER_PAGE: u32 = 500;

/// Delay between search API requests in milliseconds.
pub const THROTTLE_MS: u64 = 500;

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// KMB id pattern: digits only.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static KMB_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));

/// Characters percent-encoded in search keywords.
///
/// Everything except RFC 3986 unreserved characters, matching what
/// `requests.utils.quote` produces for query values.
const KEYWORD_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Validate a KMB identifier.
///
/// # Examples
/// ```
/// use kmb_harvester::config::validate_kmb_id;
///
/// assert!(validate_kmb_id("16000300035205").is_ok());
/// assert!(validate_kmb_id("raa/kmb/123").is_err());
/// ```
pub fn validate_kmb_id(kmb_id: &str) -> Result<()> {
    if KMB_ID_PATTERN.is_match(kmb_id) {
        Ok(())
    } else {
        Err(HarvestError::InvalidKmbId(kmb_id.to_string()))
    }
}

/// Build the resolver URL for a single KMB record.
///
/// # Examples
/// ```
/// use kmb_harvester::config::record_url;
///
/// assert_eq!(
///     record_url("16000300035205"),
///     "http://kulturarvsdata.se/raa/kmb/16000300035205"
/// );
/// ```
pub fn record_url(kmb_id: &str) -> String {
    debug_assert!(
        KMB_ID_PATTERN.is_match(kmb_id),
        "kmb_id should be validated before calling record_url"
    );
    format!("{KULTURARVSDATA_URL}/raa/kmb/{kmb_id}")
}

/// Build a search API URL for one result page.
///
/// The query grammar is fixed to KMB photo records carrying a media license;
/// only the free-text keyword varies. The base is a parameter so tests can
/// point the harvester at a local server.
///
/// # Arguments
/// * `api_base` - API endpoint, usually [`SEARCH_API_URL`]
/// * `api_key` - key to access the API
/// * `hits_limit` - how many hits per page
/// * `start_record` - from which record to start (1-based)
/// * `keyword` - keyword to search for
pub fn search_url(
    api_base: &str,
    api_key: &str,
    hits_limit: u32,
    start_record: u32,
    keyword: &str,
) -> String {
    let keyword = utf8_percent_encode(keyword, KEYWORD_ENCODE_SET).to_string();
    format!(
        "{api_base}?x-api={api_key}\
         &method=search&hitsPerPage={hits_limit}\
         &startRecord={start_record}\
         &query=serviceOrganization=RA%C3%84%20\
         and%20serviceName=KMB%20\
         and%20itemType=foto%20and%20mediaLicense=*%20\
         and%20text={keyword}"
    )
}

/// Render a maintenance category from a flag.
///
/// # Examples
/// ```
/// use kmb_harvester::config::maintenance_category;
///
/// assert_eq!(
///     maintenance_category("needing categorisation"),
///     "Media contributed by RAÄ: needing categorisation"
/// );
/// ```
#[must_use]
pub fn maintenance_category(flag: &str) -> String {
    format!("{BATCH_CAT}: {flag}")
}
