//! API client tests against a mock HTTP server.

use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kmb_harvester::http::{create_client, download_text};

const EMPTY_PAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<result xmlns:pres="http://kulturarvsdata.se/presentation#">
  <totalHits>0</totalHits>
  <records/>
</result>"#;

#[tokio::test]
async fn test_download_text_fetches_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PAGE))
        .mount(&server)
        .await;

    let url = format!("{}/ksamsok/api", server.uri());
    let body = tokio::task::spawn_blocking(move || {
        let client = create_client().expect("client");
        download_text(&client, &url)
    })
    .await
    .expect("join")
    .expect("download");

    let doc = roxmltree::Document::parse(&body).expect("parse");
    assert_eq!(kmb_harvester::api::total_hits(&doc).expect("totalHits"), 0);
}

#[tokio::test]
async fn test_download_text_retries_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let url = server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let client = create_client().expect("client");
        download_text(&client, &url)
    })
    .await
    .expect("join");

    assert!(matches!(
        result,
        Err(kmb_harvester::HarvestError::RetriesExhausted { attempts: 3, .. })
    ));
}

#[tokio::test]
async fn test_download_text_does_not_retry_client_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let url = server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let client = create_client().expect("client");
        download_text(&client, &url)
    })
    .await
    .expect("join");

    assert!(matches!(result, Err(kmb_harvester::HarvestError::Http(_))));
}

#[tokio::test]
async fn test_harvest_keyword_pages_until_empty() {
    let server = MockServer::start().await;

    let page_one: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<result xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
        xmlns:pres="http://kulturarvsdata.se/presentation#"
        xmlns:ns5="http://kulturarvsdata.se/ksamsok#">
  <totalHits>1</totalHits>
  <records>
    <record>
      <pres:id>16000300035205</pres:id>
      <ns5:itemLabel>Tyresö</ns5:itemLabel>
      <pres:byline>Lundberg, Bengt A</pres:byline>
      <pres:copyright>RAÄ</pres:copyright>
      <ns5:mediaLicense>by</ns5:mediaLicense>
    </record>
  </records>
</result>"#;

    Mock::given(method("GET"))
        .and(query_param("startRecord", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_one))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("startRecord", "501"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PAGE))
        .mount(&server)
        .await;

    let base = server.uri();
    let records = tokio::task::spawn_blocking(move || {
        let client = create_client().expect("client");
        kmb_harvester::api::harvest_keyword(&client, &base, "test", "katt")
    })
    .await
    .expect("join")
    .expect("harvest");

    assert_eq!(records.len(), 1);
    let rec = &records["16000300035205"];
    assert_eq!(rec.byline.as_deref(), Some("Bengt A Lundberg"));
    assert_eq!(
        rec.license_text.as_deref(),
        Some("{{CC-BY-2.5|Bengt A Lundberg / Riksantikvarieämbetet}}")
    );
}
