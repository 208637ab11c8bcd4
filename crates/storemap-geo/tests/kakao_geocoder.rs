//! Integration tests for `KakaoGeocoder` and the batcher over HTTP.
//!
//! Uses `wiremock` to stand up a local Kakao-shaped endpoint so no real
//! network traffic is made.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storemap_core::{GeoCoordinate, StoreRecord};
use storemap_geo::{FileStore, GeoCache, GeocodeBatcher, GeocodeError, Geocoder, KakaoGeocoder};

const SEARCH_PATH: &str = "/v2/local/search/address.json";

fn test_geocoder(base_url: &str) -> KakaoGeocoder {
    KakaoGeocoder::with_base_url("test-key", 5, "storemap-test/0.1", base_url)
        .expect("geocoder construction should not fail")
}

fn documents(x: &str, y: &str) -> serde_json::Value {
    json!({
        "meta": { "total_count": 1, "pageable_count": 1, "is_end": true },
        "documents": [
            { "address_name": "경기 용인시 처인구 중부대로 1199", "x": x, "y": y },
            { "address_name": "second candidate", "x": "0", "y": "0" }
        ]
    })
}

fn record(name: &str, address: &str) -> StoreRecord {
    StoreRecord {
        name: name.to_owned(),
        address: address.to_owned(),
        category: String::new(),
    }
}

// ---------------------------------------------------------------------------
// KakaoGeocoder
// ---------------------------------------------------------------------------

#[tokio::test]
async fn geocode_uses_first_candidate_and_sends_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("query", "중부대로 1199"))
        .and(header("authorization", "KakaoAK test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(documents("127.1775", "37.2415")))
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = test_geocoder(&server.uri());
    let coordinate = geocoder
        .geocode("중부대로 1199")
        .await
        .expect("should geocode");

    assert_eq!(coordinate, GeoCoordinate::new(37.2415, 127.1775));
}

#[tokio::test]
async fn geocode_empty_documents_is_no_match() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "total_count": 0 },
            "documents": []
        })))
        .mount(&server)
        .await;

    let result = test_geocoder(&server.uri()).geocode("nowhere").await;

    assert!(
        matches!(result, Err(GeocodeError::NoMatch { ref address }) if address == "nowhere"),
        "expected NoMatch, got: {result:?}"
    );
}

#[tokio::test]
async fn geocode_non_success_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = test_geocoder(&server.uri()).geocode("anything").await;

    assert!(
        matches!(result, Err(GeocodeError::UnexpectedStatus { status: 401, .. })),
        "expected UnexpectedStatus(401), got: {result:?}"
    );
}

#[tokio::test]
async fn geocode_malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = test_geocoder(&server.uri()).geocode("anything").await;

    assert!(
        matches!(result, Err(GeocodeError::Deserialize { .. })),
        "expected Deserialize, got: {result:?}"
    );
}

#[tokio::test]
async fn geocode_unreachable_server_is_http_error() {
    // Port 9 (discard) on localhost is not served by anything in the test env.
    let geocoder = KakaoGeocoder::with_base_url("k", 1, "storemap-test/0.1", "http://127.0.0.1:9")
        .expect("geocoder construction should not fail");

    let result = geocoder.geocode("anything").await;

    assert!(
        matches!(result, Err(GeocodeError::Http(_))),
        "expected Http, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Batcher over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn batch_run_populates_file_cache_and_second_run_skips_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("query", "123 Main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(documents("2", "1")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("query", "456 Oak"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let cache_path = dir.path().join("geo_cache.json");
    let records = vec![record("B", "123 Main"), record("C", "456 Oak")];

    let first_run = GeocodeBatcher::with_policy(
        test_geocoder(&server.uri()),
        GeoCache::new(Arc::new(FileStore::open(&cache_path))),
        50,
        Duration::from_millis(1),
    );
    let resolved = first_run.resolve_all(&records).await;
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].name(), "B");
    assert_eq!(resolved[0].coordinate, GeoCoordinate::new(1.0, 2.0));

    // Fresh batcher, same file: "123 Main" is answered from disk.
    let second_run = GeocodeBatcher::with_policy(
        test_geocoder(&server.uri()),
        GeoCache::new(Arc::new(FileStore::open(&cache_path))),
        50,
        Duration::from_millis(1),
    );
    let resolved_again = second_run.resolve_all(&records).await;
    assert_eq!(resolved_again, resolved);
}
