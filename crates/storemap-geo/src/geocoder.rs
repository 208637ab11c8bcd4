//! Geocoding provider abstraction and the Kakao Local implementation.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use storemap_core::GeoCoordinate;

use crate::error::GeocodeError;

const DEFAULT_BASE_URL: &str = "https://dapi.kakao.com/";
const ADDRESS_SEARCH_PATH: &str = "v2/local/search/address.json";

/// Resolves one free-text address to a coordinate.
///
/// Each call either succeeds with the provider's first candidate or fails
/// definitively; implementations must not retry internally.
pub trait Geocoder {
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<GeoCoordinate, GeocodeError>> + Send;
}

/// Client for the Kakao Local address-search REST endpoint.
///
/// Use [`KakaoGeocoder::new`] for production or
/// [`KakaoGeocoder::with_base_url`] to point at a mock server in tests.
pub struct KakaoGeocoder {
    client: Client,
    api_key: String,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct AddressSearchResponse {
    #[serde(default)]
    documents: Vec<AddressDocument>,
}

/// One candidate. `x` is longitude and `y` latitude; Kakao sends both as
/// decimal strings.
#[derive(Debug, Deserialize)]
struct AddressDocument {
    x: serde_json::Value,
    y: serde_json::Value,
}

impl KakaoGeocoder {
    /// Creates a geocoder pointed at the production Kakao API.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, GeocodeError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a geocoder with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`GeocodeError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(ADDRESS_SEARCH_PATH))
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    fn search_url(&self, address: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("query", address);
        url
    }

    async fn search(&self, address: &str) -> Result<GeoCoordinate, GeocodeError> {
        let response = self
            .client
            .get(self.search_url(address))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("KakaoAK {}", self.api_key),
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                address: address.to_owned(),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<AddressSearchResponse>(&body).map_err(|e| {
            GeocodeError::Deserialize {
                context: format!("address search for \"{address}\""),
                source: e,
            }
        })?;

        let first = parsed
            .documents
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NoMatch {
                address: address.to_owned(),
            })?;

        document_coordinate(&first).map_err(|reason| GeocodeError::InvalidCoordinate {
            address: address.to_owned(),
            reason,
        })
    }
}

impl Geocoder for KakaoGeocoder {
    fn geocode(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<GeoCoordinate, GeocodeError>> + Send {
        self.search(address)
    }
}

fn document_coordinate(doc: &AddressDocument) -> Result<GeoCoordinate, String> {
    let lng = parse_degrees(&doc.x).ok_or_else(|| format!("unparseable x value {}", doc.x))?;
    let lat = parse_degrees(&doc.y).ok_or_else(|| format!("unparseable y value {}", doc.y))?;
    let coordinate = GeoCoordinate::new(lat, lng);
    if coordinate.is_valid() {
        Ok(coordinate)
    } else {
        Err(format!("out of range ({lat}, {lng})"))
    }
}

/// Accepts a JSON number or a decimal string.
fn parse_degrees(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_url_encodes_query() {
        let geocoder =
            KakaoGeocoder::with_base_url("k", 5, "test", "http://localhost:1234").unwrap();
        let url = geocoder.search_url("용인시 처인구 1");
        assert_eq!(url.path(), "/v2/local/search/address.json");
        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "query");
        assert_eq!(value, "용인시 처인구 1");
    }

    #[test]
    fn base_url_path_prefix_is_preserved() {
        let geocoder =
            KakaoGeocoder::with_base_url("k", 5, "test", "http://localhost:1234/proxy/").unwrap();
        assert_eq!(
            geocoder.search_url("x").path(),
            "/proxy/v2/local/search/address.json"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let result = KakaoGeocoder::with_base_url("k", 5, "test", "not a url");
        assert!(
            matches!(result, Err(GeocodeError::InvalidBaseUrl { .. })),
            "expected InvalidBaseUrl"
        );
    }

    #[test]
    fn parse_degrees_accepts_strings_and_numbers() {
        assert_eq!(parse_degrees(&json!("127.1775")), Some(127.1775));
        assert_eq!(parse_degrees(&json!(" 37.2 ")), Some(37.2));
        assert_eq!(parse_degrees(&json!(37.5)), Some(37.5));
        assert_eq!(parse_degrees(&json!(null)), None);
        assert_eq!(parse_degrees(&json!("abc")), None);
    }

    #[test]
    fn document_coordinate_maps_x_to_lng_and_y_to_lat() {
        let doc = AddressDocument {
            x: json!("127.1775"),
            y: json!("37.2415"),
        };
        assert_eq!(
            document_coordinate(&doc).unwrap(),
            GeoCoordinate::new(37.2415, 127.1775)
        );
    }

    #[test]
    fn document_coordinate_rejects_out_of_range() {
        let doc = AddressDocument {
            x: json!("127.0"),
            y: json!("137.0"),
        };
        assert!(document_coordinate(&doc).is_err());
    }
}
