//! HTTP client for the public store-list data source.
//!
//! The source exposes a single paged `GET` endpoint authenticated by a
//! `serviceKey` query parameter. Only the first page is requested, with a page
//! size large enough to cover the whole list.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::DirectoryError;

pub const DEFAULT_ENDPOINT: &str = "https://apis.data.go.kr/4050000/ypay/getYpay";
pub const NUM_OF_ROWS: u32 = 1000;
pub const PAGE_NO: u32 = 1;

/// Client for the store-list data source.
///
/// Use [`DataSourceClient::new`] for production or
/// [`DataSourceClient::with_endpoint`] to point at a mock server in tests.
pub struct DataSourceClient {
    client: Client,
    service_key: Option<String>,
    endpoint: Url,
}

impl DataSourceClient {
    /// Creates a client pointed at the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        service_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, DirectoryError> {
        Self::with_endpoint(service_key, timeout_secs, user_agent, DEFAULT_ENDPOINT)
    }

    /// Creates a client with a custom endpoint URL.
    ///
    /// A missing `service_key` is accepted here and reported by
    /// [`DataSourceClient::fetch_items`], so the rest of the app can start
    /// without it.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`DirectoryError::InvalidEndpoint`] if `endpoint` does
    /// not parse.
    pub fn with_endpoint(
        service_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
        endpoint: &str,
    ) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let parsed = Url::parse(endpoint).map_err(|e| DirectoryError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            service_key: service_key
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_owned),
            endpoint: parsed,
        })
    }

    /// Fetches the raw `items` array.
    ///
    /// Items are returned untouched; field extraction happens in
    /// [`crate::normalize_items`].
    ///
    /// # Errors
    ///
    /// - [`DirectoryError::MissingCredential`] if no service key is set.
    /// - [`DirectoryError::Http`] on network failure.
    /// - [`DirectoryError::UnexpectedStatus`] on a non-2xx status.
    /// - [`DirectoryError::Deserialize`] if the body is not JSON.
    /// - [`DirectoryError::MalformedResponse`] if the body has no `items`
    ///   array.
    pub async fn fetch_items(&self) -> Result<Vec<serde_json::Value>, DirectoryError> {
        let service_key = self
            .service_key
            .as_deref()
            .ok_or(DirectoryError::MissingCredential)?;
        let url = self.build_url(service_key);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: self.endpoint.to_string(),
            });
        }

        let body = response.text().await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| DirectoryError::Deserialize {
                context: self.endpoint.to_string(),
                source: e,
            })?;

        extract_items(value)
    }

    /// Builds the request URL. The service key is appended here only, so the
    /// stored endpoint stays safe to log.
    fn build_url(&self, service_key: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("serviceKey", service_key)
            .append_pair("numOfRows", &NUM_OF_ROWS.to_string())
            .append_pair("pageNo", &PAGE_NO.to_string());
        url
    }
}

fn extract_items(body: serde_json::Value) -> Result<Vec<serde_json::Value>, DirectoryError> {
    let serde_json::Value::Object(mut envelope) = body else {
        return Err(DirectoryError::MalformedResponse(
            "response body is not a JSON object".to_string(),
        ));
    };
    match envelope.remove("items") {
        Some(serde_json::Value::Array(items)) => Ok(items),
        Some(_) => Err(DirectoryError::MalformedResponse(
            "`items` is not an array".to_string(),
        )),
        None => Err(DirectoryError::MalformedResponse(
            "missing `items` field".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(endpoint: &str) -> DataSourceClient {
        DataSourceClient::with_endpoint(Some("test-key"), 30, "storemap-test", endpoint)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_paging_and_key() {
        let client = test_client("https://apis.example.test/ypay/getYpay");
        let url = client.build_url("test-key");
        assert_eq!(
            url.as_str(),
            "https://apis.example.test/ypay/getYpay?serviceKey=test-key&numOfRows=1000&pageNo=1"
        );
    }

    #[test]
    fn build_url_encodes_service_key() {
        let client = test_client("https://apis.example.test/getYpay");
        let url = client.build_url("a+b/c==");
        assert!(
            url.as_str().contains("serviceKey=a%2Bb%2Fc%3D%3D"),
            "service key should be percent-encoded: {url}"
        );
    }

    #[test]
    fn blank_service_key_counts_as_missing() {
        let client =
            DataSourceClient::with_endpoint(Some("   "), 30, "storemap-test", "http://x.test/")
                .expect("client construction should not fail");
        assert!(client.service_key.is_none());
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let result = DataSourceClient::with_endpoint(None, 30, "storemap-test", "not a url");
        assert!(matches!(
            result,
            Err(DirectoryError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn extract_items_requires_array() {
        let items = extract_items(serde_json::json!({ "items": [{ "addr": "x" }] }))
            .expect("items array should be accepted");
        assert_eq!(items.len(), 1);

        for body in [
            serde_json::json!({ "items": "nope" }),
            serde_json::json!({ "totalCount": 0 }),
            serde_json::json!([1, 2, 3]),
        ] {
            assert!(matches!(
                extract_items(body),
                Err(DirectoryError::MalformedResponse(_))
            ));
        }
    }
}
