use thiserror::Error;

/// Errors raised while fetching the raw store list from the data source.
///
/// None of these escape [`crate::StoreDirectory::load_all`]; they are logged
/// and the directory falls back to an empty set.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// No data-source service key was configured.
    #[error("data source service key is not configured")]
    MissingCredential,

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The data source answered with a non-2xx status.
    #[error("data source returned HTTP {status} for {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    /// The response body was not JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body was JSON but lacked an `items` array.
    #[error("malformed data source response: {0}")]
    MalformedResponse(String),

    /// The configured endpoint is not a valid URL.
    #[error("invalid data source endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
