use thiserror::Error;

use crate::client::ApiVersion;
use crate::version::error::VersionError;

/// Errors surfaced to callers of the client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Unsupported API version \"{api_version}\" for feed \"{feed_url}\"")]
    UnsupportedVersion {
        api_version: ApiVersion,
        feed_url: String,
    },

    #[error("Request for the NuGet API index {url} failed: {reason}")]
    IndexFetch { url: String, reason: String },

    #[error("Invalid NuGet API index {url}: {reason}")]
    IndexFormat { url: String, reason: String },

    #[error("No auto-complete end-points found in {0:?}")]
    NoEndpoints(Vec<String>),

    #[error(transparent)]
    InvalidVersionFormat(#[from] VersionError),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Failure of a single endpoint within a fan-out query.
///
/// These never reach the caller; the aggregation step logs them and
/// treats the endpoint's contribution as empty.
#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
