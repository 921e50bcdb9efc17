//! Query end-point trait for issuing a single query against one feed end-point

#[cfg(test)]
use mockall::automock;

use serde::Deserialize;

use crate::client::error::EndpointError;

/// A logical query issued to every end-point of a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Suggest package ids starting with a partial id
    PackageIds { partial_id: String, page_size: usize },
    /// List the versions available for a package
    PackageVersions { package_id: String, page_size: usize },
}

/// Trait for querying one end-point (a v3 auto-complete service or a legacy feed)
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait QueryEndpoint: Send + Sync {
    /// The URL identifying this end-point in logs
    fn url(&self) -> String;

    /// Issues the query and returns the strings the end-point reported
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Package ids or versions, in the order received
    /// * `Err(EndpointError)` - If the request fails or the body is malformed
    async fn query(&self, query: &Query) -> Result<Vec<String>, EndpointError>;
}

/// Accepted response shapes: a bare array, or an object wrapping it in `data`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QueryPayload {
    Bare(Vec<String>),
    Envelope { data: Vec<String> },
}

/// Extract the result strings from an end-point response body
pub fn parse_payload(body: &[u8]) -> Result<Vec<String>, EndpointError> {
    match serde_json::from_slice::<QueryPayload>(body) {
        Ok(QueryPayload::Bare(values)) | Ok(QueryPayload::Envelope { data: values }) => Ok(values),
        Err(e) => Err(EndpointError::InvalidResponse(e.to_string())),
    }
}

/// Send a prepared request and parse its payload, mapping failures to [`EndpointError`]
pub(crate) async fn fetch_strings(
    request: reqwest::RequestBuilder,
) -> Result<Vec<String>, EndpointError> {
    let response = request.send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(EndpointError::InvalidResponse(format!(
            "Unexpected status: {}",
            status
        )));
    }

    let body = response.bytes().await?;
    parse_payload(&body)
}
