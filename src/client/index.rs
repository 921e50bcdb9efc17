//! NuGet API index resolution
//!
//! Classifies feed URLs by convention and turns a v3 service index into the
//! set of auto-complete end-points a client queries.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::ApiVersion;
use crate::client::error::ClientError;
use crate::config::{INDEX_DOCUMENT_SUFFIX, V3_INDEX_SUFFIX};

/// Type of a resource advertised by the API index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ResourceType {
    #[serde(rename = "SearchQueryService")]
    SearchQuery,
    #[serde(rename = "SearchAutocompleteService")]
    SearchAutocomplete,
    #[serde(rename = "PackageBaseAddress/3.0.0")]
    PackageBaseAddress,
    /// Any resource type this client does not use
    #[serde(other)]
    Other,
}

/// A resource entry from the API index
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiResource {
    /// The resource Id (end-point URL)
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub resource_type: ResourceType,
    #[serde(default)]
    pub comment: Option<String>,
}

/// The parsed API index of a v3 feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityIndex {
    pub resources: Vec<ApiResource>,
}

/// A resolved end-point URL and the capability it provides
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedEndpoint {
    pub url: String,
    pub resource_type: ResourceType,
}

impl CapabilityIndex {
    /// Interpret an index document.
    ///
    /// The document must be an object whose `resources` field is an array.
    /// Entries that do not look like resources are skipped.
    pub fn from_value(url: &str, document: Value) -> Result<Self, ClientError> {
        let Value::Object(mut document) = document else {
            return Err(ClientError::IndexFormat {
                url: url.to_string(),
                reason: "index is not a JSON object".to_string(),
            });
        };

        let Some(Value::Array(entries)) = document.remove("resources") else {
            return Err(ClientError::IndexFormat {
                url: url.to_string(),
                reason: "\"resources\" is missing or is not an array".to_string(),
            });
        };

        let resources = entries
            .into_iter()
            .filter_map(|entry| {
                serde_json::from_value::<ApiResource>(entry)
                    .inspect_err(|e| debug!("Skipping malformed resource in {}: {}", url, e))
                    .ok()
            })
            .collect();

        Ok(Self { resources })
    }

    /// Resources of the given type, in index order
    pub fn endpoints(&self, resource_type: ResourceType) -> Vec<FeedEndpoint> {
        self.resources
            .iter()
            .filter(|resource| resource.resource_type == resource_type)
            .map(|resource| FeedEndpoint {
                url: resource.id.clone(),
                resource_type,
            })
            .collect()
    }
}

/// Determine whether the URL is the index for v3 of the NuGet API
pub fn is_v3_index_url(url: &str) -> bool {
    url.ends_with(V3_INDEX_SUFFIX)
}

/// Classify a feed URL by convention, without touching the network
pub fn resolve_api_version(feed_url: &str) -> ApiVersion {
    if is_v3_index_url(feed_url) {
        ApiVersion::V3
    } else {
        ApiVersion::Unknown
    }
}

/// Compute the base URL that relative request paths are appended to.
///
/// A trailing "index.json" is trimmed, keeping the preceding '/':
/// "https://host/v3/index.json" -> "https://host/v3/".
/// Other URLs are returned unchanged.
pub fn base_url(feed_url: &str) -> &str {
    match feed_url.strip_suffix(INDEX_DOCUMENT_SUFFIX) {
        Some(prefix) => &feed_url[..prefix.len() + 1],
        None => feed_url,
    }
}

/// Fetch and parse the API index at `index_url`
pub async fn fetch_index(
    client: &reqwest::Client,
    index_url: &str,
) -> Result<CapabilityIndex, ClientError> {
    debug!("Fetching NuGet API index: {}", index_url);

    let fetch_error = |reason: String| ClientError::IndexFetch {
        url: index_url.to_string(),
        reason,
    };

    let response = client
        .get(index_url)
        .send()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        warn!("NuGet API index returned status {}: {}", status, index_url);
        return Err(fetch_error(format!("Unexpected status: {}", status)));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;

    if body.is_empty() {
        return Err(ClientError::IndexFormat {
            url: index_url.to_string(),
            reason: "empty response body".to_string(),
        });
    }

    let document: Value = serde_json::from_slice(&body).map_err(|e| ClientError::IndexFormat {
        url: index_url.to_string(),
        reason: e.to_string(),
    })?;

    CapabilityIndex::from_value(index_url, document)
}

/// Resolve the auto-complete end-points advertised by the index at `index_url`.
///
/// Package-id suggestions and version listing share the same v3 resource.
pub async fn resolve_endpoints(
    client: &reqwest::Client,
    index_url: &str,
) -> Result<Vec<FeedEndpoint>, ClientError> {
    let index = fetch_index(client, index_url).await?;
    let endpoints = index.endpoints(ResourceType::SearchAutocomplete);

    info!(
        "Resolved {} auto-complete end-point(s) from {}",
        endpoints.len(),
        index_url
    );

    Ok(endpoints)
}
