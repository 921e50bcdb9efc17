//! NuGet feed clients for package-id and package-version discovery
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────────┐
//! │ create_client│────▶│    Index    │────▶│  V3 end-points  │
//! │  (dispatch)  │     │  (resolve)  │     │ (auto-complete) │
//! └──────────────┘     └─────────────┘     └─────────────────┘
//!        │                                          │
//!        ▼                                          ▼
//! ┌──────────────┐                         ┌─────────────────┐
//! │ Legacy feeds │────────────────────────▶│    Aggregate    │
//! │ (base URLs)  │                         │ (fan-out/merge) │
//! └──────────────┘                         └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`index`]: API index fetch and end-point resolution
//! - [`endpoint`]: Query trait implemented by every end-point kind
//! - [`aggregate`]: Concurrent fan-out, failure containment, merge and sort
//! - [`v3`]: Client for v3 of the NuGet API
//! - [`legacy`]: Client for simple feeds without an API index
//! - [`error`]: Error types for construction and per-end-point failures

pub mod aggregate;
pub mod endpoint;
pub mod error;
pub mod index;
pub mod legacy;
pub mod v3;

use std::fmt;

use async_trait::async_trait;
use tracing::info;

use crate::config::ClientConfig;
use error::ClientError;
use legacy::LegacyClient;
use v3::V3Client;

/// A well-known version of the NuGet API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiVersion {
    #[default]
    Unknown,
    V2,
    V3,
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiVersion::Unknown => "Unknown",
            ApiVersion::V2 => "V2",
            ApiVersion::V3 => "V3",
        };
        f.write_str(name)
    }
}

/// Operations shared by every client variant
#[async_trait]
pub trait PackageSearch: Send + Sync {
    /// The NuGet API version spoken by the client
    fn api_version(&self) -> ApiVersion;

    /// Suggest package ids that complete `partial_id`.
    ///
    /// Results from all end-points are de-duplicated and sorted lexically.
    /// End-points that fail are skipped, so this never fails on network errors.
    async fn suggest_package_ids(
        &self,
        partial_id: &str,
        page_size: Option<usize>,
    ) -> Result<Vec<String>, ClientError>;

    /// Get the versions available for `package_id`, lowest first.
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - De-duplicated versions sorted by semver precedence
    /// * `Err(ClientError::InvalidVersionFormat)` - If a feed reported an unparseable version
    async fn get_available_package_versions(
        &self,
        package_id: &str,
        page_size: Option<usize>,
    ) -> Result<Vec<String>, ClientError>;
}

/// A client for a set of NuGet feeds, selected by API version
pub enum NuGetClient {
    V2(LegacyClient),
    V3(V3Client),
}

impl NuGetClient {
    fn inner(&self) -> &dyn PackageSearch {
        match self {
            NuGetClient::V2(client) => client,
            NuGetClient::V3(client) => client,
        }
    }
}

#[async_trait]
impl PackageSearch for NuGetClient {
    fn api_version(&self) -> ApiVersion {
        self.inner().api_version()
    }

    async fn suggest_package_ids(
        &self,
        partial_id: &str,
        page_size: Option<usize>,
    ) -> Result<Vec<String>, ClientError> {
        self.inner().suggest_package_ids(partial_id, page_size).await
    }

    async fn get_available_package_versions(
        &self,
        package_id: &str,
        page_size: Option<usize>,
    ) -> Result<Vec<String>, ClientError> {
        self.inner()
            .get_available_package_versions(package_id, page_size)
            .await
    }
}

/// Create a client for the specified feeds.
///
/// - An explicit `V3` hint, or feed URLs that all look like v3 indexes, yields a
///   [`V3Client`] after resolving every index.
/// - Any other explicit hint fails with [`ClientError::UnsupportedVersion`]
///   before a request is made.
/// - Without a hint, unrecognized feed URLs yield a [`LegacyClient`]. This
///   includes lists that mix v3 index URLs with other URLs: every feed is then
///   queried as a legacy feed, so a v3 index is asked for `<base>/package-ids`.
///
/// With no feed URLs the nuget.org v3 index is used.
pub async fn create_client(
    feed_urls: &[String],
    api_version: Option<ApiVersion>,
    config: ClientConfig,
) -> Result<NuGetClient, ClientError> {
    let detected_v3 = feed_urls
        .iter()
        .all(|url| index::resolve_api_version(url) == ApiVersion::V3);

    match api_version {
        Some(ApiVersion::V3) => {}
        _ if detected_v3 => {}
        Some(unsupported) => {
            return Err(ClientError::UnsupportedVersion {
                api_version: unsupported,
                feed_url: feed_urls.join(", "),
            });
        }
        None => {
            info!("Using legacy feed client for {:?}", feed_urls);
            return Ok(NuGetClient::V2(LegacyClient::new(feed_urls, config)?));
        }
    }

    let client = V3Client::create_from_index(feed_urls, config).await?;
    info!(
        "Created v3 client with {} auto-complete end-point(s)",
        client.autocomplete_urls().len()
    );
    Ok(NuGetClient::V3(client))
}
