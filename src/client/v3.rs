//! Client for v3 of the NuGet API

use async_trait::async_trait;
use futures::future::try_join_all;
use indexmap::IndexSet;
use reqwest::Client;
use tracing::debug;

use crate::client::aggregate;
use crate::client::endpoint::{Query, QueryEndpoint, fetch_strings};
use crate::client::error::{ClientError, EndpointError};
use crate::client::index::{self, FeedEndpoint};
use crate::client::{ApiVersion, PackageSearch};
use crate::config::{ClientConfig, DEFAULT_INDEX_URL_V3};

/// A v3 SearchAutocompleteService end-point
pub struct AutocompleteEndpoint {
    client: Client,
    url: String,
}

impl AutocompleteEndpoint {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl QueryEndpoint for AutocompleteEndpoint {
    fn url(&self) -> String {
        self.url.clone()
    }

    async fn query(&self, query: &Query) -> Result<Vec<String>, EndpointError> {
        let (key, value, page_size) = match query {
            Query::PackageIds {
                partial_id,
                page_size,
            } => ("q", partial_id, page_size),
            Query::PackageVersions {
                package_id,
                page_size,
            } => ("id", package_id, page_size),
        };
        debug!("Querying {} with {}={}", self.url, key, value);

        let url = format!(
            "{}?{}={}&take={}&prerelease=true",
            self.url,
            key,
            urlencoding::encode(value),
            page_size
        );

        fetch_strings(self.client.get(&url)).await
    }
}

/// A client for v3 of the NuGet API
pub struct V3Client {
    endpoints: Vec<Box<dyn QueryEndpoint>>,
    autocomplete_urls: Vec<String>,
    config: ClientConfig,
}

impl V3Client {
    /// Create a client from already-resolved end-points
    pub fn new(client: Client, endpoints: Vec<FeedEndpoint>, config: ClientConfig) -> Self {
        let autocomplete_urls: Vec<String> = endpoints.into_iter().map(|e| e.url).collect();
        let endpoints = autocomplete_urls
            .iter()
            .map(|url| {
                Box::new(AutocompleteEndpoint::new(client.clone(), url.clone()))
                    as Box<dyn QueryEndpoint>
            })
            .collect();

        Self {
            endpoints,
            autocomplete_urls,
            config,
        }
    }

    /// Create a client over arbitrary query end-points
    pub fn with_endpoints(endpoints: Vec<Box<dyn QueryEndpoint>>, config: ClientConfig) -> Self {
        let autocomplete_urls = endpoints.iter().map(|e| e.url()).collect();
        Self {
            endpoints,
            autocomplete_urls,
            config,
        }
    }

    /// Create a client by resolving the API index of every feed.
    ///
    /// Indexes are fetched concurrently; the first failure fails construction.
    /// When `index_urls` is empty the nuget.org index is used.
    pub async fn create_from_index(
        index_urls: &[String],
        config: ClientConfig,
    ) -> Result<Self, ClientError> {
        let index_urls = if index_urls.is_empty() {
            vec![DEFAULT_INDEX_URL_V3.to_string()]
        } else {
            index_urls.to_vec()
        };

        let client = config
            .build_http_client()
            .map_err(ClientError::HttpClient)?;

        let resolved = try_join_all(
            index_urls
                .iter()
                .map(|url| index::resolve_endpoints(&client, url)),
        )
        .await?;

        // Feeds may share search services; query each URL once
        let endpoints: IndexSet<FeedEndpoint> = resolved.into_iter().flatten().collect();
        if endpoints.is_empty() {
            return Err(ClientError::NoEndpoints(index_urls));
        }

        Ok(Self::new(client, endpoints.into_iter().collect(), config))
    }

    /// URLs of the auto-complete end-points used by the client
    pub fn autocomplete_urls(&self) -> &[String] {
        &self.autocomplete_urls
    }
}

#[async_trait]
impl PackageSearch for V3Client {
    fn api_version(&self) -> ApiVersion {
        ApiVersion::V3
    }

    async fn suggest_package_ids(
        &self,
        partial_id: &str,
        page_size: Option<usize>,
    ) -> Result<Vec<String>, ClientError> {
        let page_size = self.config.page_size(page_size);
        Ok(aggregate::suggest_package_ids(&self.endpoints, partial_id, page_size).await)
    }

    async fn get_available_package_versions(
        &self,
        package_id: &str,
        page_size: Option<usize>,
    ) -> Result<Vec<String>, ClientError> {
        let page_size = self.config.page_size(page_size);
        let versions =
            aggregate::available_package_versions(&self.endpoints, package_id, page_size).await?;
        Ok(versions)
    }
}
