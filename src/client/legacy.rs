//! Client for simple feeds that expose package-id and package-version lists directly
//!
//! No API index is involved: each feed URL (with a trailing "index.json"
//! trimmed) is the base for `/package-ids` and `/package-versions/<id>`.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::client::aggregate;
use crate::client::endpoint::{Query, QueryEndpoint, fetch_strings};
use crate::client::error::{ClientError, EndpointError};
use crate::client::index::base_url;
use crate::client::{ApiVersion, PackageSearch};
use crate::config::{ClientConfig, DEFAULT_INDEX_URL_V3};

/// One legacy feed, addressed by its base URL
pub struct LegacyFeed {
    client: Client,
    base_url: String,
}

impl LegacyFeed {
    pub fn new(client: Client, feed_url: &str) -> Self {
        Self {
            client,
            base_url: base_url(feed_url).to_string(),
        }
    }

    fn request_url(&self, query: &Query) -> String {
        let base = self.base_url.trim_end_matches('/');
        match query {
            Query::PackageIds { partial_id, .. } => format!(
                "{}/package-ids?includePrerelease=true&partialId={}",
                base,
                urlencoding::encode(partial_id)
            ),
            Query::PackageVersions { package_id, .. } => format!(
                "{}/package-versions/{}?includePrerelease=true",
                base,
                urlencoding::encode(package_id)
            ),
        }
    }
}

#[async_trait]
impl QueryEndpoint for LegacyFeed {
    fn url(&self) -> String {
        self.base_url.clone()
    }

    async fn query(&self, query: &Query) -> Result<Vec<String>, EndpointError> {
        let url = self.request_url(query);
        debug!("Querying legacy feed: {}", url);

        fetch_strings(self.client.get(&url)).await
    }
}

/// A client for one or more legacy feeds
pub struct LegacyClient {
    feeds: Vec<Box<dyn QueryEndpoint>>,
    config: ClientConfig,
}

impl LegacyClient {
    /// Create a client for the given feeds (the nuget.org index URL when empty)
    pub fn new(feed_urls: &[String], config: ClientConfig) -> Result<Self, ClientError> {
        let client = config
            .build_http_client()
            .map_err(ClientError::HttpClient)?;

        let feeds = if feed_urls.is_empty() {
            vec![DEFAULT_INDEX_URL_V3.to_string()]
        } else {
            feed_urls.to_vec()
        };

        let feeds = feeds
            .iter()
            .map(|url| Box::new(LegacyFeed::new(client.clone(), url)) as Box<dyn QueryEndpoint>)
            .collect();

        Ok(Self { feeds, config })
    }

    /// Base URLs of the feeds queried by the client
    pub fn feed_urls(&self) -> Vec<String> {
        self.feeds.iter().map(|feed| feed.url()).collect()
    }
}

#[async_trait]
impl PackageSearch for LegacyClient {
    fn api_version(&self) -> ApiVersion {
        ApiVersion::V2
    }

    async fn suggest_package_ids(
        &self,
        partial_id: &str,
        page_size: Option<usize>,
    ) -> Result<Vec<String>, ClientError> {
        let page_size = self.config.page_size(page_size);
        Ok(aggregate::suggest_package_ids(&self.feeds, partial_id, page_size).await)
    }

    async fn get_available_package_versions(
        &self,
        package_id: &str,
        page_size: Option<usize>,
    ) -> Result<Vec<String>, ClientError> {
        let page_size = self.config.page_size(page_size);
        let versions =
            aggregate::available_package_versions(&self.feeds, package_id, page_size).await?;
        Ok(versions)
    }
}
