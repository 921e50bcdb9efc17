use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// Feed-related constants
// =============================================================================

/// The default URL for the NuGet v3 API index
pub const DEFAULT_INDEX_URL_V3: &str = "https://api.nuget.org/v3/index.json";

/// Suffix identifying a NuGet v3 API index URL
pub const V3_INDEX_SUFFIX: &str = "/v3/index.json";

/// Suffix of the index document trimmed off to obtain a feed's base URL
pub const INDEX_DOCUMENT_SUFFIX: &str = "/index.json";

/// Default number of results requested from each endpoint
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "nuget-client";

/// Client configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Maximum number of results requested per endpoint when the caller gives none
    pub default_page_size: usize,
    /// Per-request timeout in milliseconds (no timeout when unset)
    pub request_timeout_ms: Option<u64>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            request_timeout_ms: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Resolve the page size for a query, falling back to the configured default.
    ///
    /// A page size of zero is treated as unspecified.
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested
            .filter(|size| *size > 0)
            .unwrap_or(self.default_page_size)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Build the HTTP client shared by every endpoint of a client instance.
    pub fn build_http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.request_timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

/// Returns the path to the data directory for nuget-client.
/// Uses $XDG_DATA_HOME/nuget-client if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/nuget-client,
/// or ./nuget-client if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("nuget-client.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("nuget-client")
}
