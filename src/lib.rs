//! Discovery of NuGet package ids and versions across one or more feeds.
//!
//! ```no_run
//! use nuget_client::client::{PackageSearch, create_client};
//! use nuget_client::config::ClientConfig;
//!
//! # async fn run() -> Result<(), nuget_client::client::error::ClientError> {
//! let client = create_client(&[], None, ClientConfig::default()).await?;
//! let ids = client.suggest_package_ids("Newtonsoft", None).await?;
//! let versions = client.get_available_package_versions("Newtonsoft.Json", Some(20)).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod logging;
pub mod sources;
pub mod version;
