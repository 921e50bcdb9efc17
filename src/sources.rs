//! Package sources configured in NuGet.config
//!
//! Only the `<packageSources>` section is read; the resulting map feeds
//! candidate URLs to [`crate::client::create_client`].

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Configured package sources: source name -> URL or file-system path, in file order
pub type PackageSources = IndexMap<String, String>;

#[derive(Debug, Error)]
pub enum SourcesError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid NuGet.config: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("Cannot determine user's home directory")]
    NoHomeDir,
}

/// The subset of NuGet.config this crate understands
#[derive(Debug, Default, Deserialize)]
struct NuGetConfig {
    #[serde(rename = "packageSources", default)]
    package_sources: Option<PackageSourcesSection>,
}

#[derive(Debug, Default, Deserialize)]
struct PackageSourcesSection {
    #[serde(default)]
    add: Vec<PackageSourceEntry>,
}

#[derive(Debug, Deserialize)]
struct PackageSourceEntry {
    #[serde(rename = "@key")]
    key: String,
    #[serde(rename = "@value")]
    value: String,
}

/// Parse the package sources out of NuGet.config XML
pub fn parse_package_sources(xml: &str) -> Result<PackageSources, SourcesError> {
    let config: NuGetConfig = quick_xml::de::from_str(xml)?;

    let mut package_sources = PackageSources::new();
    for source in config.package_sources.unwrap_or_default().add {
        debug!("PackageSource[\"{}\"] = \"{}\"", source.key, source.value);
        package_sources.insert(source.key, source.value);
    }

    Ok(package_sources)
}

/// Get configured package sources from the NuGet.config at `path`
pub fn get_configured_package_sources(path: &Path) -> Result<PackageSources, SourcesError> {
    let xml = std::fs::read_to_string(path).map_err(|source| SourcesError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_package_sources(&xml)
}

/// Sources that can be queried over HTTP, in file order
pub fn feed_urls(package_sources: &PackageSources) -> Vec<String> {
    package_sources
        .values()
        .filter(|value| value.starts_with("http://") || value.starts_with("https://"))
        .cloned()
        .collect()
}

/// Get the path to the user-level NuGet.config, or `None` if the file does not exist
pub fn user_config_file() -> Result<Option<PathBuf>, SourcesError> {
    let path = user_config_path(dirs::home_dir(), cfg!(windows))?;
    Ok(path.is_file().then_some(path))
}

fn user_config_path(home_dir: Option<PathBuf>, windows: bool) -> Result<PathBuf, SourcesError> {
    let home_dir = home_dir.ok_or(SourcesError::NoHomeDir)?;

    let path = if windows {
        home_dir.join("AppData/Roaming/NuGet/NuGet.config")
    } else {
        home_dir.join(".nuget/NuGet/NuGet.config")
    };

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_package_sources_reads_add_entries_in_order() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<configuration>
  <packageSources>
    <add key="nuget.org" value="https://api.nuget.org/v3/index.json" protocolVersion="3" />
    <add key="local" value="C:\packages" />
  </packageSources>
</configuration>"#;

        let sources = parse_package_sources(xml).unwrap();

        assert_eq!(
            sources.into_iter().collect::<Vec<_>>(),
            vec![
                (
                    "nuget.org".to_string(),
                    "https://api.nuget.org/v3/index.json".to_string()
                ),
                ("local".to_string(), r"C:\packages".to_string()),
            ]
        );
    }

    #[test]
    fn parse_package_sources_tolerates_clear_and_other_sections() {
        let xml = r#"<configuration>
  <config>
    <add key="globalPackagesFolder" value="/tmp/packages" />
  </config>
  <packageSources>
    <clear />
    <add key="a" value="https://a.example/v3/index.json" />
    <clear />
    <add key="b" value="https://b.example/api" />
  </packageSources>
  <disabledPackageSources />
</configuration>"#;

        let sources = parse_package_sources(xml).unwrap();

        assert_eq!(
            sources.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn parse_package_sources_returns_empty_without_section() {
        let sources = parse_package_sources("<configuration></configuration>").unwrap();
        assert!(sources.is_empty());

        let sources =
            parse_package_sources("<configuration><packageSources /></configuration>").unwrap();
        assert!(sources.is_empty());
    }

    #[test]
    fn parse_package_sources_keeps_last_value_for_duplicate_keys() {
        let xml = r#"<configuration><packageSources>
    <add key="feed" value="https://old.example/api" />
    <add key="feed" value="https://new.example/api" />
</packageSources></configuration>"#;

        let sources = parse_package_sources(xml).unwrap();

        assert_eq!(sources.len(), 1);
        assert_eq!(sources["feed"], "https://new.example/api");
    }

    #[test]
    fn parse_package_sources_rejects_malformed_xml() {
        let result = parse_package_sources("<configuration><packageSources>");
        assert!(matches!(result, Err(SourcesError::Xml(_))));
    }

    #[test]
    fn feed_urls_skips_file_system_sources() {
        let sources = PackageSources::from([
            ("local".to_string(), "/srv/packages".to_string()),
            ("nuget.org".to_string(), "https://api.nuget.org/v3/index.json".to_string()),
            ("intranet".to_string(), "http://intranet/nuget".to_string()),
        ]);

        assert_eq!(
            feed_urls(&sources),
            vec!["https://api.nuget.org/v3/index.json", "http://intranet/nuget"]
        );
    }

    #[test]
    fn user_config_path_uses_dot_nuget_outside_windows() {
        let path = user_config_path(Some(PathBuf::from("/home/user")), false).unwrap();
        assert_eq!(path, PathBuf::from("/home/user/.nuget/NuGet/NuGet.config"));
    }

    #[test]
    fn user_config_path_uses_app_data_on_windows() {
        let path = user_config_path(Some(PathBuf::from("/home/user")), true).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/home/user/AppData/Roaming/NuGet/NuGet.config")
        );
    }

    #[test]
    fn user_config_path_fails_without_home_dir() {
        assert!(matches!(
            user_config_path(None, false),
            Err(SourcesError::NoHomeDir)
        ));
    }
}
