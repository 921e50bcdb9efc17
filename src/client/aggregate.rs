//! Fan-out/fan-in over every end-point of a client
//!
//! Each logical query is sent to all end-points concurrently. The call waits
//! for every request to settle, then merges the successful responses into a
//! de-duplicated, sorted result. A failing end-point only loses its own
//! contribution; it is logged and never fails the call.

use std::collections::BTreeSet;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::client::endpoint::{Query, QueryEndpoint};
use crate::version::error::VersionError;
use crate::version::semver::sort_versions;

/// Query every end-point and merge the results into a set.
///
/// Requests run concurrently on the calling task; no request is retried.
pub async fn query_all<E>(endpoints: &[E], query: &Query) -> BTreeSet<String>
where
    E: AsRef<dyn QueryEndpoint>,
{
    let futures = endpoints.iter().map(|endpoint| async move {
        let endpoint = endpoint.as_ref();
        match endpoint.query(query).await {
            Ok(values) => {
                debug!("{} returned {} result(s)", endpoint.url(), values.len());
                values
            }
            Err(e) => {
                warn!("Query to {} failed: {}", endpoint.url(), e);
                Vec::new()
            }
        }
    });

    join_all(futures).await.into_iter().flatten().collect()
}

/// Suggest package ids from all end-points, sorted lexically ascending
pub async fn suggest_package_ids<E>(endpoints: &[E], partial_id: &str, page_size: usize) -> Vec<String>
where
    E: AsRef<dyn QueryEndpoint>,
{
    let query = Query::PackageIds {
        partial_id: partial_id.to_string(),
        page_size,
    };

    query_all(endpoints, &query).await.into_iter().collect()
}

/// List available package versions from all end-points, sorted by semver precedence
pub async fn available_package_versions<E>(
    endpoints: &[E],
    package_id: &str,
    page_size: usize,
) -> Result<Vec<String>, VersionError>
where
    E: AsRef<dyn QueryEndpoint>,
{
    let query = Query::PackageVersions {
        package_id: package_id.to_string(),
        page_size,
    };

    let versions = query_all(endpoints, &query).await;
    sort_versions(versions.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::endpoint::MockQueryEndpoint;
    use crate::client::error::EndpointError;

    fn endpoint(url: &str, result: Result<Vec<&str>, &str>) -> Box<dyn QueryEndpoint> {
        let mut mock = MockQueryEndpoint::new();
        mock.expect_url().return_const(url.to_string());
        let result = result
            .map(|values| values.into_iter().map(String::from).collect::<Vec<_>>())
            .map_err(String::from);
        mock.expect_query().times(1).returning(move |_| match &result {
            Ok(values) => Ok(values.clone()),
            Err(reason) => Err(EndpointError::InvalidResponse(reason.clone())),
        });
        Box::new(mock)
    }

    #[tokio::test]
    async fn suggest_package_ids_merges_and_sorts_lexically() {
        let endpoints = vec![
            endpoint("https://a", Ok(vec!["Serilog", "Newtonsoft.Json"])),
            endpoint("https://b", Ok(vec!["Newtonsoft.Json", "Microsoft.Extensions.Logging"])),
        ];

        let ids = suggest_package_ids(&endpoints, "N", 10).await;

        assert_eq!(
            ids,
            vec!["Microsoft.Extensions.Logging", "Newtonsoft.Json", "Serilog"]
        );
    }

    #[tokio::test]
    async fn suggest_package_ids_deduplicates_case_sensitively() {
        let endpoints = vec![
            endpoint("https://a", Ok(vec!["newtonsoft.json", "Newtonsoft.Json"])),
            endpoint("https://b", Ok(vec!["Newtonsoft.Json"])),
        ];

        let ids = suggest_package_ids(&endpoints, "n", 10).await;

        assert_eq!(ids, vec!["Newtonsoft.Json", "newtonsoft.json"]);
    }

    #[tokio::test]
    async fn suggest_package_ids_ignores_failed_endpoint() {
        let endpoints = vec![
            endpoint("https://a", Err("Unexpected status: 500")),
            endpoint("https://b", Ok(vec!["B", "A"])),
        ];

        let ids = suggest_package_ids(&endpoints, "x", 10).await;

        assert_eq!(ids, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn suggest_package_ids_returns_empty_when_every_endpoint_fails() {
        let endpoints = vec![
            endpoint("https://a", Err("connection refused")),
            endpoint("https://b", Err("malformed body")),
        ];

        let ids = suggest_package_ids(&endpoints, "x", 10).await;

        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn query_all_passes_query_to_every_endpoint() {
        let expected = Query::PackageVersions {
            package_id: "Serilog".to_string(),
            page_size: 5,
        };
        let endpoints: Vec<Box<dyn QueryEndpoint>> = ["https://a", "https://b"]
            .into_iter()
            .map(|url| {
                let mut mock = MockQueryEndpoint::new();
                mock.expect_url().return_const(url.to_string());
                let expected = expected.clone();
                mock.expect_query()
                    .withf(move |query| *query == expected)
                    .times(1)
                    .returning(|_| Ok(vec!["1.0.0".to_string()]));
                Box::new(mock) as Box<dyn QueryEndpoint>
            })
            .collect();

        let versions = available_package_versions(&endpoints, "Serilog", 5)
            .await
            .unwrap();

        assert_eq!(versions, vec!["1.0.0"]);
    }

    #[tokio::test]
    async fn available_package_versions_sorts_by_semver() {
        let endpoints = vec![
            endpoint("https://a", Ok(vec!["1.0.1", "1.0.0"])),
            endpoint("https://b", Ok(vec!["1.0.0-beta", "1.0.0", "10.0.0", "2.0.0"])),
        ];

        let versions = available_package_versions(&endpoints, "Pkg", 10)
            .await
            .unwrap();

        assert_eq!(
            versions,
            vec!["1.0.0-beta", "1.0.0", "1.0.1", "2.0.0", "10.0.0"]
        );
    }

    #[tokio::test]
    async fn available_package_versions_surfaces_invalid_version() {
        let endpoints = vec![endpoint("https://a", Ok(vec!["1.0.0", "banana"]))];

        let result = available_package_versions(&endpoints, "Pkg", 10).await;

        assert!(matches!(result, Err(VersionError::InvalidFormat { .. })));
    }

    #[tokio::test]
    async fn available_package_versions_is_empty_without_endpoints() {
        let endpoints: Vec<Box<dyn QueryEndpoint>> = Vec::new();

        let versions = available_package_versions(&endpoints, "Pkg", 10)
            .await
            .unwrap();

        assert!(versions.is_empty());
    }
}
