//! Mock feed utilities

use mockito::{Matcher, Mock, ServerGuard};

/// Register a v3 API index listing the given `(path, @type)` resources on `server`
pub async fn mock_index(server: &mut ServerGuard, path: &str, resources: &[(&str, &str)]) -> Mock {
    let resources: Vec<serde_json::Value> = resources
        .iter()
        .map(|(resource_path, resource_type)| {
            serde_json::json!({
                "@id": format!("{}{}", server.url(), resource_path),
                "@type": resource_type,
            })
        })
        .collect();
    let body = serde_json::json!({ "version": "3.0.0", "resources": resources }).to_string();

    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

/// Register an auto-complete response for requests carrying `key=value`
pub async fn mock_autocomplete(
    server: &mut ServerGuard,
    path: &str,
    key: &str,
    value: &str,
    status: usize,
    body: &str,
) -> Mock {
    server
        .mock("GET", path)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(key.into(), value.into()),
            Matcher::UrlEncoded("prerelease".into(), "true".into()),
        ]))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}
