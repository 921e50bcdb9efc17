use std::cmp::Ordering;

use semver::Version;

use crate::version::error::VersionError;

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Handles partial versions like "1" or "1.2" by padding with zeros.
/// Anything else that semver rejects is reported as invalid.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "1.2" -> Version(1, 2, 0)
/// - "1.2.3-beta" -> Version(1, 2, 3, pre: beta)
pub fn parse_version(version: &str) -> Result<Version, VersionError> {
    let (core, rest) = match version.find(['-', '+']) {
        Some(idx) => version.split_at(idx),
        None => (version, ""),
    };
    let normalized = match core.split('.').count() {
        1 => format!("{}.0.0{}", core, rest),
        2 => format!("{}.0{}", core, rest),
        _ => version.to_string(),
    };
    Version::parse(&normalized).map_err(|e| VersionError::InvalidFormat {
        version: version.to_string(),
        reason: e.to_string(),
    })
}

/// Compare two versions by semantic-versioning precedence.
///
/// Build metadata does not participate in precedence, so "1.0.0+a" and
/// "1.0.0+b" compare equal.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering, VersionError> {
    let a = parse_version(a)?;
    let b = parse_version(b)?;
    Ok(a.cmp_precedence(&b))
}

/// Sort versions ascending by semver precedence (lowest first, highest last).
///
/// Every version is parsed up front; a single unparseable entry fails the sort
/// instead of degrading to lexical order. Versions with equal precedence are
/// ordered lexically so the result does not depend on input order.
pub fn sort_versions(versions: Vec<String>) -> Result<Vec<String>, VersionError> {
    let mut parsed = versions
        .into_iter()
        .map(|v| parse_version(&v).map(|parsed| (v, parsed)))
        .collect::<Result<Vec<_>, _>>()?;

    parsed.sort_by(|(a_str, a), (b_str, b)| a.cmp_precedence(b).then_with(|| a_str.cmp(b_str)));

    Ok(parsed.into_iter().map(|(v, _)| v).collect())
}
