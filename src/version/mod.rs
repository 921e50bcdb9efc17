//! Version ordering for package versions returned by feeds
//!
//! - [`semver`]: Semantic-version precedence comparison and sorting
//! - [`error`]: Error raised for version strings that cannot be ordered

pub mod error;
pub mod semver;
