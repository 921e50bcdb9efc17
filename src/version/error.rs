use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version format \"{version}\": {reason}")]
    InvalidFormat { version: String, reason: String },
}
