//! Error types for MAAS RAID management
//!
//! Resolution failures name the identifier that could not be found. Remote
//! and transport failures are passed through as-is.

use thiserror::Error;

/// Unified error type for the client and the resource handler
#[derive(Error, Debug)]
pub enum MaasError {
    // =========================================================================
    // Resolution Errors
    // =========================================================================
    #[error("machine ({0}) was not found")]
    MachineNotFound(String),

    #[error("raid ({0}) was not found")]
    RaidNotFound(String),

    // =========================================================================
    // Input Errors
    // =========================================================================
    #[error("unexpected format of ID ({0:?}), expected MACHINE:RAID")]
    InvalidImportId(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid API key, expected <consumer_key>:<token_key>:<token_secret>")]
    InvalidApiKey,

    // =========================================================================
    // Remote Errors
    // =========================================================================
    #[error("API request failed: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, MaasError>;

impl MaasError {
    /// True for the two resolution failures
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::MachineNotFound(_) | Self::RaidNotFound(_))
    }

    /// HTTP status of a remote failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages_name_identifier() {
        assert_eq!(
            MaasError::MachineNotFound("node-1".into()).to_string(),
            "machine (node-1) was not found"
        );
        assert_eq!(
            MaasError::RaidNotFound("md0".into()).to_string(),
            "raid (md0) was not found"
        );
    }

    #[test]
    fn test_import_id_message_quotes_input() {
        let err = MaasError::InvalidImportId("abc".into());
        assert_eq!(
            err.to_string(),
            "unexpected format of ID (\"abc\"), expected MACHINE:RAID"
        );
    }

    #[test]
    fn test_status_and_not_found() {
        let err = MaasError::Api {
            status: 404,
            body: "Not Found".into(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_not_found());
        assert!(MaasError::RaidNotFound("7".into()).is_not_found());
    }
}
