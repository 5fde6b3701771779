//! Error types for data operations.

use std::time::Duration;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
///
/// Only transport failures reach callers of the fetch paths. Markup and value
/// misses are reported through [`crate::Extracted`] instead.
#[derive(Debug, Error)]
pub enum DataError {
    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Http {
        /// Status code returned by the portal
        status: u16,
        /// Requested URL
        url: String,
    },

    /// A single attempt exceeded its deadline
    #[error("Request to {url} timed out after {after:?}")]
    Timeout {
        /// Requested URL
        url: String,
        /// Deadline that was exceeded
        after: Duration,
    },

    /// Invalid symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DataError {
    /// Whether this error came from the transport layer.
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Http { .. } | Self::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        let http = DataError::Http {
            status: 503,
            url: "https://dps.psx.com.pk/indices/KSE100".to_string(),
        };
        assert!(http.is_transport());
        assert!(http.to_string().contains("503"));

        let timeout = DataError::Timeout {
            url: "x".to_string(),
            after: Duration::from_secs(10),
        };
        assert!(timeout.is_transport());

        assert!(!DataError::InvalidSymbol(String::new()).is_transport());
    }
}
