//! Error types surfaced by record provider operations

use std::fmt;
use std::time::Duration;

use crate::store::StoreError;

/// Provider operation error
///
/// Store failures keep unavailability and deadline expiry apart so callers
/// can choose whether to retry. Nothing in this crate retries on its own.
#[derive(Debug)]
pub enum ProviderError {
    /// The store could not be reached
    StoreUnavailable {
        endpoint: Option<String>,
        reason: String,
    },
    /// A store round-trip exceeded its deadline
    StoreTimeout {
        operation: &'static str,
        after: Duration,
    },
    /// A stored value could not be parsed during a write-path check
    Decode {
        key: String,
        source: serde_json::Error,
    },
    /// A record could not be serialized
    Encode(serde_json::Error),
    /// Any other failure reported by the store
    Store(StoreError),
}

impl ProviderError {
    /// Whether the same call may succeed if issued again later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::StoreUnavailable { .. } | ProviderError::StoreTimeout { .. }
        )
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::StoreUnavailable {
                endpoint: Some(endpoint),
                reason,
            } => write!(f, "Store unavailable at {}: {}", endpoint, reason),
            ProviderError::StoreUnavailable { endpoint: None, reason } => {
                write!(f, "Store unavailable: {}", reason)
            }
            ProviderError::StoreTimeout { operation, after } => {
                write!(f, "Store {} timed out after {:?}", operation, after)
            }
            ProviderError::Decode { key, source } => {
                write!(f, "Malformed value at {}: {}", key, source)
            }
            ProviderError::Encode(e) => write!(f, "Failed to encode record: {}", e),
            ProviderError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::Decode { source, .. } => Some(source),
            ProviderError::Encode(e) => Some(e),
            ProviderError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ProviderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable { endpoint, reason } => {
                ProviderError::StoreUnavailable { endpoint, reason }
            }
            StoreError::Timeout { operation, after } => {
                ProviderError::StoreTimeout { operation, after }
            }
            other => ProviderError::Store(other),
        }
    }
}

/// Result type alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
