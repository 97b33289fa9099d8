//! Errors raised by key-value store adapters

use std::fmt;
use std::time::Duration;

/// Failure of a single store round-trip
#[derive(Debug)]
pub enum StoreError {
    /// The store could not be reached (dial, transport or connection failure)
    Unavailable {
        endpoint: Option<String>,
        reason: String,
    },
    /// A round-trip did not complete before its deadline
    Timeout {
        operation: &'static str,
        after: Duration,
    },
    /// The store answered with an error of its own
    Backend(String),
}

impl StoreError {
    pub fn unavailable<R: Into<String>>(reason: R) -> Self {
        StoreError::Unavailable {
            endpoint: None,
            reason: reason.into(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        if let StoreError::Unavailable { endpoint: ref mut e, .. } = self {
            *e = Some(endpoint.to_string());
        }
        self
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable {
                endpoint: Some(endpoint),
                reason,
            } => write!(f, "store unavailable at {}: {}", endpoint, reason),
            StoreError::Unavailable { endpoint: None, reason } => {
                write!(f, "store unavailable: {}", reason)
            }
            StoreError::Timeout { operation, after } => {
                write!(f, "store {} timed out after {:?}", operation, after)
            }
            StoreError::Backend(msg) => write!(f, "store error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_endpoint() {
        let err = StoreError::unavailable("connection refused").with_endpoint("http://10.0.0.5:2379");
        let display = err.to_string();
        assert!(display.contains("10.0.0.5:2379"));
        assert!(display.contains("connection refused"));
    }

    #[test]
    fn test_with_endpoint_ignores_other_kinds() {
        let err = StoreError::Backend("lease not found".to_string()).with_endpoint("http://x:2379");
        assert_eq!(err.to_string(), "store error: lease not found");
    }

    #[test]
    fn test_timeout_display() {
        let err = StoreError::Timeout {
            operation: "put",
            after: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "store put timed out after 5s");
    }
}
