//! Error types for the Bitcoin price poller

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when fetching a price from a provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed (DNS, connection refused, body read)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered 429 Too Many Requests
    #[error("Rate limit exceeded")]
    RateLimited {
        /// Delay suggested by the `Retry-After` header, if usable
        retry_after: Option<Duration>,
    },

    /// Any other non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Body was not the expected JSON shape or lacked the price field
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Creates a RateLimited error
    pub fn rate_limited(retry_after: Option<Duration>) -> Self {
        Self::RateLimited { retry_after }
    }

    /// Creates a MalformedResponse error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// True for a 429 response, the only error the poller retries
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_rate_limit_is_retryable() {
        assert!(ProviderError::rate_limited(None).is_rate_limited());
        assert!(ProviderError::rate_limited(Some(Duration::from_secs(5))).is_rate_limited());
        assert!(!ProviderError::malformed("x").is_rate_limited());
        assert!(!ProviderError::Http {
            status: 500,
            body: String::new()
        }
        .is_rate_limited());
    }

    #[test]
    fn test_display() {
        let err = ProviderError::Http {
            status: 503,
            body: "down".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: down");
        assert_eq!(
            ProviderError::malformed("missing usd").to_string(),
            "Malformed response: missing usd"
        );
    }
}
