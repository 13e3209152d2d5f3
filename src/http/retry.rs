//! Retry policy for JSON document fetches.
//!
//! Catalog pages never go through here: their status codes are outcomes in
//! their own right. Only the small JSON documents (alias and outlier tables,
//! the version manifest) are retried, and only when a later attempt could
//! plausibly succeed.

use reqwest::StatusCode;
use std::fmt;
use std::time::Duration;

/// How many times a JSON fetch is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Attempt once, never wait.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

/// A failed document fetch that another attempt would not fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonRetryableError {
    /// 429
    RateLimitExceeded { url: String },
    /// 404
    NotFound { url: String },
    /// 403
    Forbidden { url: String },
    /// Any other 4xx
    ClientError { url: String, status: u16 },
}

impl fmt::Display for NonRetryableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonRetryableError::RateLimitExceeded { url } => {
                write!(f, "Rate limit exceeded for {}. Try again later.", url)
            }
            NonRetryableError::NotFound { url } => write!(f, "Document not found: {}", url),
            NonRetryableError::Forbidden { url } => {
                write!(f, "Access to {} was refused", url)
            }
            NonRetryableError::ClientError { url, status } => {
                write!(f, "Request to {} failed with HTTP {}", url, status)
            }
        }
    }
}

impl std::error::Error for NonRetryableError {}

/// `None` when the status leaves room for another attempt (5xx, or not an error at all).
pub fn non_retryable_status(status: StatusCode, url: &str) -> Option<NonRetryableError> {
    let url = url.to_string();
    match status {
        StatusCode::TOO_MANY_REQUESTS => Some(NonRetryableError::RateLimitExceeded { url }),
        StatusCode::NOT_FOUND => Some(NonRetryableError::NotFound { url }),
        StatusCode::FORBIDDEN => Some(NonRetryableError::Forbidden { url }),
        s if s.is_client_error() => Some(NonRetryableError::ClientError {
            url,
            status: s.as_u16(),
        }),
        _ => None,
    }
}

/// Wrap an error from `error_for_status()` so the retry loop can tell whether to give up.
pub fn check_retryable(error: reqwest::Error) -> anyhow::Error {
    let fatal = error.status().and_then(|status| {
        let url = error.url().map(|u| u.as_str()).unwrap_or_default();
        non_retryable_status(status, url)
    });

    match fatal {
        Some(fatal) => anyhow::Error::from(fatal),
        None => anyhow::Error::from(error),
    }
}

/// Whether an error coming out of an attempt is worth another one.
pub fn is_retryable(error: &anyhow::Error) -> bool {
    error.downcast_ref::<NonRetryableError>().is_none()
}
