//! HTTP access: a shared client, single-shot page fetches and retried JSON fetches.

mod client;
mod retry;

pub use client::{HttpClient, PageResponse};
pub use retry::{NonRetryableError, RetryPolicy, check_retryable, is_retryable, non_retryable_status};
