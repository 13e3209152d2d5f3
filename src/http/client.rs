//! HTTP client shared by the catalog scraper and the JSON document loaders.

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::future::Future;

use super::retry::{RetryPolicy, check_retryable, is_retryable};

/// A response whose status code is meaningful to the caller.
///
/// Unlike [`HttpClient::get_json`], nothing here is turned into an error based on
/// the status: a 403 or a 404 is data, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

impl PageResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// reqwest client plus the retry policy for JSON documents.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn new(client: Client) -> Self {
        Self::with_retry_policy(client, RetryPolicy::default())
    }

    pub fn with_retry_policy(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// GET a JSON document, retrying transport failures and 5xx answers.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.retrying(url, || async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .with_context(|| format!("Failed to send request to {}", url))?
                .error_for_status()
                .map_err(check_retryable)?;

            response
                .json::<T>()
                .await
                .with_context(|| format!("Failed to decode JSON from {}", url))
        })
        .await
    }

    /// Performs a single GET request and returns the status and body as-is.
    ///
    /// Only transport failures (DNS, refused connection, TLS, timeout, a body that
    /// cannot be read) are errors.
    #[tracing::instrument(skip(self))]
    pub async fn get_page(&self, url: &str) -> Result<PageResponse> {
        debug!("GET page {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        debug!("{} answered {} ({} bytes)", url, status, body.len());
        Ok(PageResponse { status, body })
    }

    async fn retrying<F, Fut, T>(&self, url: &str, attempt: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut number = 1;

        loop {
            let error = match attempt().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !is_retryable(&error) {
                debug!("{}: giving up: {}", url, error);
                return Err(error);
            }
            if number >= max_attempts {
                return Err(error.context(format!(
                    "{} failed after {} attempt(s)",
                    url, max_attempts
                )));
            }

            warn!(
                "{}: attempt {}/{} failed ({:#}), retrying in {:?}...",
                url, number, max_attempts, error, self.retry.delay
            );
            tokio::time::sleep(self.retry.delay).await;
            number += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::NonRetryableError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn quick_client() -> HttpClient {
        HttpClient::with_retry_policy(
            Client::new(),
            RetryPolicy {
                max_attempts: 3,
                delay: Duration::from_millis(1),
            },
        )
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/aliases.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"xaeros": "xaeros-minimap"}"#)
            .create_async()
            .await;

        let table: HashMap<String, String> = quick_client()
            .get_json(&format!("{}/aliases.json", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(table["xaeros"], "xaeros-minimap");
    }

    #[tokio::test]
    async fn test_get_json_not_found_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/missing.json")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let result: Result<serde_json::Value> = quick_client()
            .get_json(&format!("{}/missing.json", server.url()))
            .await;

        mock.assert_async().await;
        assert!(matches!(
            result.unwrap_err().downcast_ref::<NonRetryableError>(),
            Some(NonRetryableError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_json_server_error_uses_every_attempt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/versions.json")
            .with_status(502)
            .expect(3)
            .create_async()
            .await;

        let result: Result<serde_json::Value> = quick_client()
            .get_json(&format!("{}/versions.json", server.url()))
            .await;

        mock.assert_async().await;
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("failed after 3 attempt(s)"));
    }

    #[tokio::test]
    async fn test_get_page_returns_status_without_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/sodium/files")
            .with_status(403)
            .with_body("<html>challenge</html>")
            .create_async()
            .await;

        let page = quick_client()
            .get_page(&format!("{}/sodium/files", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(page.status, 403);
        assert!(!page.is_success());
        assert_eq!(page.body, "<html>challenge</html>");
    }

    #[tokio::test]
    async fn test_get_page_connection_failure_is_error() {
        // Nothing listens on the discard port
        let result = quick_client()
            .get_page("http://127.0.0.1:9/sodium/files")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_retrying_recovers_after_transient_failures() {
        let client = quick_client();
        let calls = Arc::new(AtomicUsize::new(0));

        let result = client
            .retrying("test://doc", || {
                let calls = calls.clone();
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(anyhow::anyhow!("connection reset"))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retrying_without_policy_tries_once() {
        let client = HttpClient::with_retry_policy(Client::new(), RetryPolicy::none());
        let calls = Arc::new(AtomicUsize::new(0));

        let result: Result<()> = client
            .retrying("test://doc", || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(anyhow::anyhow!("connection timeout"))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
