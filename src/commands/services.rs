//! Service factory for building command dependencies.
//!
//! Construction of the HTTP client and the catalog client lives here so that
//! [`super::config::Config`] only has to decide which settings to pass in.

use std::time::Duration;

use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    Client,
    header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue},
};

use crate::{catalog::CurseForgeCatalog, http::HttpClient};

/// The catalog rejects obvious bots, so requests look like a desktop browser.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
pub const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Build an HTTP client with a browser-like request signature
pub fn build_http_client(timeout: Duration) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
    );

    let client = Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")?;

    debug!("HTTP client configured with a {:?} timeout", timeout);
    Ok(HttpClient::new(client))
}

/// Build the catalog client on top of a shared HTTP client
pub fn build_catalog(http_client: HttpClient, base_url: &str) -> CurseForgeCatalog {
    CurseForgeCatalog::with_base_url(http_client, base_url)
}
