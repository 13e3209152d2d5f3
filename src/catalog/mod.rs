//! Catalog access: fetching a mod's "files" page and classifying the answer.

mod classify;

use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use crate::http::{HttpClient, PageResponse};

pub use classify::{
    CatalogResult, FileColumn, FileRow, Outcome, classify, network_failure, parse_file_rows,
};

/// CurseForge's Minecraft mod listing.
pub const DEFAULT_CATALOG_URL: &str = "https://www.curseforge.com/minecraft/mc-mods";

/// Fetches catalog pages.
///
/// Implementations return whatever the catalog answered, including 403s and
/// 404s. Only failures below HTTP are errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// URL of the files page for `slug`.
    fn page_url(&self, slug: &str) -> String;

    /// Fetch the files page for `slug`.
    async fn fetch(&self, slug: &str) -> Result<PageResponse>;
}

/// [`CatalogFetcher`] over HTTP.
pub struct CurseForgeCatalog {
    http_client: HttpClient,
    base_url: String,
}

impl CurseForgeCatalog {
    /// Create a catalog client against [`DEFAULT_CATALOG_URL`].
    pub fn new(http_client: HttpClient) -> Self {
        Self::with_base_url(http_client, DEFAULT_CATALOG_URL)
    }

    pub fn with_base_url(http_client: HttpClient, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CatalogFetcher for CurseForgeCatalog {
    fn page_url(&self, slug: &str) -> String {
        format!("{}/{}/files", self.base_url, slug)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch(&self, slug: &str) -> Result<PageResponse> {
        let url = self.page_url(slug);
        debug!("Fetching catalog page for {} from {}", slug, url);
        self.http_client.get_page(&url).await
    }
}
