//! Resolution engine - drives one full run over a mods directory.
//!
//! A run:
//! - scans the directory for archives and parses every filename
//! - resolves each mod key to a catalog slug using the alias snapshot
//! - looks every distinct slug up on the catalog, repeating the whole batch
//!   while any lookup comes back blocked
//! - infers the platform and game version from the filenames

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use log::{debug, info, warn};
use serde::Serialize;

use crate::catalog::{CatalogFetcher, CatalogResult, classify, network_failure};
use crate::issue::ResolutionIssue;
use crate::package::{
    AliasTable, DEFAULT_ARCHIVE_PATTERN, InstalledPackage, OutlierTable, Overrides, Platform,
    find_archives,
};
use crate::runtime::Runtime;
use crate::version::{VersionCandidate, infer_version};

/// Delay between two passes when a pass had blocked lookups.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Knobs for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub retry_delay: Duration,
    /// Stop after this many passes even if lookups are still blocked. `None` never stops.
    pub max_passes: Option<usize>,
    /// Glob matched against filenames in the mods directory
    pub archive_pattern: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            retry_delay: DEFAULT_RETRY_DELAY,
            max_passes: None,
            archive_pattern: DEFAULT_ARCHIVE_PATTERN.to_string(),
        }
    }
}

/// Everything a run found out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub packages: Vec<InstalledPackage>,
    /// One result per distinct slug, in package order
    pub results: Vec<CatalogResult>,
    /// [`Platform::Unknown`] when no filename gave it away
    pub platform: Platform,
    pub game_version: Option<String>,
    /// Number of catalog passes it took to get an unblocked batch
    pub passes: usize,
    pub issues: Vec<ResolutionIssue>,
}

impl RunReport {
    /// Total file rows scraped across all results.
    pub fn attribute_count(&self) -> usize {
        self.results.iter().map(|r| r.attributes.len()).sum()
    }

    pub fn platform_resolved(&self) -> bool {
        self.platform.is_known()
    }

    pub fn version_resolved(&self) -> bool {
        self.game_version.is_some()
    }

    /// Replace the inferred platform with one the user supplied.
    pub fn override_platform(&mut self, platform: Platform) {
        self.platform = platform;
        if platform.is_known() {
            self.issues
                .retain(|issue| *issue != ResolutionIssue::PlatformUndetermined);
        }
    }

    /// Replace the inferred game version with one the user supplied.
    pub fn override_game_version(&mut self, version: &str) {
        self.game_version = Some(version.to_string());
        self.issues
            .retain(|issue| *issue != ResolutionIssue::VersionInferenceFailed);
    }

    /// Result for a package, looked up by its slug.
    pub fn result_for(&self, package: &InstalledPackage) -> Option<&CatalogResult> {
        self.results.iter().find(|r| r.slug == package.slug)
    }
}

pub struct ResolutionEngine<'a, R: Runtime, C: CatalogFetcher> {
    runtime: &'a R,
    catalog: &'a C,
    settings: EngineSettings,
}

impl<'a, R: Runtime, C: CatalogFetcher> ResolutionEngine<'a, R, C> {
    pub fn new(runtime: &'a R, catalog: &'a C, settings: EngineSettings) -> Self {
        Self {
            runtime,
            catalog,
            settings,
        }
    }

    /// Run the whole resolution over `dir`.
    #[tracing::instrument(skip(self, overrides, versions))]
    pub async fn run(
        &self,
        dir: &Path,
        overrides: &Overrides,
        versions: &[VersionCandidate],
    ) -> Result<RunReport> {
        let packages = self.scan(dir, &overrides.aliases)?;
        info!("Parsed {} mod archive(s) in {}", packages.len(), dir.display());

        let mut issues: Vec<ResolutionIssue> = packages
            .iter()
            .filter(|p| p.malformed)
            .map(|p| ResolutionIssue::MalformedFilename {
                archive: p.archive_filename.clone(),
            })
            .collect();

        let platform = infer_platform(&packages);
        if !platform.is_known() {
            issues.push(ResolutionIssue::PlatformUndetermined);
        }

        let slugs = unique_slugs(&packages);
        let (results, passes) = self.fetch_all(&slugs, &overrides.outliers).await;

        let filenames: Vec<&str> = packages
            .iter()
            .map(|p| p.archive_filename.as_str())
            .collect();
        let game_version = infer_version(&filenames, versions);
        if game_version.is_none() {
            issues.push(ResolutionIssue::VersionInferenceFailed);
        }

        Ok(RunReport {
            packages,
            results,
            platform,
            game_version,
            passes,
            issues,
        })
    }

    /// Parse every archive in `dir` into an [`InstalledPackage`].
    #[tracing::instrument(skip(self, aliases))]
    pub fn scan(&self, dir: &Path, aliases: &AliasTable) -> Result<Vec<InstalledPackage>> {
        let archives = find_archives(self.runtime, dir, &self.settings.archive_pattern)?;

        let packages = archives
            .iter()
            .filter_map(|path| match path.file_name().and_then(|name| name.to_str()) {
                Some(filename) => Some(filename),
                None => {
                    warn!("Skipping {}: the file name is not valid UTF-8", path.display());
                    None
                }
            })
            .map(|filename| {
                let package = InstalledPackage::new(filename, aliases);
                debug!(
                    "{} -> key {} -> slug {}",
                    package.archive_filename, package.inferred_key, package.slug
                );
                package
            })
            .collect();

        Ok(packages)
    }

    /// Look every slug up, repeating the whole batch until no lookup is blocked.
    ///
    /// Returns the results of the last pass and the number of passes made.
    #[tracing::instrument(skip(self, slugs, outliers))]
    pub async fn fetch_all(
        &self,
        slugs: &[String],
        outliers: &OutlierTable,
    ) -> (Vec<CatalogResult>, usize) {
        let mut passes = 0;

        loop {
            passes += 1;
            let results = self.fetch_pass(slugs, outliers).await;
            let blocked = results.iter().filter(|r| r.outcome.is_blocked()).count();

            if blocked == 0 {
                debug!("Pass {} completed without blocked lookups", passes);
                return (results, passes);
            }

            if self.settings.max_passes.is_some_and(|max| passes >= max) {
                warn!(
                    "{} of {} lookup(s) still blocked after {} pass(es), giving up",
                    blocked,
                    results.len(),
                    passes
                );
                return (results, passes);
            }

            warn!(
                "{} of {} lookup(s) were blocked (403), retrying the whole batch in {:?}...",
                blocked,
                results.len(),
                self.settings.retry_delay
            );
            tokio::time::sleep(self.settings.retry_delay).await;
        }
    }

    /// One sequential sweep over `slugs`.
    pub async fn fetch_pass(&self, slugs: &[String], outliers: &OutlierTable) -> Vec<CatalogResult> {
        let mut results = Vec::with_capacity(slugs.len());

        for slug in slugs {
            let url = self.catalog.page_url(slug);
            let result = match self.catalog.fetch(slug).await {
                Ok(page) => classify(slug, &url, page.status, &page.body, outliers),
                Err(e) => {
                    warn!("Request for {} failed: {:#}", url, e);
                    network_failure(slug, &url, &e)
                }
            };
            debug!("{}: {}", slug, result.outcome);
            results.push(result);
        }

        results
    }
}

/// The first archive that names a platform decides it for the whole batch.
pub fn infer_platform(packages: &[InstalledPackage]) -> Platform {
    packages
        .iter()
        .map(|p| p.inferred_platform)
        .find(Platform::is_known)
        .unwrap_or(Platform::Unknown)
}

/// Distinct slugs in first-seen order.
///
/// Keys are compared after slug resolution, so `Sodium` and `sodium`, or two
/// keys aliased to the same slug, share one lookup.
pub fn unique_slugs(packages: &[InstalledPackage]) -> Vec<String> {
    let mut slugs: Vec<String> = Vec::with_capacity(packages.len());
    for package in packages {
        if !slugs.contains(&package.slug) {
            slugs.push(package.slug.clone());
        }
    }
    slugs
}
