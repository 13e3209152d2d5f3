use anyhow::Result;
use log::debug;
use serde::Serialize;

use crate::{
    catalog::CatalogFetcher,
    engine::{ResolutionEngine, infer_platform},
    package::{InstalledPackage, Overrides, Platform},
    runtime::Runtime,
};

use super::config::{Config, Settings};

/// What a scan found, without asking the catalog anything.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub packages: Vec<InstalledPackage>,
    pub platform: Platform,
}

/// List installed archives with the key, slug and platform derived from each name
#[tracing::instrument(skip(runtime, settings))]
pub async fn scan<R: Runtime>(runtime: R, settings: Settings, json: bool) -> Result<()> {
    let config = Config::new(runtime, settings)?;
    let report = run_scan(&config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_scan(&report));
    }
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn run_scan<R: Runtime, C: CatalogFetcher>(config: &Config<R, C>) -> Result<ScanReport> {
    let settings = &config.settings;
    let dir = config.mods_dir()?;

    // Only the alias table matters offline, but both come from the same loader
    let overrides = Overrides::load(
        &config.runtime,
        &config.http,
        &settings.aliases,
        &settings.outliers,
    )
    .await?;

    let engine = ResolutionEngine::new(
        &config.runtime,
        &config.catalog,
        settings.engine_settings(),
    );
    let packages = engine.scan(&dir, &overrides.aliases)?;
    let platform = settings
        .platform
        .unwrap_or_else(|| infer_platform(&packages));
    debug!("Scanned {} archive(s), platform {}", packages.len(), platform);

    Ok(ScanReport { packages, platform })
}

pub fn render_scan(report: &ScanReport) -> String {
    if report.packages.is_empty() {
        return "No mods found.\n".to_string();
    }

    let mut out = String::new();
    for package in &report.packages {
        out.push_str(&format!(
            "{:<48} {:<24} -> {}",
            package.archive_filename, package.inferred_key, package.slug
        ));
        if package.inferred_platform.is_known() {
            out.push_str(&format!(" [{}]", package.inferred_platform));
        }
        if package.malformed {
            out.push_str(" (malformed name)");
        }
        out.push('\n');
    }

    out.push_str(&format!("\nPlatform: {}\n", report.platform));
    out
}
