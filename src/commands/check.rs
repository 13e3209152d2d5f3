use anyhow::Result;
use log::{debug, info, warn};

use crate::{
    catalog::{CatalogFetcher, FileColumn},
    engine::{ResolutionEngine, RunReport},
    package::Overrides,
    runtime::Runtime,
    version::{VersionCandidate, fetch_manifest},
};

use super::config::{Config, Settings};

/// Look every installed mod up on the catalog and print what was found
#[tracing::instrument(skip(runtime, settings))]
pub async fn check<R: Runtime>(runtime: R, settings: Settings, json: bool) -> Result<()> {
    let config = Config::new(runtime, settings)?;
    let report = run_check(&config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn run_check<R: Runtime, C: CatalogFetcher>(config: &Config<R, C>) -> Result<RunReport> {
    let settings = &config.settings;
    let dir = config.mods_dir()?;

    let overrides = Overrides::load(
        &config.runtime,
        &config.http,
        &settings.aliases,
        &settings.outliers,
    )
    .await?;
    let versions = load_versions(config).await;

    let engine = ResolutionEngine::new(
        &config.runtime,
        &config.catalog,
        settings.engine_settings(),
    );
    let mut report = engine.run(&dir, &overrides, &versions).await?;

    if let Some(platform) = settings.platform {
        info!("Using platform {} from the command line", platform);
        report.override_platform(platform);
    }
    if let Some(version) = &settings.game_version {
        info!("Using game version {} from the command line", version);
        report.override_game_version(version);
    }

    Ok(report)
}

/// Release candidates from the version manifest.
///
/// A manifest that cannot be fetched only costs the version inference, so the
/// failure is logged and the run goes on without candidates.
async fn load_versions<R: Runtime, C: CatalogFetcher>(
    config: &Config<R, C>,
) -> Vec<VersionCandidate> {
    let settings = &config.settings;
    if settings.game_version.is_some() {
        debug!("Game version given, skipping the version manifest");
        return Vec::new();
    }

    match fetch_manifest(&config.http, &settings.versions_url).await {
        Ok(manifest) => manifest.releases(),
        Err(e) => {
            warn!("{:#}", e);
            Vec::new()
        }
    }
}

/// Plain-text rendering of a finished run.
///
/// Empty records (table header rows) are counted in the summary but not listed.
pub fn render_report(report: &RunReport) -> String {
    if report.packages.is_empty() {
        return "No mods found.\n".to_string();
    }

    let mut out = String::new();
    for result in &report.results {
        out.push_str(&format!("{:<32} | {}\n", result.slug, result.url));
        let status = result
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "---".to_string());
        out.push_str(&format!("  {}: {}\n", status, result.outcome));

        for row in result.attributes.iter().filter(|row| row.populated() > 0) {
            out.push_str(&format!(
                "    {} [{}] {}\n",
                row.get(FileColumn::Name).unwrap_or("?"),
                row.get(FileColumn::GameVersion).unwrap_or("?"),
                row.get(FileColumn::Uploaded).unwrap_or_default(),
            ));
        }
    }

    out.push('\n');
    out.push_str(&format!("Platform: {}\n", report.platform));
    out.push_str(&format!(
        "Game version: {}\n",
        report.game_version.as_deref().unwrap_or("unknown")
    ));
    out.push_str(&format!(
        "Checked {} mod(s) from {} archive(s) in {} pass(es), {} file row(s) returned\n",
        report.results.len(),
        report.packages.len(),
        report.passes,
        report.attribute_count()
    ));

    for issue in &report.issues {
        out.push_str(&format!("Warning: {}\n", issue));
    }

    out
}
