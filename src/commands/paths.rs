use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use crate::runtime::Runtime;

/// Get the mods directory to scan, falling back to the launcher's default location
#[tracing::instrument(skip(runtime, mods_dir))]
pub fn resolve_mods_dir<R: Runtime>(runtime: &R, mods_dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match mods_dir {
        Some(path) => path,
        None => default_mods_dir(runtime)?,
    };

    info!("Using mods directory: {}", dir.display());
    Ok(dir)
}

/// Get the launcher's default mods directory for this platform
#[cfg(target_os = "windows")]
#[tracing::instrument(skip(runtime))]
pub fn default_mods_dir<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    // %APPDATA%
    let roaming = runtime
        .config_dir()
        .context("Could not find the roaming application data directory")?;
    Ok(roaming.join(".minecraft").join("mods"))
}

/// Get the launcher's default mods directory for this platform
#[cfg(target_os = "macos")]
#[tracing::instrument(skip(runtime))]
pub fn default_mods_dir<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    // ~/Library/Application Support
    let support = runtime
        .config_dir()
        .context("Could not find the application support directory")?;
    Ok(support.join("minecraft").join("mods"))
}

/// Get the launcher's default mods directory for this platform
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
#[tracing::instrument(skip(runtime))]
pub fn default_mods_dir<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    let home_dir = runtime
        .home_dir()
        .context("Could not find home directory")?;
    Ok(home_dir.join(".minecraft").join("mods"))
}
