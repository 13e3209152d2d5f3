//! Game versions: the reference catalog and inference from filenames.

mod matcher;

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::http::HttpClient;

pub use matcher::infer_version;

/// Mojang's launcher manifest, newest versions first.
pub const DEFAULT_VERSION_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseType {
    Release,
    /// Snapshots, betas, alphas and anything else the manifest invents
    NonRelease,
}

impl From<&str> for ReleaseType {
    fn from(kind: &str) -> Self {
        if kind == "release" {
            ReleaseType::Release
        } else {
            ReleaseType::NonRelease
        }
    }
}

/// A game version from the reference catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionCandidate {
    pub id: String,
    pub release_type: ReleaseType,
}

impl VersionCandidate {
    pub fn release(id: &str) -> Self {
        Self {
            id: id.to_string(),
            release_type: ReleaseType::Release,
        }
    }

    pub fn is_release(&self) -> bool {
        self.release_type == ReleaseType::Release
    }
}

/// Manifest response types.
mod api {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone, PartialEq)]
    pub struct Latest {
        pub release: String,
        pub snapshot: Option<String>,
    }

    #[derive(Deserialize, Debug, Clone, PartialEq)]
    pub struct Entry {
        pub id: String,
        #[serde(rename = "type")]
        pub kind: String,
    }
}

/// The reference version catalog.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct VersionManifest {
    latest: api::Latest,
    versions: Vec<api::Entry>,
}

impl VersionManifest {
    /// Id of the newest release.
    pub fn latest_release(&self) -> &str {
        &self.latest.release
    }

    /// Every version, in manifest order.
    pub fn candidates(&self) -> Vec<VersionCandidate> {
        self.versions
            .iter()
            .map(|entry| VersionCandidate {
                id: entry.id.clone(),
                release_type: entry.kind.as_str().into(),
            })
            .collect()
    }

    /// Releases only, in manifest order.
    pub fn releases(&self) -> Vec<VersionCandidate> {
        self.candidates()
            .into_iter()
            .filter(VersionCandidate::is_release)
            .collect()
    }
}

/// Download and decode the version manifest.
#[tracing::instrument(skip(http))]
pub async fn fetch_manifest(http: &HttpClient, url: &str) -> Result<VersionManifest> {
    let manifest: VersionManifest = http
        .get_json(url)
        .await
        .with_context(|| format!("Failed to fetch version manifest from {}", url))?;
    debug!(
        "Version manifest lists {} version(s), latest release {}",
        manifest.versions.len(),
        manifest.latest_release()
    );
    Ok(manifest)
}
