use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

use crate::{
    catalog::{CatalogFetcher, CurseForgeCatalog, DEFAULT_CATALOG_URL},
    engine::{DEFAULT_RETRY_DELAY, EngineSettings},
    http::HttpClient,
    package::{DEFAULT_ARCHIVE_PATTERN, Platform, TableSource},
    runtime::Runtime,
    version::DEFAULT_VERSION_MANIFEST_URL,
};

use super::paths::resolve_mods_dir;
use super::services::{build_catalog, build_http_client};

/// Per-request transport timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything a command can be told from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// `None` means the launcher's default location
    pub mods_dir: Option<PathBuf>,
    pub catalog_url: String,
    pub aliases: TableSource,
    pub outliers: TableSource,
    pub versions_url: String,
    pub retry_delay: Duration,
    pub timeout: Duration,
    pub max_passes: Option<usize>,
    pub archive_pattern: String,
    pub platform: Option<Platform>,
    pub game_version: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mods_dir: None,
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            aliases: TableSource::Builtin,
            outliers: TableSource::Builtin,
            versions_url: DEFAULT_VERSION_MANIFEST_URL.to_string(),
            retry_delay: DEFAULT_RETRY_DELAY,
            timeout: DEFAULT_TIMEOUT,
            max_passes: None,
            archive_pattern: DEFAULT_ARCHIVE_PATTERN.to_string(),
            platform: None,
            game_version: None,
        }
    }
}

impl Settings {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            retry_delay: self.retry_delay,
            max_passes: self.max_passes,
            archive_pattern: self.archive_pattern.clone(),
        }
    }
}

pub struct Config<R: Runtime, C: CatalogFetcher> {
    pub runtime: R,
    pub http: HttpClient,
    pub catalog: C,
    pub settings: Settings,
}

impl<R: Runtime> Config<R, CurseForgeCatalog> {
    pub fn new(runtime: R, settings: Settings) -> Result<Self> {
        let http = build_http_client(settings.timeout)?;
        let catalog = build_catalog(http.clone(), &settings.catalog_url);

        Ok(Self {
            runtime,
            http,
            catalog,
            settings,
        })
    }
}

impl<R: Runtime, C: CatalogFetcher> Config<R, C> {
    pub fn mods_dir(&self) -> Result<PathBuf> {
        resolve_mods_dir(&self.runtime, self.settings.mods_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.retry_delay, Duration::from_secs(3));
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.max_passes, None);
        assert_eq!(settings.archive_pattern, "*.jar");
        assert_eq!(settings.aliases, TableSource::Builtin);
        assert_eq!(settings.catalog_url, DEFAULT_CATALOG_URL);
    }

    #[test]
    fn test_engine_settings_follow_settings() {
        let settings = Settings {
            retry_delay: Duration::from_millis(10),
            max_passes: Some(4),
            archive_pattern: "*.zip".to_string(),
            ..Settings::default()
        };
        let engine = settings.engine_settings();
        assert_eq!(engine.retry_delay, Duration::from_millis(10));
        assert_eq!(engine.max_passes, Some(4));
        assert_eq!(engine.archive_pattern, "*.zip");
    }

    #[test]
    fn test_config_new_uses_catalog_url() {
        let settings = Settings {
            catalog_url: "http://localhost:8080/mods/".to_string(),
            mods_dir: Some(PathBuf::from("/srv/mods")),
            ..Settings::default()
        };
        let config = Config::new(MockRuntime::new(), settings).unwrap();

        assert_eq!(config.catalog.base_url(), "http://localhost:8080/mods");
        assert_eq!(config.mods_dir().unwrap(), PathBuf::from("/srv/mods"));
    }
}
