//! Installed mod archives and their catalog identity.
//!
//! - `discovery` - Finding archives in the mods directory
//! - `filename` - Turning an archive filename into a mod key and platform hint
//! - `slug` - Turning a mod key into a catalog slug
//! - `overrides` - Alias and outlier tables

mod discovery;
mod filename;
mod overrides;
mod slug;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use discovery::{DEFAULT_ARCHIVE_PATTERN, find_archives};
pub use filename::{ParsedFilename, parse_filename};
pub use overrides::{AliasTable, OutlierTable, Overrides, TableSource};
pub use slug::{camel_case_slug, resolve_slug};

/// Mod loader an archive was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Fabric,
    Forge,
    #[default]
    Unknown,
}

impl Platform {
    pub fn is_known(&self) -> bool {
        *self != Platform::Unknown
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Fabric => write!(f, "fabric"),
            Platform::Forge => write!(f, "forge"),
            Platform::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fabric" => Ok(Platform::Fabric),
            "forge" => Ok(Platform::Forge),
            _ => anyhow::bail!("Unknown mod platform: {}. Expected fabric or forge.", s),
        }
    }
}

/// An archive found in the mods directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstalledPackage {
    pub archive_filename: String,
    pub inferred_key: String,
    pub inferred_platform: Platform,
    /// Catalog slug, resolved against the alias snapshot of the current run
    pub slug: String,
    /// The filename started with a delimiter and the whole stem was used as key
    pub malformed: bool,
}

impl InstalledPackage {
    pub fn new(archive_filename: &str, aliases: &AliasTable) -> Self {
        let parsed = parse_filename(archive_filename);
        let slug = resolve_slug(&parsed.key, aliases);
        Self {
            archive_filename: archive_filename.to_string(),
            inferred_key: parsed.key,
            inferred_platform: parsed.platform,
            slug,
            malformed: parsed.malformed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse() {
        assert_eq!("fabric".parse::<Platform>().unwrap(), Platform::Fabric);
        assert_eq!("Forge".parse::<Platform>().unwrap(), Platform::Forge);
        assert_eq!(" FABRIC ".parse::<Platform>().unwrap(), Platform::Fabric);
        assert!("quilt".parse::<Platform>().is_err());
        assert!("unknown".parse::<Platform>().is_err());
    }

    #[test]
    fn test_platform_display() {
        assert_eq!(Platform::Fabric.to_string(), "fabric");
        assert_eq!(Platform::Forge.to_string(), "forge");
        assert_eq!(Platform::Unknown.to_string(), "unknown");
        assert!(!Platform::Unknown.is_known());
        assert!(Platform::Forge.is_known());
    }

    #[test]
    fn test_installed_package_mouse_tweaks() {
        let package = InstalledPackage::new("MouseTweaks-1.19-fabric.jar", &AliasTable::default());
        assert_eq!(package.inferred_key, "MouseTweaks");
        assert_eq!(package.slug, "mouse-tweaks");
        assert_eq!(package.inferred_platform, Platform::Fabric);
        assert!(!package.malformed);
    }

    #[test]
    fn test_installed_package_xaeros_alias() {
        let aliases = AliasTable::from_pairs([("xaeros", "xaeros-minimap")]);
        let package = InstalledPackage::new("Xaeros_1.19.jar", &aliases);
        assert_eq!(package.inferred_key, "Xaeros");
        assert_eq!(package.slug, "xaeros-minimap");
        assert_eq!(package.inferred_platform, Platform::Unknown);
    }
}
