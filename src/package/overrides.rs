//! Alias and outlier tables.
//!
//! Both are flat string-to-string JSON objects. A run loads them once and
//! passes them around as read-only snapshots; refreshing means loading a new
//! [`Overrides`] and replacing the old one between runs.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use crate::http::HttpClient;
use crate::runtime::Runtime;

macro_rules! override_table {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            entries: HashMap<String, String>,
        }

        impl $name {
            pub fn from_pairs<K, V, I>(pairs: I) -> Self
            where
                K: Into<String>,
                V: Into<String>,
                I: IntoIterator<Item = (K, V)>,
            {
                Self {
                    entries: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
                }
            }

            pub fn get(&self, key: &str) -> Option<&str> {
                self.entries.get(key).map(String::as_str)
            }

            pub fn contains(&self, key: &str) -> bool {
                self.entries.contains_key(key)
            }

            pub fn len(&self) -> usize {
                self.entries.len()
            }

            pub fn is_empty(&self) -> bool {
                self.entries.is_empty()
            }
        }
    };
}

override_table!(
    /// Generated slug -> the catalog's actual slug.
    AliasTable
);

override_table!(
    /// Slug -> reference URL for mods that have no catalog page.
    OutlierTable
);

impl AliasTable {
    /// Aliases known to be needed for popular mods.
    pub fn builtin() -> Self {
        Self::from_pairs([
            ("fabric", "fabric-api"),
            ("xaeros", "xaeros-minimap"),
            ("iris", "irisshaders"),
        ])
    }
}

impl OutlierTable {
    pub fn builtin() -> Self {
        Self::from_pairs([("wurst", "https://www.wurstclient.net/download/all/")])
    }
}

/// Where a table comes from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TableSource {
    /// The tables compiled into the binary
    #[default]
    Builtin,
    /// A JSON document served over HTTP(S)
    Url(String),
    /// A JSON file on disk
    File(PathBuf),
}

impl FromStr for TableSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            anyhow::bail!("Empty table source. Expected a URL, a file path, or 'builtin'.");
        }
        if s.eq_ignore_ascii_case("builtin") {
            Ok(TableSource::Builtin)
        } else if s.starts_with("http://") || s.starts_with("https://") {
            Ok(TableSource::Url(s.to_string()))
        } else {
            Ok(TableSource::File(PathBuf::from(s)))
        }
    }
}

impl TableSource {
    /// Returns `None` for [`TableSource::Builtin`]; the caller picks the built-in table.
    async fn fetch<R: Runtime, T: DeserializeOwned>(
        &self,
        runtime: &R,
        http: &HttpClient,
    ) -> Result<Option<T>> {
        match self {
            TableSource::Builtin => Ok(None),
            TableSource::Url(url) => {
                let table = http
                    .get_json(url)
                    .await
                    .with_context(|| format!("Failed to fetch table from {}", url))?;
                Ok(Some(table))
            }
            TableSource::File(path) => {
                let content = runtime.read_to_string(path)?;
                let table = serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse table in {}", path.display()))?;
                Ok(Some(table))
            }
        }
    }
}

/// Snapshot of both override tables for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub aliases: AliasTable,
    pub outliers: OutlierTable,
}

impl Overrides {
    pub fn builtin() -> Self {
        Self {
            aliases: AliasTable::builtin(),
            outliers: OutlierTable::builtin(),
        }
    }

    #[tracing::instrument(skip(runtime, http))]
    pub async fn load<R: Runtime>(
        runtime: &R,
        http: &HttpClient,
        aliases: &TableSource,
        outliers: &TableSource,
    ) -> Result<Self> {
        let aliases = aliases
            .fetch(runtime, http)
            .await?
            .unwrap_or_else(AliasTable::builtin);
        let outliers = outliers
            .fetch(runtime, http)
            .await?
            .unwrap_or_else(OutlierTable::builtin);

        info!(
            "Loaded {} alias(es) and {} outlier(s)",
            aliases.len(),
            outliers.len()
        );
        debug!("Aliases: {:?}", aliases);

        Ok(Self { aliases, outliers })
    }
}
