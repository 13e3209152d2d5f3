use std::path::Path;

use super::Platform;

/// Delimiters tried in order; the first one present in the filename wins.
const KEY_DELIMITERS: [char; 2] = ['-', '_'];

/// What can be learned from an archive filename alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilename {
    /// Left-hand segment of the filename, case preserved
    pub key: String,
    pub platform: Platform,
    /// The filename starts with its delimiter; `key` fell back to the whole stem
    pub malformed: bool,
}

/// Split an archive filename into a mod key and a platform hint.
///
/// The key is everything before the first `-`, or the first `_` when there is
/// no dash at all. Without either delimiter the whole stem is the key.
pub fn parse_filename(filename: &str) -> ParsedFilename {
    let platform = platform_hint(filename);
    let stem = file_stem(filename);

    let split = KEY_DELIMITERS
        .iter()
        .find_map(|delimiter| filename.split_once(*delimiter));

    match split {
        Some(("", _)) => ParsedFilename {
            key: stem.to_string(),
            platform,
            malformed: true,
        },
        Some((left, _)) => ParsedFilename {
            key: left.to_string(),
            platform,
            malformed: false,
        },
        None => ParsedFilename {
            key: stem.to_string(),
            platform,
            malformed: false,
        },
    }
}

/// `fabric` wins over `forge` when both appear.
fn platform_hint(filename: &str) -> Platform {
    let lower = filename.to_lowercase();
    if lower.contains("fabric") {
        Platform::Fabric
    } else if lower.contains("forge") {
        Platform::Forge
    } else {
        Platform::Unknown
    }
}

fn file_stem(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
}
