//! Non-fatal conditions a run reports alongside its results.

use serde::Serialize;
use std::fmt;

/// Something the resolver had to guess at or could not work out.
///
/// None of these stop a run; they are handed to the caller, which decides
/// whether to ask the user, fall back, or ignore them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ResolutionIssue {
    /// The archive name starts with a delimiter; the whole stem was used as key
    MalformedFilename { archive: String },
    /// No archive name mentions fabric or forge
    PlatformUndetermined,
    /// No release id from the version catalog appears in any archive name
    VersionInferenceFailed,
}

impl fmt::Display for ResolutionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionIssue::MalformedFilename { archive } => {
                write!(
                    f,
                    "Malformed filename: {}. The whole name was used as the mod key.",
                    archive
                )
            }
            ResolutionIssue::PlatformUndetermined => {
                write!(
                    f,
                    "Unable to determine the mod platform. Pass --platform fabric or --platform forge."
                )
            }
            ResolutionIssue::VersionInferenceFailed => {
                write!(
                    f,
                    "Unable to determine the Minecraft version. Pass --game-version to set it."
                )
            }
        }
    }
}

impl std::error::Error for ResolutionIssue {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = ResolutionIssue::MalformedFilename {
            archive: "-broken.jar".to_string(),
        };
        assert!(issue.to_string().contains("-broken.jar"));
        assert!(ResolutionIssue::PlatformUndetermined
            .to_string()
            .contains("--platform"));
        assert!(ResolutionIssue::VersionInferenceFailed
            .to_string()
            .contains("--game-version"));
    }

    #[test]
    fn test_issue_serializes_with_tag() {
        let json = serde_json::to_value(ResolutionIssue::VersionInferenceFailed).unwrap();
        assert_eq!(json["issue"], "version_inference_failed");
    }
}
