use super::VersionCandidate;

/// Guess the game version from archive filenames.
///
/// Candidates are tried in the order given (newest first for the launcher
/// manifest). The first release id that appears verbatim in any filename wins.
/// Returns `None` when nothing matches; that is an expected outcome, not an error.
pub fn infer_version<S: AsRef<str>>(
    filenames: &[S],
    candidates: &[VersionCandidate],
) -> Option<String> {
    candidates
        .iter()
        .filter(|candidate| candidate.is_release() && !candidate.id.is_empty())
        .find(|candidate| {
            filenames
                .iter()
                .any(|filename| filename.as_ref().contains(candidate.id.as_str()))
        })
        .map(|candidate| candidate.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::ReleaseType;

    fn releases(ids: &[&str]) -> Vec<VersionCandidate> {
        ids.iter().map(|id| VersionCandidate::release(id)).collect()
    }

    #[test]
    fn test_first_match_wins_newest_first() {
        let filenames = ["Sodium-1.19.2-fabric.jar"];
        let candidates = releases(&["1.20", "1.19.2", "1.19"]);
        assert_eq!(infer_version(&filenames, &candidates), Some("1.19.2".to_string()));
    }

    #[test]
    fn test_order_of_candidates_decides() {
        // "1.19" is also a substring, but it is listed after "1.19.2"
        let filenames = ["MouseTweaks-1.19-fabric.jar", "Sodium-1.19.2-fabric.jar"];
        assert_eq!(
            infer_version(&filenames, &releases(&["1.19.2", "1.19"])),
            Some("1.19.2".to_string())
        );
        assert_eq!(
            infer_version(&filenames, &releases(&["1.19", "1.19.2"])),
            Some("1.19".to_string())
        );
    }

    #[test]
    fn test_no_match() {
        let filenames = vec!["sodium.jar".to_string(), "Xaeros_Minimap.jar".to_string()];
        assert_eq!(infer_version(&filenames, &releases(&["1.20", "1.19.2"])), None);
        assert_eq!(infer_version::<&str>(&[], &releases(&["1.20"])), None);
        assert_eq!(infer_version(&["a-1.19.jar"], &[]), None);
    }

    #[test]
    fn test_non_releases_are_skipped() {
        let candidates = vec![
            VersionCandidate {
                id: "22w42a".to_string(),
                release_type: ReleaseType::NonRelease,
            },
            VersionCandidate::release("1.19.2"),
        ];
        let filenames = ["fabric-api-0.64.0+22w42a.jar", "iris-mc1.19.2-1.4.5.jar"];
        assert_eq!(infer_version(&filenames, &candidates), Some("1.19.2".to_string()));
    }
}
