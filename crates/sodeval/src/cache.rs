//! Prediction reuse policy.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How a run treats predictions already on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Always invoke the predictor, overwriting saved predictions.
    #[default]
    Generate,
    /// Reuse saved predictions where a complete batch exists; regenerate a
    /// whole batch as soon as any of its samples has no file yet, since a
    /// batched predictor produces whole batches atomically.
    ReuseIfPresent,
}

/// Designated save location for one sample's prediction.
pub fn prediction_path(save_dir: &Path, name: &str) -> PathBuf {
    save_dir.join(format!("{name}.png"))
}

/// Whether the upcoming batch must go through the predictor. A pure
/// check: nothing on disk is created or modified.
pub fn must_regenerate(mode: RunMode, save_dir: &Path, names: &[String]) -> bool {
    match mode {
        RunMode::Generate => true,
        RunMode::ReuseIfPresent => names
            .iter()
            .any(|name| !prediction_path(save_dir, name).exists()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn generate_mode_never_reuses() {
        let dir = tempdir().unwrap();
        fs::write(prediction_path(dir.path(), "a"), b"png").unwrap();
        assert!(must_regenerate(
            RunMode::Generate,
            dir.path(),
            &["a".to_owned()]
        ));
    }

    #[test]
    fn one_missing_sample_regenerates_the_whole_batch() {
        let dir = tempdir().unwrap();
        fs::write(prediction_path(dir.path(), "a"), b"png").unwrap();
        let complete = ["a".to_owned()];
        let partial = ["a".to_owned(), "b".to_owned()];
        assert!(!must_regenerate(
            RunMode::ReuseIfPresent,
            dir.path(),
            &complete
        ));
        assert!(must_regenerate(
            RunMode::ReuseIfPresent,
            dir.path(),
            &partial
        ));
    }

    #[test]
    fn mode_names_are_kebab_case() {
        assert_eq!(
            serde_json::to_string(&RunMode::ReuseIfPresent).unwrap(),
            "\"reuse-if-present\""
        );
        let mode: RunMode = serde_json::from_str("\"generate\"").unwrap();
        assert_eq!(mode, RunMode::Generate);
    }
}
