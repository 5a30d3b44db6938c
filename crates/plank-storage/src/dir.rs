//! Locating and initializing the `.plank` data directory.
//!
//! A board lives in a `.plank/` directory at or above the working
//! directory, holding the snapshot files and `config.toml`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::PlankConfig;
use crate::error::Result;

/// Name of the data directory.
pub const PLANK_DIR: &str = ".plank";

/// Find the `.plank` directory by walking up from `start`.
pub fn find_plank_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let candidate = current.join(PLANK_DIR);
        if candidate.is_dir() {
            debug!("Found plank directory: {}", candidate.display());
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

/// Create `<root>/.plank` with a default `config.toml`.
///
/// Idempotent: an existing directory is kept and an existing config file
/// is not overwritten.
pub fn init_plank_dir(root: &Path) -> Result<PathBuf> {
    let dir = root.join(PLANK_DIR);
    std::fs::create_dir_all(&dir)?;
    if !dir.join("config.toml").exists() {
        PlankConfig::write_default(&dir)?;
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_walks_up_to_the_data_directory() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join(".plank")).unwrap();
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_plank_dir(&nested).unwrap();
        assert_eq!(found, root.join(".plank"));
    }

    #[test]
    fn test_find_returns_none_outside_any_board() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        assert!(find_plank_dir(temp_dir.path()).is_none());
    }

    #[test]
    fn test_init_creates_directory_and_config() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dir = init_plank_dir(temp_dir.path()).unwrap();
        assert!(dir.is_dir());
        assert!(dir.join("config.toml").exists());
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dir = init_plank_dir(temp_dir.path()).unwrap();
        std::fs::write(dir.join("config.toml"), "pretty_json = false\n").unwrap();

        init_plank_dir(temp_dir.path()).unwrap();
        let config = PlankConfig::load_or_default(&dir).unwrap();
        assert!(!config.pretty_json);
    }
}
