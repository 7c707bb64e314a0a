//! Package list loading and validation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read package list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid package list {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Package lists loaded once at startup and immutable afterwards.
///
/// Both keys are required; a document missing either of them is rejected
/// rather than treated as an empty list. Package names are opaque strings,
/// existence checks are left to pacman.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageConfig {
    pub pacman: Vec<String>,
    pub aur: Vec<String>,
}

impl PackageConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn total(&self) -> usize {
        self.pacman.len() + self.aur.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("packages.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_valid_config() {
        let (_dir, path) = write_config(r#"{"pacman": ["git", "htop"], "aur": ["paru-bin"]}"#);
        let config = PackageConfig::load(&path).unwrap();

        assert_eq!(config.pacman, vec!["git", "htop"]);
        assert_eq!(config.aur, vec!["paru-bin"]);
        assert_eq!(config.total(), 3);
    }

    #[test]
    fn missing_aur_key_is_an_error() {
        let (_dir, path) = write_config(r#"{"pacman": ["git"]}"#);
        assert!(matches!(
            PackageConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn wrong_shape_is_an_error() {
        let (_dir, path) = write_config(r#"{"pacman": "git", "aur": []}"#);
        assert!(matches!(
            PackageConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let (_dir, path) = write_config("not json");
        assert!(matches!(
            PackageConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(
            PackageConfig::load(&path),
            Err(ConfigError::Read { .. })
        ));
    }
}
