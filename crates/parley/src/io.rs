use std::fs;
use std::path::{Path, PathBuf};

use parley_models::LinearAdditiveProfile;
use parley_strategy::{LearningStore, ProfileLoader, SessionError, StorageError};
use tracing::debug;

/// Contents written by [`FileLearningStore`]. No learning across sessions yet.
pub const LEARNING_DATA_PLACEHOLDER: &str = "Data for learning (see README.md)";

/// Loads JSON profiles from disk. Relative references resolve against `base_dir`.
#[derive(Debug, Clone, Default)]
pub struct FileProfileLoader {
    base_dir: Option<PathBuf>,
}

impl FileProfileLoader {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    fn resolve(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ProfileLoader for FileProfileLoader {
    fn load(&self, reference: &str) -> Result<LinearAdditiveProfile, SessionError> {
        let path = self.resolve(reference);
        debug!(path = %path.display(), "Loading profile");
        let json = fs::read_to_string(&path).map_err(|e| {
            SessionError::Profile(format!("Failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&json).map_err(|e| {
            SessionError::Profile(format!("Failed to parse {}: {e}", path.display()))
        })
    }
}

/// Writes the learning-data file into the session's storage directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLearningStore;

impl LearningStore for FileLearningStore {
    fn save(&self, storage_dir: &str) -> Result<(), StorageError> {
        fs::create_dir_all(storage_dir)?;
        let path = Path::new(storage_dir).join("data.md");
        fs::write(&path, LEARNING_DATA_PLACEHOLDER)?;
        debug!(path = %path.display(), "Learning data saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_reference_uses_base_dir() {
        let loader = FileProfileLoader::new(Some(PathBuf::from("/profiles")));
        assert_eq!(loader.resolve("a.json"), PathBuf::from("/profiles/a.json"));
        assert_eq!(loader.resolve("/abs/b.json"), PathBuf::from("/abs/b.json"));
        assert_eq!(
            FileProfileLoader::default().resolve("c.json"),
            PathBuf::from("c.json")
        );
    }

    #[test]
    fn missing_profile_is_profile_error() {
        let loader = FileProfileLoader::default();
        let result = loader.load("/definitely/not/here.json");
        assert!(matches!(result, Err(SessionError::Profile(_))));
    }

    #[test]
    fn learning_data_written_to_storage_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = dir.path().join("droid");
        FileLearningStore
            .save(storage.to_str().unwrap())
            .unwrap();

        let written = fs::read_to_string(storage.join("data.md")).unwrap();
        assert_eq!(written, LEARNING_DATA_PLACEHOLDER);
    }
}
