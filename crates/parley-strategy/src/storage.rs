use crate::error::StorageError;

/// Post-session hook for persisting what the party learned.
///
/// Called once when the session finishes. Failures are logged by the caller
/// and never abort the session.
pub trait LearningStore: Send + Sync {
    fn save(&self, storage_dir: &str) -> Result<(), StorageError>;
}

/// Discards learning data.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLearningStore;

impl LearningStore for NoopLearningStore {
    fn save(&self, _storage_dir: &str) -> Result<(), StorageError> {
        Ok(())
    }
}
