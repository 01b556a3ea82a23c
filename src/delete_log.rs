//! Point-in-time mapping of quarantined names to their original paths.

use crate::errors::{CoreError, Result};
use crate::fs::FileSystem;
use crate::helpers::to_json_pretty;
use crate::models::QuarantineEntry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// In-memory form of the delete log document.
pub type LogSnapshot = BTreeMap<String, PathBuf>;

/// The delete log document (`{"name": "/original/path", ...}`).
#[derive(Debug)]
pub struct DeleteLog<F> {
    path: PathBuf,
    fs: Arc<F>,
}

impl<F: FileSystem> DeleteLog<F> {
    pub fn new(path: impl Into<PathBuf>, fs: Arc<F>) -> Self {
        Self { path: path.into(), fs }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current snapshot; a missing or blank file is an empty log.
    pub fn load(&self) -> Result<LogSnapshot> {
        if !self.fs.exists(&self.path) {
            return Ok(LogSnapshot::new());
        }
        let raw = self.fs.read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(LogSnapshot::new());
        }
        serde_json::from_str(&raw).map_err(|err| CoreError::Serialization(self.path.clone(), err))
    }

    /// Replaces the document with `snapshot`.
    pub fn save(&self, snapshot: &LogSnapshot) -> Result<()> {
        let bytes = to_json_pretty(snapshot, &self.path)?;
        self.fs.write_atomic(&self.path, &bytes)?;
        tracing::debug!(path = %self.path.display(), entries = snapshot.len(), "delete log written");
        Ok(())
    }

    /// All entries ordered by name.
    pub fn entries(&self) -> Result<Vec<QuarantineEntry>> {
        Ok(self
            .load()?
            .into_iter()
            .map(|(name, original_path)| QuarantineEntry { name, original_path })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::RealFileSystem;

    fn log_in(dir: &Path) -> DeleteLog<RealFileSystem> {
        DeleteLog::new(dir.join("log.json"), Arc::new(RealFileSystem))
    }

    #[test]
    fn missing_and_blank_documents_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(dir.path());
        assert!(log.load().unwrap().is_empty());

        std::fs::write(log.path(), "  \n").unwrap();
        assert!(log.load().unwrap().is_empty());
    }

    #[test]
    fn reads_documents_written_by_older_versions() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(dir.path());
        std::fs::write(
            log.path(),
            "{\n    \"report.txt\": \"/home/u/report.txt\"\n}",
        )
        .unwrap();

        let snapshot = log.load().unwrap();
        assert_eq!(snapshot.get("report.txt"), Some(&PathBuf::from("/home/u/report.txt")));
        assert!(!snapshot.contains_key("other.txt"));
    }

    #[test]
    fn save_then_entries_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(dir.path());
        let mut snapshot = LogSnapshot::new();
        snapshot.insert("b.txt".into(), PathBuf::from("/x/b.txt"));
        snapshot.insert("a.txt".into(), PathBuf::from("/x/a.txt"));
        log.save(&snapshot).unwrap();

        let names: Vec<_> = log.entries().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn malformed_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = log_in(dir.path());
        std::fs::write(log.path(), "[1, 2").unwrap();
        assert!(matches!(log.load(), Err(CoreError::Serialization(..))));
    }
}
