//! Append-only record of completed restores.

use crate::errors::{CoreError, Result};
use crate::fs::FileSystem;
use crate::helpers::to_json_pretty;
use crate::models::HistoryEntry;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The restore ledger document, a JSON array in append order.
#[derive(Debug)]
pub struct RestoreLedger<F> {
    path: PathBuf,
    fs: Arc<F>,
}

impl<F: FileSystem> RestoreLedger<F> {
    pub fn new(path: impl Into<PathBuf>, fs: Arc<F>) -> Self {
        Self { path: path.into(), fs }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record and persists the whole document before returning.
    ///
    /// Callers serialize appends; concurrent appenders would drop records.
    pub fn append(&self, entry: HistoryEntry) -> Result<()> {
        self.append_to(self.read_all()?, entry)
    }

    /// Appends to entries the caller already read with [`Self::read_all`].
    ///
    /// Lets a caller surface a malformed ledger before it changes anything else.
    pub fn append_to(&self, mut entries: Vec<HistoryEntry>, entry: HistoryEntry) -> Result<()> {
        entries.push(entry);
        let bytes = to_json_pretty(&entries, &self.path)?;
        self.fs.write_atomic(&self.path, &bytes)?;
        tracing::debug!(path = %self.path.display(), entries = entries.len(), "restore ledger appended");
        Ok(())
    }

    /// Every record in append order; empty before the first restore.
    pub fn read_all(&self) -> Result<Vec<HistoryEntry>> {
        if !self.fs.exists(&self.path) {
            return Ok(Vec::new());
        }
        let raw = self.fs.read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|err| CoreError::Serialization(self.path.clone(), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::RealFileSystem;
    use crate::helpers::parse_ledger_datetime;

    fn entry(name: &str, at: &str) -> HistoryEntry {
        HistoryEntry {
            name: name.to_string(),
            original_path: PathBuf::from("/data").join(name),
            restored_at: parse_ledger_datetime(at).unwrap(),
        }
    }

    #[test]
    fn empty_before_first_append() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = RestoreLedger::new(dir.path().join("restore_log.json"), Arc::new(RealFileSystem));
        assert!(ledger.read_all().unwrap().is_empty());
    }

    #[test]
    fn keeps_append_order_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = RestoreLedger::new(dir.path().join("restore_log.json"), Arc::new(RealFileSystem));
        ledger.append(entry("b.txt", "2024-05-01 10:00:00")).unwrap();
        ledger.append(entry("a.txt", "2024-05-01 09:00:00")).unwrap();
        ledger.append(entry("b.txt", "2024-05-01 11:00:00")).unwrap();

        let names: Vec<_> = ledger.read_all().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["b.txt", "a.txt", "b.txt"]);
    }

    #[test]
    fn reads_legacy_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restore_log.json");
        std::fs::write(
            &path,
            r#"[
    {
        "file_name": "report.txt",
        "original_path": "/home/u/report.txt",
        "restored_on": "2023-11-20 14:31:07"
    }
]"#,
        )
        .unwrap();

        let ledger = RestoreLedger::new(path, Arc::new(RealFileSystem));
        assert_eq!(ledger.read_all().unwrap(), vec![entry_at("report.txt", "/home/u/report.txt")]);
    }

    fn entry_at(name: &str, original: &str) -> HistoryEntry {
        HistoryEntry {
            name: name.to_string(),
            original_path: PathBuf::from(original),
            restored_at: parse_ledger_datetime("2023-11-20 14:31:07").unwrap(),
        }
    }
}
