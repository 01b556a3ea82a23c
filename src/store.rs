//! The quarantine store: moves items into and out of the holding directory
//! and keeps the delete log in lockstep with it.
//!
//! Every mutation follows the same order: validate, move on disk, then write
//! the log. A failed move leaves the log untouched; a failed log write moves
//! the item back to where it was. Restores read the ledger before moving and
//! append to it last.

use crate::config::StoreConfig;
use crate::delete_log::DeleteLog;
use crate::errors::{CoreError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::helpers::{
    absolute_item_path, canonical_or_relaxed, item_name, local_timestamp, name_matches,
    sanitize_user_path,
};
use crate::ledger::RestoreLedger;
use crate::models::{ConsistencyReport, HistoryEntry, Listing, QuarantineEntry, StoreLayout};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Owner of the holding/recovered directories, the delete log and the ledger.
///
/// `quarantine` and `restore` are serialized against each other; reads may
/// run concurrently with one another.
#[derive(Debug)]
pub struct QuarantineStore<F = RealFileSystem> {
    layout: StoreLayout,
    cwd: PathBuf,
    fs: Arc<F>,
    log: DeleteLog<F>,
    ledger: RestoreLedger<F>,
    lock: RwLock<()>,
}

impl QuarantineStore<RealFileSystem> {
    /// Opens the store on the real filesystem, creating its directories.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        Self::open_with(config, RealFileSystem)
    }
}

impl<F: FileSystem> QuarantineStore<F> {
    pub fn open_with(config: &StoreConfig, fs: F) -> Result<Self> {
        let mut layout = config.layout()?;
        let fs = Arc::new(fs);
        fs.create_dir_all(&layout.holding_dir)?;
        fs.create_dir_all(&layout.recovered_dir)?;
        for document in [&layout.log_path, &layout.ledger_path] {
            if let Some(parent) = document.parent() {
                fs.create_dir_all(parent)?;
            }
        }
        layout.root = canonical_or_relaxed(&layout.root);
        layout.holding_dir = canonical_or_relaxed(&layout.holding_dir);
        layout.recovered_dir = canonical_or_relaxed(&layout.recovered_dir);
        layout.log_path = absolute_item_path(&layout.log_path, &layout.root);
        layout.ledger_path = absolute_item_path(&layout.ledger_path, &layout.root);

        let cwd = env::current_dir().unwrap_or_else(|_| layout.root.clone());
        tracing::debug!(
            holding = %layout.holding_dir.display(),
            recovered = %layout.recovered_dir.display(),
            "Quarantine store opened"
        );
        Ok(Self {
            log: DeleteLog::new(layout.log_path.clone(), Arc::clone(&fs)),
            ledger: RestoreLedger::new(layout.ledger_path.clone(), Arc::clone(&fs)),
            layout,
            cwd,
            fs,
            lock: RwLock::new(()),
        })
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Moves `source` into the holding directory and records where it came from.
    ///
    /// Returns the name the item is now held under.
    pub fn quarantine(&self, source: impl AsRef<Path>) -> Result<String> {
        let _guard = self.lock.write();
        let source = absolute_item_path(source.as_ref(), &self.cwd);

        if !self.fs.exists(&source) {
            return Err(CoreError::not_found(sanitize_user_path(&source)));
        }
        let is_item = self
            .fs
            .metadata(&source)
            .map(|meta| meta.is_file() || meta.is_dir())
            .unwrap_or(false);
        if !is_item {
            return Err(CoreError::invalid_path(format!(
                "{} is neither a file nor a directory",
                sanitize_user_path(&source)
            )));
        }
        self.ensure_outside_store(&source)?;

        let name = item_name(&source)?;
        let target = self.layout.holding_path(&name);
        let mut snapshot = self.log.load()?;
        if snapshot.contains_key(&name) || self.fs.exists(&target) {
            return Err(CoreError::conflict(format!("{name} is already quarantined")));
        }

        self.fs.move_path(&source, &target)?;
        snapshot.insert(name.clone(), source.clone());
        if let Err(err) = self.log.save(&snapshot) {
            self.roll_back(&target, &source);
            return Err(err);
        }

        tracing::info!(name = %name, original = %source.display(), "Item quarantined");
        Ok(name)
    }

    /// Moves a quarantined item back to its original path.
    ///
    /// Regular files are also copied into the recovered directory. Returns the
    /// path the item was restored to.
    pub fn restore(&self, name: &str) -> Result<PathBuf> {
        let _guard = self.lock.write();
        let mut snapshot = self.log.load()?;
        let original = snapshot
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::not_found(format!("{name} is not quarantined")))?;

        let held = self.layout.holding_path(name);
        let held_meta = self.fs.symlink_metadata(&held).map_err(|_| {
            CoreError::not_found(format!("{name} is logged but missing from the holding directory"))
        })?;
        if self.fs.exists(&original) {
            return Err(CoreError::conflict(format!(
                "{} already exists",
                sanitize_user_path(&original)
            )));
        }
        // An unreadable ledger must fail before anything moves.
        let history = self.ledger.read_all()?;
        if let Some(parent) = original.parent() {
            if !self.fs.exists(parent) {
                self.fs.create_dir_all(parent)?;
            }
        }

        self.fs.move_path(&held, &original)?;

        snapshot.remove(name);
        if let Err(err) = self.log.save(&snapshot) {
            self.roll_back(&original, &held);
            return Err(err);
        }

        if held_meta.is_file() {
            let mirror = self.layout.recovered_path(name);
            if let Err(err) = self.fs.copy_file(&original, &mirror) {
                tracing::warn!(name = %name, error = %err, "Could not mirror restored file");
            }
        }

        self.ledger.append_to(
            history,
            HistoryEntry {
                name: name.to_string(),
                original_path: original.clone(),
                restored_at: local_timestamp(self.fs.now()),
            },
        )?;

        tracing::info!(name = %name, original = %original.display(), "Item restored");
        Ok(original)
    }

    /// Current holding and recovered directory contents, sorted by name.
    ///
    /// `filter` narrows the holding list to names containing it, ignoring case.
    pub fn list(&self, filter: Option<&str>) -> Result<Listing> {
        let _guard = self.lock.read();
        let mut holding = self.fs.list_dir_names(&self.layout.holding_dir)?;
        if let Some(filter) = filter {
            holding.retain(|name| name_matches(name, filter));
        }
        holding.sort();
        let mut recovered = self.fs.list_dir_names(&self.layout.recovered_dir)?;
        recovered.sort();
        tracing::debug!(holding = holding.len(), recovered = recovered.len(), "Listed store");
        Ok(Listing { holding, recovered })
    }

    /// Completed restores in the order they happened.
    pub fn history(&self) -> Result<Vec<HistoryEntry>> {
        let _guard = self.lock.read();
        self.ledger.read_all()
    }

    /// The delete log, ordered by name.
    pub fn entries(&self) -> Result<Vec<QuarantineEntry>> {
        let _guard = self.lock.read();
        self.log.entries()
    }

    /// Compares the delete log with the holding directory without repairing anything.
    pub fn verify(&self) -> Result<ConsistencyReport> {
        let _guard = self.lock.read();
        let logged: BTreeSet<String> = self.log.load()?.into_keys().collect();
        let held: BTreeSet<String> = self
            .fs
            .list_dir_names(&self.layout.holding_dir)?
            .into_iter()
            .collect();

        let report = ConsistencyReport {
            missing_from_holding: logged.difference(&held).cloned().collect(),
            untracked_in_holding: held.difference(&logged).cloned().collect(),
        };
        if !report.is_consistent() {
            tracing::warn!(
                missing = report.missing_from_holding.len(),
                untracked = report.untracked_in_holding.len(),
                "Delete log and holding directory disagree"
            );
        }
        Ok(report)
    }

    fn ensure_outside_store(&self, source: &Path) -> Result<()> {
        let owned = [
            self.layout.holding_dir.as_path(),
            self.layout.recovered_dir.as_path(),
            self.layout.log_path.as_path(),
            self.layout.ledger_path.as_path(),
        ];
        for path in owned {
            if source.starts_with(path) || path.starts_with(source) {
                return Err(CoreError::invalid_path(format!(
                    "{} belongs to the quarantine store",
                    sanitize_user_path(source)
                )));
            }
        }
        Ok(())
    }

    fn roll_back(&self, from: &Path, to: &Path) {
        match self.fs.move_path(from, to) {
            Ok(()) => tracing::warn!(from = %from.display(), to = %to.display(), "Rolled back move"),
            Err(err) => tracing::error!(
                from = %from.display(),
                to = %to.display(),
                error = %err,
                "Rollback failed, delete log and holding directory may disagree"
            ),
        }
    }
}
