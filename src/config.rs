//! Where a store keeps its directories and documents.

use crate::errors::{CoreError, Result};
use crate::models::StoreLayout;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable that relocates the store root.
pub const ROOT_ENV_VAR: &str = "SOFT_DELETE_ROOT";

pub const DEFAULT_HOLDING_DIR: &str = "DeletedFile";
pub const DEFAULT_RECOVERED_DIR: &str = "RecoveredFile";
pub const DEFAULT_LOG_FILE: &str = "log.json";
pub const DEFAULT_LEDGER_FILE: &str = "restore_log.json";

/// Store configuration. Relative names are resolved against `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub root: PathBuf,
    pub holding_dir: PathBuf,
    pub recovered_dir: PathBuf,
    pub log_file: PathBuf,
    pub ledger_file: PathBuf,
}

impl StoreConfig {
    /// Default layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            holding_dir: PathBuf::from(DEFAULT_HOLDING_DIR),
            recovered_dir: PathBuf::from(DEFAULT_RECOVERED_DIR),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            ledger_file: PathBuf::from(DEFAULT_LEDGER_FILE),
        }
    }

    /// Uses `SOFT_DELETE_ROOT` when set, otherwise the working directory.
    pub fn from_env() -> Result<Self> {
        match env::var_os(ROOT_ENV_VAR) {
            Some(root) if !root.is_empty() => Ok(Self::new(root)),
            _ => {
                let cwd = env::current_dir().map_err(|err| CoreError::io(".", err))?;
                Ok(Self::new(cwd))
            }
        }
    }

    pub fn with_holding_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.holding_dir = dir.into();
        self
    }

    pub fn with_recovered_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.recovered_dir = dir.into();
        self
    }

    pub fn with_log_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.log_file = file.into();
        self
    }

    pub fn with_ledger_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.ledger_file = file.into();
        self
    }

    /// Resolves every location to an absolute path.
    pub fn layout(&self) -> Result<StoreLayout> {
        let root = if self.root.is_absolute() {
            self.root.clone()
        } else {
            env::current_dir()
                .map_err(|err| CoreError::io(&self.root, err))?
                .join(&self.root)
        };
        let resolve = |p: &Path| if p.is_absolute() { p.to_path_buf() } else { root.join(p) };
        Ok(StoreLayout {
            holding_dir: resolve(&self.holding_dir),
            recovered_dir: resolve(&self.recovered_dir),
            log_path: resolve(&self.log_file),
            ledger_path: resolve(&self.ledger_file),
            root,
        })
    }
}
