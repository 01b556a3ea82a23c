use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Store operation a front end asked for.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Operation {
    Quarantine,
    Restore,
    List,
    History,
    Verify,
    SystemTrash,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quarantine => "delete",
            Self::Restore => "recover",
            Self::List => "list",
            Self::History => "history",
            Self::Verify => "check",
            Self::SystemTrash => "trash",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rendered result of one front-end command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub command: Operation,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub exit_code: u8,
}

impl CommandOutput {
    pub fn success(command: Operation, stdout: impl Into<Vec<String>>) -> Self {
        Self {
            command,
            stdout: stdout.into(),
            stderr: Vec::new(),
            exit_code: ExitStatusLike::Ok.as_code(),
        }
    }

    pub fn warning(command: Operation, stdout: impl Into<Vec<String>>, stderr: impl Into<Vec<String>>) -> Self {
        Self {
            command,
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code: ExitStatusLike::Warning.as_code(),
        }
    }

    pub fn with_error(command: Operation, stderr: impl Into<String>) -> Self {
        Self {
            command,
            stdout: Vec::new(),
            stderr: vec![stderr.into()],
            exit_code: ExitStatusLike::Error.as_code(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ExitStatusLike {
    Ok,
    Warning,
    Error,
}

impl ExitStatusLike {
    pub fn as_code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Warning => 2,
            Self::Error => 1,
        }
    }
}

/// Resolved on-disk locations owned by one store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    pub root: PathBuf,
    pub holding_dir: PathBuf,
    pub recovered_dir: PathBuf,
    pub log_path: PathBuf,
    pub ledger_path: PathBuf,
}

impl StoreLayout {
    pub fn holding_path(&self, name: &str) -> PathBuf {
        self.holding_dir.join(name)
    }

    pub fn recovered_path(&self, name: &str) -> PathBuf {
        self.recovered_dir.join(name)
    }
}

/// One live delete-log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuarantineEntry {
    pub name: String,
    pub original_path: PathBuf,
}

/// One completed restore, as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "file_name")]
    pub name: String,
    pub original_path: PathBuf,
    #[serde(rename = "restored_on", with = "ledger_time")]
    pub restored_at: NaiveDateTime,
}

mod ledger_time {
    use crate::helpers::{format_ledger_datetime, parse_ledger_datetime, LEDGER_TIME_FORMAT};
    use chrono::NaiveDateTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_ledger_datetime(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_ledger_datetime(&raw)
            .ok_or_else(|| D::Error::custom(format!("expected {LEDGER_TIME_FORMAT}, got {raw:?}")))
    }
}

/// Current contents of the holding and recovered directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub holding: Vec<String>,
    pub recovered: Vec<String>,
}

/// Divergence between the delete log and the holding directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    /// Logged names with no item in the holding directory.
    pub missing_from_holding: Vec<String>,
    /// Items in the holding directory the log does not know about.
    pub untracked_in_holding: Vec<String>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_from_holding.is_empty() && self.untracked_in_holding.is_empty()
    }
}

/// An item found in the operating system's trash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemTrashItem {
    pub name: String,
    pub original_path: PathBuf,
}
