//! Shared utility helpers for the store and its command front end.

use crate::errors::{CoreError, Result};
use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// Timestamp format used by the restore ledger.
pub const LEDGER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns a user-safe, trimmed path string that can be used in logs and messages.
pub fn sanitize_user_path(path: &Path) -> String {
    path.display().to_string().trim().to_string()
}

/// Converts a wall-clock time into local time truncated to whole seconds.
pub fn local_timestamp(time: SystemTime) -> NaiveDateTime {
    let naive = DateTime::<Local>::from(time).naive_local();
    naive.with_nanosecond(0).unwrap_or(naive)
}

pub fn format_ledger_datetime(value: &NaiveDateTime) -> String {
    value.format(LEDGER_TIME_FORMAT).to_string()
}

pub fn parse_ledger_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, LEDGER_TIME_FORMAT).ok()
}

/// Serializes a document with four-space indentation.
pub fn to_json_pretty<T: Serialize>(value: &T, path: &Path) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|err| CoreError::Serialization(path.to_path_buf(), err))?;
    out.push(b'\n');
    Ok(out)
}

/// Returns the display name an item is quarantined under.
pub fn item_name(path: &Path) -> Result<String> {
    match path.components().next_back() {
        Some(Component::Normal(name)) => name
            .to_str()
            .map(str::to_string)
            .ok_or_else(|| CoreError::invalid_path(format!("{} is not valid UTF-8", path.display()))),
        _ => Err(CoreError::invalid_path(format!(
            "{} has no base name",
            sanitize_user_path(path)
        ))),
    }
}

/// Makes `path` absolute against `cwd` and resolves its parent directory.
///
/// The final component is left untouched so a symlink is recorded as itself.
pub fn absolute_item_path(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    match (joined.parent(), joined.file_name()) {
        (Some(parent), Some(name)) => canonical_or_relaxed(parent).join(name),
        _ => joined,
    }
}

/// Returns a normalized path by resolving `.` and `..` segments where possible.
pub fn canonical_or_relaxed(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Case-insensitive substring match used by the holding-area search.
pub fn name_matches(name: &str, filter: &str) -> bool {
    name.to_lowercase().contains(&filter.to_lowercase())
}
