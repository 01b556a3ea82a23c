use std::{io, path::PathBuf};

/// Coarse failure classes surfaced to callers of the store.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Missing source item, unknown quarantine name or unusable path.
    NotFound,
    /// Name collision in the holding area or an occupied restore destination.
    Conflict,
    /// OS-level move/copy/write failure, including unreadable documents.
    IoFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::IoFailure => "I/O failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type shared by the store, the ledger and the command crate.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    /// A source item or a quarantine entry does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A path cannot be quarantined (no base name, or inside the store).
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A name or destination is already taken.
    #[error("resource conflict: {0}")]
    Conflict(String),

    /// File system I/O failure.
    #[error("I/O error while accessing {0}")]
    Io(PathBuf, #[source] io::Error),

    /// A persisted document could not be encoded or decoded.
    #[error("malformed document {0}")]
    Serialization(PathBuf, #[source] serde_json::Error),

    /// Platform-specific behavior not available in this environment.
    #[error("unsupported platform behavior: {0}")]
    UnsupportedPlatform(String),
}

impl CoreError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::Io(path.into(), error)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) | Self::InvalidPath(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Io(..) | Self::Serialization(..) | Self::UnsupportedPlatform(_) => {
                ErrorKind::IoFailure
            }
        }
    }
}

/// Shared result alias for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_collapse_onto_three_classes() {
        assert_eq!(CoreError::not_found("a").kind(), ErrorKind::NotFound);
        assert_eq!(CoreError::invalid_path("/").kind(), ErrorKind::NotFound);
        assert_eq!(CoreError::conflict("b").kind(), ErrorKind::Conflict);
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(CoreError::io("/tmp/x", io_err).kind(), ErrorKind::IoFailure);
        assert_eq!(
            CoreError::UnsupportedPlatform("trash".into()).kind(),
            ErrorKind::IoFailure
        );
    }

    #[test]
    fn io_error_keeps_source() {
        use std::error::Error as _;
        let err = CoreError::io("/tmp/x", io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(err.to_string(), "I/O error while accessing /tmp/x");
        assert!(err.source().is_some());
    }
}
