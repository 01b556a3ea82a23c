//! Soft-delete core: a quarantine store that moves files and directories into
//! a holding area instead of erasing them, and restores them on request.
//! Front ends (the `soft-delete` command, a windowed UI) are thin adapters
//! over [`QuarantineStore`].

pub mod config;
pub mod delete_log;
pub mod errors;
pub mod fs;
pub mod helpers;
pub mod ledger;
pub mod models;
pub mod store;
pub mod system_trash;

pub use config::StoreConfig;
pub use delete_log::{DeleteLog, LogSnapshot};
pub use errors::{CoreError, ErrorKind, Result};
pub use fs::{FileSystem, RealFileSystem};
pub use helpers::{
    format_ledger_datetime,
    parse_ledger_datetime,
    sanitize_user_path,
    LEDGER_TIME_FORMAT,
};
pub use ledger::RestoreLedger;
pub use models::{
    CommandOutput,
    ConsistencyReport,
    ExitStatusLike,
    HistoryEntry,
    Listing,
    Operation,
    QuarantineEntry,
    StoreLayout,
    SystemTrashItem,
};
pub use store::QuarantineStore;
pub use system_trash::{system_trash, NoSystemTrash, SystemTrash};

/// Re-export a small stable API surface for front ends.
pub mod prelude {
    pub use crate::{
        config::StoreConfig,
        errors::{CoreError, ErrorKind, Result},
        fs::{FileSystem, RealFileSystem},
        models::*,
        store::QuarantineStore,
        system_trash::{system_trash, SystemTrash},
    };
}
