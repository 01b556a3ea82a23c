use clap::{Parser, Subcommand};
use soft_delete_core::{Result, StoreConfig};
use std::path::PathBuf;

/// Move files into a recoverable holding area instead of deleting them.
#[derive(Debug, Parser)]
#[command(name = "soft-delete", version)]
pub struct Args {
    /// Directory holding the store (defaults to $SOFT_DELETE_ROOT, then the working directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Holding directory for quarantined items, relative to the root unless absolute
    #[arg(long, global = true, value_name = "DIR")]
    pub holding_dir: Option<PathBuf>,

    /// Directory for copies of recovered files, relative to the root unless absolute
    #[arg(long, global = true, value_name = "DIR")]
    pub recovered_dir: Option<PathBuf>,

    /// Delete log document, relative to the root unless absolute
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Restore ledger document, relative to the root unless absolute
    #[arg(long, global = true, value_name = "FILE")]
    pub ledger_file: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Store configuration from the root (flag, then environment) and location overrides.
    pub fn store_config(&self) -> Result<StoreConfig> {
        let mut config = match &self.root {
            Some(root) => StoreConfig::new(root),
            None => StoreConfig::from_env()?,
        };
        if let Some(dir) = &self.holding_dir {
            config = config.with_holding_dir(dir);
        }
        if let Some(dir) = &self.recovered_dir {
            config = config.with_recovered_dir(dir);
        }
        if let Some(file) = &self.log_file {
            config = config.with_log_file(file);
        }
        if let Some(file) = &self.ledger_file {
            config = config.with_ledger_file(file);
        }
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Quarantine a file or directory
    Delete {
        path: PathBuf,
    },
    /// Move a quarantined item back to where it came from
    Recover {
        name: String,
    },
    /// Show quarantined and recovered items
    List {
        /// Only show quarantined names containing TEXT (case-insensitive)
        #[arg(short, long, value_name = "TEXT")]
        search: Option<String>,
    },
    /// Show completed restores, oldest first
    History,
    /// Compare the delete log with the holding directory
    Check,
    /// Work with the operating system's trash
    #[command(subcommand)]
    Trash(TrashCommand),
}

#[derive(Debug, Subcommand)]
pub enum TrashCommand {
    /// List items in the system trash
    List,
    /// Restore an item from the system trash by its original path
    Restore {
        original_path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_trash_restore() {
        let args = Args::try_parse_from(["soft-delete", "--root", "/srv", "trash", "restore", "/home/u/a.txt"]).unwrap();
        assert_eq!(args.root, Some(PathBuf::from("/srv")));
        assert!(matches!(
            args.command,
            Command::Trash(TrashCommand::Restore { ref original_path }) if original_path == &PathBuf::from("/home/u/a.txt")
        ));
    }

    #[test]
    fn location_flags_override_defaults() {
        let args = Args::try_parse_from([
            "soft-delete",
            "--root",
            "/srv/recovery",
            "--holding-dir",
            "quarantine",
            "--recovered-dir",
            "/var/recovered",
            "--log-file",
            "state/log.json",
            "--ledger-file",
            "state/history.json",
            "history",
        ])
        .unwrap();

        let layout = args.store_config().unwrap().layout().unwrap();
        assert_eq!(layout.holding_dir, PathBuf::from("/srv/recovery/quarantine"));
        assert_eq!(layout.recovered_dir, PathBuf::from("/var/recovered"));
        assert_eq!(layout.log_path, PathBuf::from("/srv/recovery/state/log.json"));
        assert_eq!(layout.ledger_path, PathBuf::from("/srv/recovery/state/history.json"));
    }

    #[test]
    fn root_alone_keeps_default_names() {
        let args = Args::try_parse_from(["soft-delete", "--root", "/srv/recovery", "list"]).unwrap();
        let layout = args.store_config().unwrap().layout().unwrap();
        assert_eq!(layout.holding_dir, PathBuf::from("/srv/recovery/DeletedFile"));
        assert_eq!(layout.ledger_path, PathBuf::from("/srv/recovery/restore_log.json"));
    }

    #[test]
    fn list_search_is_optional() {
        let args = Args::try_parse_from(["soft-delete", "list", "-s", "inv"]).unwrap();
        assert!(matches!(args.command, Command::List { search: Some(ref s) } if s == "inv"));
        let args = Args::try_parse_from(["soft-delete", "list"]).unwrap();
        assert!(matches!(args.command, Command::List { search: None }));
    }
}
