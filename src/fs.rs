use crate::errors::CoreError;
use std::fs::{self, Metadata};
use std::io::{self, Write};
use std::path::Path;
use std::time::SystemTime;
use walkdir::WalkDir;

/// Filesystem abstraction boundary for the quarantine store.
///
/// Keeping this trait narrow makes it easy to write deterministic tests and
/// to inject failures at exactly the step a test cares about.
pub trait FileSystem: Send + Sync {
    /// Returns the current time in wall-clock format.
    fn now(&self) -> SystemTime;

    /// Returns true when path exists (symlink-aware).
    fn exists(&self, path: &Path) -> bool;

    /// Reads file metadata, following symlinks.
    fn metadata(&self, path: &Path) -> crate::Result<Metadata>;

    /// Reads symlink metadata.
    fn symlink_metadata(&self, path: &Path) -> crate::Result<Metadata>;

    /// Creates a directory and all missing parent directories.
    fn create_dir_all(&self, path: &Path) -> crate::Result<()>;

    /// Reads UTF-8 text.
    fn read_to_string(&self, path: &Path) -> crate::Result<String>;

    /// Replaces the file at `path` with `data` so readers never see a partial write.
    fn write_atomic(&self, path: &Path, data: &[u8]) -> crate::Result<()>;

    /// Copies a regular file, overwriting `to`.
    fn copy_file(&self, from: &Path, to: &Path) -> crate::Result<()>;

    /// Moves a file or directory tree, crossing devices when needed.
    fn move_path(&self, from: &Path, to: &Path) -> crate::Result<()>;

    /// Lists the names of a directory's children.
    fn list_dir_names(&self, path: &Path) -> crate::Result<Vec<String>>;
}

/// Default filesystem implementation backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn metadata(&self, path: &Path) -> crate::Result<Metadata> {
        fs::metadata(path).map_err(|err| CoreError::io(path, err))
    }

    fn symlink_metadata(&self, path: &Path) -> crate::Result<Metadata> {
        fs::symlink_metadata(path).map_err(|err| CoreError::io(path, err))
    }

    fn create_dir_all(&self, path: &Path) -> crate::Result<()> {
        fs::create_dir_all(path).map_err(|err| CoreError::io(path, err))
    }

    fn read_to_string(&self, path: &Path) -> crate::Result<String> {
        fs::read_to_string(path).map_err(|err| CoreError::io(path, err))
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> crate::Result<()> {
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|err| CoreError::io(dir, err))?;
        temp.write_all(data)
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|err| CoreError::io(temp.path(), err))?;
        temp.persist(path)
            .map_err(|err| CoreError::io(path, err.error))?;
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> crate::Result<()> {
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|err| CoreError::io(from, err))
    }

    fn move_path(&self, from: &Path, to: &Path) -> crate::Result<()> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err) if is_cross_device(&err) => {
                tracing::debug!(from = %from.display(), to = %to.display(), "rename crosses devices, copying instead");
                copy_tree(from, to).map_err(|err| CoreError::io(to, err))?;
                remove_tree(from).map_err(|err| CoreError::io(from, err))
            }
            Err(err) => Err(CoreError::io(from, err)),
        }
    }

    fn list_dir_names(&self, path: &Path) -> crate::Result<Vec<String>> {
        fs::read_dir(path)
            .map_err(|err| CoreError::io(path, err))?
            .map(|entry| entry.map(|v| v.file_name().to_string_lossy().into_owned()))
            .collect::<Result<Vec<String>, io::Error>>()
            .map_err(|err| CoreError::io(path, err))
    }
}

#[cfg(unix)]
fn is_cross_device(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::EXDEV)
}

#[cfg(not(unix))]
fn is_cross_device(_err: &io::Error) -> bool {
    false
}

/// Copies the tree at `from` to `to`, recreating symlinks rather than following them.
fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    for entry in WalkDir::new(from).follow_links(false).follow_root_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let dest = if relative.as_os_str().is_empty() {
            to.to_path_buf()
        } else {
            to.join(relative)
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            fs::create_dir(&dest)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    let target = fs::read_link(from)?;
    std::os::unix::fs::symlink(target, to)
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to).map(|_| ())
}

fn remove_tree(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
