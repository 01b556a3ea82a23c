//! Optional access to the operating system's own trash.
//!
//! The quarantine store never touches this; front ends pick an implementation
//! once at startup with [`system_trash`] and call it alongside the store.

use crate::errors::{CoreError, Result};
use crate::models::SystemTrashItem;
use std::path::Path;

/// Capability for listing and restoring items from the OS trash.
pub trait SystemTrash: Send + Sync {
    /// False when this build or platform has no usable trash backend.
    fn is_available(&self) -> bool;

    fn list(&self) -> Result<Vec<SystemTrashItem>>;

    /// Restores the trashed item whose original location is `original_path`.
    fn restore(&self, original_path: &Path) -> Result<()>;
}

/// Stand-in used when no OS trash backend exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSystemTrash;

impl SystemTrash for NoSystemTrash {
    fn is_available(&self) -> bool {
        false
    }

    fn list(&self) -> Result<Vec<SystemTrashItem>> {
        Ok(Vec::new())
    }

    fn restore(&self, original_path: &Path) -> Result<()> {
        Err(CoreError::UnsupportedPlatform(format!(
            "no system trash available to restore {}",
            original_path.display()
        )))
    }
}

#[cfg(all(
    feature = "system-trash",
    any(
        target_os = "windows",
        all(unix, not(target_os = "macos"), not(target_os = "ios"), not(target_os = "android"))
    )
))]
mod os {
    use super::SystemTrash;
    use crate::errors::{CoreError, Result};
    use crate::models::SystemTrashItem;
    use std::path::Path;

    /// Backend over the platform trash (freedesktop trash or the Windows recycle bin).
    #[derive(Debug, Default, Clone, Copy)]
    pub struct OsTrash;

    fn backend_error(err: trash::Error) -> CoreError {
        CoreError::UnsupportedPlatform(format!("system trash: {err}"))
    }

    impl SystemTrash for OsTrash {
        fn is_available(&self) -> bool {
            true
        }

        fn list(&self) -> Result<Vec<SystemTrashItem>> {
            let items = trash::os_limited::list().map_err(backend_error)?;
            Ok(items
                .into_iter()
                .map(|item| {
                    let original_path = item.original_path();
                    let name = original_path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    SystemTrashItem { name, original_path }
                })
                .collect())
        }

        fn restore(&self, original_path: &Path) -> Result<()> {
            let matching: Vec<_> = trash::os_limited::list()
                .map_err(backend_error)?
                .into_iter()
                .filter(|item| item.original_path() == original_path)
                .collect();
            if matching.is_empty() {
                return Err(CoreError::not_found(format!(
                    "{} is not in the system trash",
                    original_path.display()
                )));
            }
            trash::os_limited::restore_all(matching).map_err(backend_error)?;
            tracing::info!(original = %original_path.display(), "Restored from system trash");
            Ok(())
        }
    }
}

#[cfg(all(
    feature = "system-trash",
    any(
        target_os = "windows",
        all(unix, not(target_os = "macos"), not(target_os = "ios"), not(target_os = "android"))
    )
))]
pub use os::OsTrash;

/// Picks the trash backend for this build and platform.
pub fn system_trash() -> Box<dyn SystemTrash> {
    #[cfg(all(
        feature = "system-trash",
        any(
            target_os = "windows",
            all(unix, not(target_os = "macos"), not(target_os = "ios"), not(target_os = "android"))
        )
    ))]
    {
        Box::new(OsTrash)
    }
    #[cfg(not(all(
        feature = "system-trash",
        any(
            target_os = "windows",
            all(unix, not(target_os = "macos"), not(target_os = "ios"), not(target_os = "android"))
        )
    )))]
    {
        Box::new(NoSystemTrash)
    }
}
