//! Library loader backends for `xinput-bridge`.
//!
//! Implementations of [`LibraryLoader`](crate::library::LibraryLoader):
//! - **`windows`**: the real Win32 loader (Windows only).
//! - **`virtual_library`**: scripted in-memory candidates for tests and
//!   tooling. Nothing is loaded from disk.
//!
//! On other platforms [`system_loader`] returns a loader that reports every
//! candidate as missing, so the bridge runs in its degraded
//! "always not connected" mode.

use crate::library::{Library, LibraryLoader};
use crate::status::ERROR_MOD_NOT_FOUND;

pub mod virtual_library;

#[cfg(target_os = "windows")]
#[cfg_attr(docsrs, doc(cfg(target_os = "windows")))]
pub mod windows;

/// Loader that fails every load with `ERROR_MOD_NOT_FOUND`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableLoader;

impl LibraryLoader for UnavailableLoader {
    fn load(&self, _file_name: &str) -> Result<Box<dyn Library>, u32> {
        Err(ERROR_MOD_NOT_FOUND)
    }
}

/// The loader for the current platform.
pub fn system_loader() -> Box<dyn LibraryLoader> {
    #[cfg(target_os = "windows")]
    {
        Box::new(windows::SystemLoader)
    }

    #[cfg(not(target_os = "windows"))]
    {
        Box::new(UnavailableLoader)
    }
}
