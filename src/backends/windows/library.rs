#![cfg(target_os = "windows")]

//! `LoadLibraryW` / `GetProcAddress` implementation of the loader seam.

use crate::library::{Library, LibraryLoader, RawProc, Symbol};
use log::trace;
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;

use windows_sys::core::PCSTR;
use windows_sys::Win32::Foundation::{GetLastError, HMODULE};
use windows_sys::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};

/// Loads DLLs from the platform search path.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemLoader;

/// A module mapped by [`SystemLoader`].
#[derive(Debug)]
pub struct SystemLibrary {
    module: HMODULE,
}

// SAFETY: an HMODULE is a process-wide handle; `GetProcAddress` is thread-safe.
unsafe impl Send for SystemLibrary {}
unsafe impl Sync for SystemLibrary {}

impl LibraryLoader for SystemLoader {
    fn load(&self, file_name: &str) -> Result<Box<dyn Library>, u32> {
        // UTF-16 + NUL
        let wide: Vec<u16> = OsStr::new(file_name)
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        let module = unsafe { LoadLibraryW(wide.as_ptr()) };
        if module.is_null() {
            let code = unsafe { GetLastError() };
            Err(code)
        } else {
            trace!("LoadLibraryW({file_name}) -> {module:p}");
            Ok(Box::new(SystemLibrary { module }))
        }
    }
}

impl Library for SystemLibrary {
    fn symbol(&self, symbol: Symbol) -> Option<RawProc> {
        let name: PCSTR = match symbol {
            Symbol::Name(name) => name.as_ptr().cast(),
            // MAKEINTRESOURCEA: the ordinal in the low word of the pointer.
            Symbol::Ordinal(ordinal) => ordinal as usize as PCSTR,
        };
        unsafe { GetProcAddress(self.module, name) }
    }
}
