#![cfg(target_os = "windows")]

//! Windows library loading.
//!
//! [`SystemLoader`] resolves XInput DLLs through the regular Win32 loader:
//! - `LoadLibraryW` with the bare file name, so the standard DLL search order applies
//! - `GetProcAddress` by name, or by ordinal for unnamed exports
//! - `GetLastError` captured on failure and reported per candidate
//!
//! Modules are never freed. The resolver that owns them lives until process
//! exit, and function pointers into them may be in use on other threads.

pub mod library;

pub use library::{SystemLibrary, SystemLoader};
