//! Dynamic library seam.
//!
//! The resolver never calls the OS loader directly; it goes through a
//! [`LibraryLoader`]. The production implementation lives in
//! [`backends`](crate::backends) and wraps `LoadLibraryW`/`GetProcAddress`.
//! Tests substitute loaders that hand out fake candidates.

use std::ffi::CStr;
use std::fmt;

/// Untyped exported function, as returned by `GetProcAddress`.
///
/// The resolver casts it to the signature it expects for the symbol it asked for.
pub type RawProc = unsafe extern "system" fn() -> isize;

/// Identifies an export either by name or by ordinal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Documented export name.
    Name(&'static CStr),
    /// Export ordinal, for entry points that have no name.
    Ordinal(u16),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Name(name) => write!(f, "{}", name.to_string_lossy()),
            Symbol::Ordinal(n) => write!(f, "#{n}"),
        }
    }
}

/// A loaded dynamic library.
///
/// Implementations own the module handle. The resolver keeps the library alive
/// for as long as any function pointer obtained from it may be called.
pub trait Library: Send + Sync {
    /// Look up an export. `None` if the library does not provide it.
    fn symbol(&self, symbol: Symbol) -> Option<RawProc>;
}

/// Loads libraries by file name.
pub trait LibraryLoader: Send + Sync {
    /// Load `file_name` from the platform search path.
    ///
    /// ### Errors
    /// Returns the OS error code (e.g. `GetLastError()`) on failure.
    fn load(&self, file_name: &str) -> Result<Box<dyn Library>, u32>;
}
