//! In-memory candidate libraries.
//!
//! [`VirtualLoader`] serves [`VirtualLibrary`] values by file name instead of
//! touching the OS loader. Every load attempt is recorded in a shared
//! [`LoadLog`], so callers can check how often (and in which order) the
//! resolver tried candidates.
//!
//! ```
//! use xinput_bridge::backends::virtual_library::{VirtualLibrary, VirtualLoader};
//! use xinput_bridge::config::ResolverConfig;
//! use xinput_bridge::resolver::{LibraryVersion, Resolver};
//!
//! let loader = VirtualLoader::new().with_library("xinput9_1_0.dll", VirtualLibrary::new());
//! let log = loader.log();
//! let resolver = Resolver::new(Box::new(loader), ResolverConfig::default());
//!
//! assert_eq!(resolver.loaded_version(), LibraryVersion::V9_1_0);
//! assert_eq!(log.attempts(), ["xinput1_4.dll", "xinput1_3.dll", "xinput9_1_0.dll"]);
//! ```

use crate::library::{Library, LibraryLoader, RawProc, Symbol};
use crate::raw::*;
use crate::status::ERROR_MOD_NOT_FOUND;
use std::collections::HashMap;
use std::mem::transmute;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A library made of explicitly registered exports.
#[derive(Clone, Debug, Default)]
pub struct VirtualLibrary {
    symbols: HashMap<Symbol, RawProc>,
}

impl VirtualLibrary {
    /// A library that exports nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw export.
    pub fn with_symbol(mut self, symbol: Symbol, proc: RawProc) -> Self {
        self.symbols.insert(symbol, proc);
        self
    }

    pub fn with_get_state(self, f: GetStateFn) -> Self {
        self.with_symbol(Symbol::Name(c"XInputGetState"), unsafe {
            transmute::<GetStateFn, RawProc>(f)
        })
    }

    /// Export `f` as ordinal 100 (`XInputGetStateEx`).
    pub fn with_get_state_ex(self, f: GetStateFn) -> Self {
        self.with_symbol(
            Symbol::Ordinal(crate::resolver::GET_STATE_EX_ORDINAL),
            unsafe { transmute::<GetStateFn, RawProc>(f) },
        )
    }

    pub fn with_set_state(self, f: SetStateFn) -> Self {
        self.with_symbol(Symbol::Name(c"XInputSetState"), unsafe {
            transmute::<SetStateFn, RawProc>(f)
        })
    }

    pub fn with_get_capabilities(self, f: GetCapabilitiesFn) -> Self {
        self.with_symbol(Symbol::Name(c"XInputGetCapabilities"), unsafe {
            transmute::<GetCapabilitiesFn, RawProc>(f)
        })
    }

    pub fn with_get_battery_information(self, f: GetBatteryInformationFn) -> Self {
        self.with_symbol(Symbol::Name(c"XInputGetBatteryInformation"), unsafe {
            transmute::<GetBatteryInformationFn, RawProc>(f)
        })
    }

    pub fn with_get_keystroke(self, f: GetKeystrokeFn) -> Self {
        self.with_symbol(Symbol::Name(c"XInputGetKeystroke"), unsafe {
            transmute::<GetKeystrokeFn, RawProc>(f)
        })
    }

    pub fn with_enable(self, f: EnableFn) -> Self {
        self.with_symbol(Symbol::Name(c"XInputEnable"), unsafe {
            transmute::<EnableFn, RawProc>(f)
        })
    }
}

impl Library for VirtualLibrary {
    fn symbol(&self, symbol: Symbol) -> Option<RawProc> {
        self.symbols.get(&symbol).copied()
    }
}

/// Shared record of load attempts.
#[derive(Debug, Default)]
pub struct LoadLog {
    attempts: Mutex<Vec<String>>,
}

impl LoadLog {
    /// File names passed to `load`, in call order.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn count(&self) -> usize {
        self.attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn push(&self, file_name: &str) {
        self.attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(file_name.to_string());
    }
}

/// Loader over a fixed table of virtual libraries.
///
/// Names without an entry fail with `ERROR_MOD_NOT_FOUND` unless a different
/// code was set with [`VirtualLoader::with_failure`].
#[derive(Debug, Default)]
pub struct VirtualLoader {
    libraries: HashMap<String, VirtualLibrary>,
    failures: HashMap<String, u32>,
    delay: Option<Duration>,
    log: Arc<LoadLog>,
}

impl VirtualLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `file_name` loadable.
    pub fn with_library(mut self, file_name: &str, library: VirtualLibrary) -> Self {
        self.libraries.insert(file_name.to_string(), library);
        self
    }

    /// Make loading `file_name` fail with `os_error`.
    pub fn with_failure(mut self, file_name: &str, os_error: u32) -> Self {
        self.failures.insert(file_name.to_string(), os_error);
        self
    }

    /// Sleep inside every `load`, to widen race windows in concurrency tests.
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Handle on the attempt log; stays valid after the loader is boxed.
    pub fn log(&self) -> Arc<LoadLog> {
        Arc::clone(&self.log)
    }
}

impl LibraryLoader for VirtualLoader {
    fn load(&self, file_name: &str) -> Result<Box<dyn Library>, u32> {
        self.log.push(file_name);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        match self.libraries.get(file_name) {
            Some(library) => Ok(Box::new(library.clone())),
            None => Err(self
                .failures
                .get(file_name)
                .copied()
                .unwrap_or(ERROR_MOD_NOT_FOUND)),
        }
    }
}
