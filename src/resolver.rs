//! XInput library resolution.
//!
//! [`Resolver`] binds, once, to the best XInput DLL available on the system
//! and exposes a uniform calling surface over whatever it found.
//!
//! # Resolution
//! On the first call to [`Resolver::ensure_loaded`] (or to any operation, which
//! calls it implicitly) the candidates are tried in preference order and the
//! first one that loads wins:
//!
//! | Version | File              |
//! |---------|-------------------|
//! | 1.4     | `xinput1_4.dll`   |
//! | 1.3     | `xinput1_3.dll`   |
//! | 9.1.0   | `xinput9_1_0.dll` |
//!
//! ([`PreferenceOrder::Legacy`] swaps the first two.)
//!
//! From the winning library every entry point is bound independently; any of
//! them may be missing. Get-state is probed under two identities: the
//! undocumented ordinal 100 (`XInputGetStateEx`, which also reports the guide
//! button) and the documented `XInputGetState`. Whichever binds is recorded, and
//! [`Resolver::guide_button_supported`] reflects it.
//!
//! The outcome is fixed for the lifetime of the resolver. A failed resolution
//! is never retried, even if a DLL becomes available later.
//!
//! # Degraded mode
//! If nothing loads, or an entry point is missing, the corresponding calls
//! return [`ERROR_DEVICE_NOT_CONNECTED`] without touching the OS. A caller
//! cannot tell "no controller" from "no XInput"; the reason is only available
//! from the log line emitted at resolution time and from [`ResolutionReport`].
//!
//! # Concurrency
//! Resolution runs under `once_cell::sync::OnceCell`: concurrent first calls
//! block until a single load-and-bind sequence finishes, and every later call
//! takes the lock-free path. Forwarded calls are not serialized; XInput itself
//! supports concurrent polling.

use crate::backends;
use crate::config::{PreferenceOrder, ResolverConfig, StateProbe};
use crate::library::{Library, LibraryLoader, RawProc, Symbol};
use crate::raw::*;
use crate::snapshot::Vibration;
use crate::status::ERROR_DEVICE_NOT_CONNECTED;
use log::{debug, trace, warn};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::ffi::CStr;
use std::fmt;
use std::mem::transmute;

/// Ordinal of the undocumented guide-aware `XInputGetStateEx`.
pub const GET_STATE_EX_ORDINAL: u16 = 100;

const XINPUT_GET_STATE: &CStr = c"XInputGetState";
const XINPUT_SET_STATE: &CStr = c"XInputSetState";
const XINPUT_GET_CAPABILITIES: &CStr = c"XInputGetCapabilities";
const XINPUT_GET_BATTERY_INFORMATION: &CStr = c"XInputGetBatteryInformation";
const XINPUT_GET_KEYSTROKE: &CStr = c"XInputGetKeystroke";
const XINPUT_ENABLE: &CStr = c"XInputEnable";

/// Which XInput DLL was bound.
///
/// The discriminants are the values reported across the FFI boundary.
#[repr(i32)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum LibraryVersion {
    /// Nothing loaded (or not attempted yet).
    #[default]
    None = 0,
    V1_4 = 1,
    V1_3 = 2,
    V9_1_0 = 3,
}

impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LibraryVersion::None => "none",
            LibraryVersion::V1_4 => "1.4",
            LibraryVersion::V1_3 => "1.3",
            LibraryVersion::V9_1_0 => "9.1.0",
        })
    }
}

/// A DLL the resolver may bind to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub version: LibraryVersion,
    pub file_name: &'static str,
}

pub const XINPUT_1_4: Candidate = Candidate {
    version: LibraryVersion::V1_4,
    file_name: "xinput1_4.dll",
};

pub const XINPUT_1_3: Candidate = Candidate {
    version: LibraryVersion::V1_3,
    file_name: "xinput1_3.dll",
};

pub const XINPUT_9_1_0: Candidate = Candidate {
    version: LibraryVersion::V9_1_0,
    file_name: "xinput9_1_0.dll",
};

/// Candidates in the order they are tried.
pub fn candidates(order: PreferenceOrder) -> [Candidate; 3] {
    match order {
        PreferenceOrder::NewestFirst => [XINPUT_1_4, XINPUT_1_3, XINPUT_9_1_0],
        PreferenceOrder::Legacy => [XINPUT_1_3, XINPUT_1_4, XINPUT_9_1_0],
    }
}

/// What happened to one candidate during resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "outcome")]
pub enum CandidateOutcome {
    /// An earlier candidate already loaded.
    NotAttempted,
    Loaded,
    /// The OS loader refused it with this error code.
    Failed { os_error: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CandidateReport {
    pub candidate: Candidate,
    #[serde(flatten)]
    pub outcome: CandidateOutcome,
}

/// Which get-state export was bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GetStateVariant {
    /// Ordinal 100, reports the guide button.
    Enhanced,
    /// `XInputGetState`.
    Documented,
}

/// Which entry points were bound from the loaded library.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BoundEntryPoints {
    pub get_state: Option<GetStateVariant>,
    pub set_state: bool,
    pub get_capabilities: bool,
    pub get_battery_information: bool,
    pub get_keystroke: bool,
    pub enable: bool,
}

/// Outcome of resolution, kept for the life of the resolver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    /// Winning candidate, or [`LibraryVersion::None`].
    pub version: LibraryVersion,
    /// One entry per candidate, in the order they were considered.
    pub candidates: Vec<CandidateReport>,
    pub entry_points: BoundEntryPoints,
}

impl ResolutionReport {
    pub fn guide_button_supported(&self) -> bool {
        self.entry_points.get_state == Some(GetStateVariant::Enhanced)
    }

    pub fn is_loaded(&self) -> bool {
        self.version != LibraryVersion::None
    }

    /// `"xinput1_4.dll: error 126, ..."` for the candidates that were tried.
    fn attempts_summary(&self) -> String {
        self.candidates
            .iter()
            .filter_map(|r| match r.outcome {
                CandidateOutcome::NotAttempted => None,
                CandidateOutcome::Loaded => Some(format!("{}: loaded", r.candidate.file_name)),
                CandidateOutcome::Failed { os_error } => {
                    Some(format!("{}: error {os_error}", r.candidate.file_name))
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Default)]
struct EntryPoints {
    get_state: Option<GetStateFn>,
    set_state: Option<SetStateFn>,
    get_capabilities: Option<GetCapabilitiesFn>,
    get_battery_information: Option<GetBatteryInformationFn>,
    get_keystroke: Option<GetKeystrokeFn>,
    enable: Option<EnableFn>,
}

/// Everything fixed by the one resolution attempt.
struct LoaderState {
    report: ResolutionReport,
    entry: EntryPoints,
    /// Keeps the module mapped while `entry` may be called. Never unloaded.
    _library: Option<Box<dyn Library>>,
}

/// Lazily binds to an XInput DLL and forwards calls to it.
///
/// Construct one per process (see [`crate::ffi`]) or one per test with a fake
/// [`LibraryLoader`].
pub struct Resolver {
    loader: Box<dyn LibraryLoader>,
    config: ResolverConfig,
    state: OnceCell<LoaderState>,
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("report", &self.state.get().map(|s| &s.report))
            .finish()
    }
}

impl Resolver {
    /// Create an unresolved resolver. Nothing is loaded until first use.
    pub fn new(loader: Box<dyn LibraryLoader>, config: ResolverConfig) -> Self {
        Self {
            loader,
            config,
            state: OnceCell::new(),
        }
    }

    /// Resolver over the platform loader.
    pub fn system(config: ResolverConfig) -> Self {
        Self::new(backends::system_loader(), config)
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// True once resolution has been attempted (whatever its outcome).
    pub fn is_resolved(&self) -> bool {
        self.state.get().is_some()
    }

    /// Resolve on first call; afterwards return the cached outcome.
    pub fn ensure_loaded(&self) -> &ResolutionReport {
        &self.state().report
    }

    /// Version of the bound library, resolving first if needed.
    pub fn loaded_version(&self) -> LibraryVersion {
        self.ensure_loaded().version
    }

    /// Whether the guide-aware get-state entry point was bound, resolving first if needed.
    pub fn guide_button_supported(&self) -> bool {
        self.ensure_loaded().guide_button_supported()
    }

    fn state(&self) -> &LoaderState {
        self.state.get_or_init(|| self.resolve())
    }

    fn resolve(&self) -> LoaderState {
        let mut reports = Vec::with_capacity(3);
        let mut loaded: Option<(Candidate, Box<dyn Library>)> = None;

        for candidate in candidates(self.config.preference) {
            if loaded.is_some() {
                reports.push(CandidateReport {
                    candidate,
                    outcome: CandidateOutcome::NotAttempted,
                });
                continue;
            }

            trace!("Attempting to load XInput DLL: {}", candidate.file_name);
            match self.loader.load(candidate.file_name) {
                Ok(library) => {
                    debug!("XInput loaded: {}", candidate.file_name);
                    reports.push(CandidateReport {
                        candidate,
                        outcome: CandidateOutcome::Loaded,
                    });
                    loaded = Some((candidate, library));
                }
                Err(os_error) => {
                    trace!("Could not load {}: error {os_error}", candidate.file_name);
                    reports.push(CandidateReport {
                        candidate,
                        outcome: CandidateOutcome::Failed { os_error },
                    });
                }
            }
        }

        let Some((candidate, library)) = loaded else {
            let report = ResolutionReport {
                version: LibraryVersion::None,
                candidates: reports,
                entry_points: BoundEntryPoints::default(),
            };
            warn!(
                "No XInput library could be loaded ({}); controllers will report as not connected",
                report.attempts_summary()
            );
            return LoaderState {
                report,
                entry: EntryPoints::default(),
                _library: None,
            };
        };

        let (entry, entry_points) = bind(library.as_ref(), self.config.state_probe);

        let report = ResolutionReport {
            version: candidate.version,
            candidates: reports,
            entry_points,
        };
        debug!(
            "XInput {} bound ({}); guide button supported: {}",
            report.version,
            candidate.file_name,
            report.guide_button_supported()
        );

        LoaderState {
            report,
            entry,
            _library: Some(library),
        }
    }

    /// Poll a controller. `state` is overwritten only on success.
    ///
    /// Returns the OS status verbatim, or [`ERROR_DEVICE_NOT_CONNECTED`] if no
    /// get-state entry point is bound.
    pub fn get_state(&self, user_index: u32, state: &mut RawState) -> u32 {
        let Some(f) = self.state().entry.get_state else {
            return ERROR_DEVICE_NOT_CONNECTED;
        };
        let mut ex = RawStateEx::default();
        // The enhanced variant may write past `XINPUT_STATE`; give it room.
        let status = unsafe { f(user_index, (&mut ex as *mut RawStateEx).cast::<RawState>()) };
        if status == crate::status::ERROR_SUCCESS {
            *state = ex.state;
        }
        status
    }

    /// Set motor speeds.
    pub fn set_state(&self, user_index: u32, vibration: Vibration) -> u32 {
        let Some(f) = self.state().entry.set_state else {
            return ERROR_DEVICE_NOT_CONNECTED;
        };
        let mut raw = RawVibration::from(vibration);
        unsafe { f(user_index, &mut raw) }
    }

    pub fn get_capabilities(&self, user_index: u32, flags: u32, caps: &mut RawCapabilities) -> u32 {
        let Some(f) = self.state().entry.get_capabilities else {
            return ERROR_DEVICE_NOT_CONNECTED;
        };
        unsafe { f(user_index, flags, caps) }
    }

    pub fn get_battery_information(
        &self,
        user_index: u32,
        device_type: u8,
        info: &mut RawBatteryInformation,
    ) -> u32 {
        let Some(f) = self.state().entry.get_battery_information else {
            return ERROR_DEVICE_NOT_CONNECTED;
        };
        unsafe { f(user_index, device_type, info) }
    }

    pub fn get_keystroke(&self, user_index: u32, keystroke: &mut RawKeystroke) -> u32 {
        let Some(f) = self.state().entry.get_keystroke else {
            return ERROR_DEVICE_NOT_CONNECTED;
        };
        // `dwReserved` must be zero.
        unsafe { f(user_index, 0, keystroke) }
    }

    /// Enable or disable XInput for the whole process. No-op if unbound.
    pub fn enable(&self, enabled: bool) {
        match self.state().entry.enable {
            Some(f) => unsafe { f(i32::from(enabled)) },
            None => trace!("XInputEnable not bound; ignoring enable({enabled})"),
        }
    }
}

fn lookup(library: &dyn Library, symbol: Symbol) -> Option<RawProc> {
    let found = library.symbol(symbol);
    if found.is_some() {
        trace!("Found {symbol}.");
    } else {
        debug!("Could not find {symbol}.");
    }
    found
}

fn get_state_probe_order(probe: StateProbe) -> [Symbol; 2] {
    let enhanced = Symbol::Ordinal(GET_STATE_EX_ORDINAL);
    let documented = Symbol::Name(XINPUT_GET_STATE);
    match probe {
        StateProbe::EnhancedFirst => [enhanced, documented],
        StateProbe::DocumentedFirst => [documented, enhanced],
    }
}

/// The first get-state symbol that resolves under `probe`.
fn first_get_state(library: &dyn Library, probe: StateProbe) -> Option<(Symbol, RawProc)> {
    get_state_probe_order(probe)
        .into_iter()
        .find_map(|symbol| lookup(library, symbol).map(|p| (symbol, p)))
}

fn bind(library: &dyn Library, probe: StateProbe) -> (EntryPoints, BoundEntryPoints) {
    let get_state = first_get_state(library, probe);

    // SAFETY: each symbol is cast to the signature documented for that export.
    let entry = unsafe {
        EntryPoints {
            get_state: get_state.map(|(_, p)| transmute::<RawProc, GetStateFn>(p)),
            set_state: lookup(library, Symbol::Name(XINPUT_SET_STATE))
                .map(|p| transmute::<RawProc, SetStateFn>(p)),
            get_capabilities: lookup(library, Symbol::Name(XINPUT_GET_CAPABILITIES))
                .map(|p| transmute::<RawProc, GetCapabilitiesFn>(p)),
            get_battery_information: lookup(library, Symbol::Name(XINPUT_GET_BATTERY_INFORMATION))
                .map(|p| transmute::<RawProc, GetBatteryInformationFn>(p)),
            get_keystroke: lookup(library, Symbol::Name(XINPUT_GET_KEYSTROKE))
                .map(|p| transmute::<RawProc, GetKeystrokeFn>(p)),
            enable: lookup(library, Symbol::Name(XINPUT_ENABLE))
                .map(|p| transmute::<RawProc, EnableFn>(p)),
        }
    };

    let bound = BoundEntryPoints {
        get_state: get_state.map(|(symbol, _)| match symbol {
            Symbol::Ordinal(_) => GetStateVariant::Enhanced,
            Symbol::Name(_) => GetStateVariant::Documented,
        }),
        set_state: entry.set_state.is_some(),
        get_capabilities: entry.get_capabilities.is_some(),
        get_battery_information: entry.get_battery_information.is_some(),
        get_keystroke: entry.get_keystroke.is_some(),
        enable: entry.enable.is_some(),
    };

    (entry, bound)
}
