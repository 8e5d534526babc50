//! C ABI surface of the native artifact.
//!
//! These are the functions the managed caller binds to. All of them share one
//! process-wide [`Resolver`], created on the first call together with the
//! stderr logger; resolution itself still happens lazily on first use.
//!
//! # Conventions
//! - Return values are Win32 status codes as `i32`: `0` success, `1167` device
//!   not connected, anything else OS-defined and opaque.
//! - Output buffers are `(pointer, length)` pairs and must be at least the
//!   record size (see [`xinput_record_size`]): 16, 20, 2 and 8 bytes for state,
//!   capabilities, battery and keystroke. A shorter buffer yields
//!   `ERROR_INSUFFICIENT_BUFFER` (122) and a null pointer
//!   `ERROR_INVALID_PARAMETER` (87); in both cases nothing is written.
//! - Booleans are `i32`, nonzero meaning true.
//!
//! # Environment
//! - `XINPUT_BRIDGE_LOG`: `env_logger` filter, default `warn`.
//! - `XINPUT_BRIDGE_CONFIG`: optional TOML file, see [`ResolverConfig`].

use crate::bridge::Bridge;
use crate::config::ResolverConfig;
use crate::error::BridgeError;
use crate::resolver::Resolver;
use crate::snapshot::*;
use once_cell::sync::OnceCell;
use std::slice;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "XINPUT_BRIDGE_LOG";

/// Record selectors for [`xinput_record_size`].
pub const RECORD_STATE: i32 = 0;
pub const RECORD_CAPABILITIES: i32 = 1;
pub const RECORD_BATTERY_INFORMATION: i32 = 2;
pub const RECORD_KEYSTROKE: i32 = 3;

static RESOLVER: OnceCell<Resolver> = OnceCell::new();

/// The process-wide resolver used by every exported function.
pub fn shared() -> &'static Resolver {
    RESOLVER.get_or_init(|| {
        init_logging();
        Resolver::system(ResolverConfig::from_env())
    })
}

fn init_logging() {
    let env = env_logger::Env::new().filter_or(LOG_ENV, "warn");
    // The host may already have installed a logger.
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn bridge() -> Bridge<'static> {
    Bridge::new(shared())
}

/// Map a bridge result to the integer returned over the ABI.
fn to_status(result: Result<u32, BridgeError>) -> i32 {
    match result {
        Ok(status) => status as i32,
        Err(e) => {
            log::debug!("{e}");
            e.status() as i32
        }
    }
}

/// Borrow a caller buffer.
///
/// # Safety
/// `buffer` must be null or valid for writes of `len` bytes for the duration of the call.
unsafe fn buffer<'a>(buffer: *mut u8, len: usize) -> Result<&'a mut [u8], BridgeError> {
    if buffer.is_null() {
        return Err(BridgeError::NullBuffer);
    }
    Ok(slice::from_raw_parts_mut(buffer, len))
}

/// Poll `player_index` into a 16-byte [`ControllerState`] buffer.
///
/// # Safety
/// `out` must be null or valid for writes of `len` bytes.
#[no_mangle]
pub unsafe extern "system" fn xinput_poll_state(player_index: i32, out: *mut u8, len: usize) -> i32 {
    to_status(buffer(out, len).and_then(|out| bridge().poll_state(player_index as u32, out)))
}

/// Set both motor speeds. Only the low 16 bits of each value are used.
#[no_mangle]
pub extern "system" fn xinput_set_vibration(
    player_index: i32,
    left_motor: i32,
    right_motor: i32,
) -> i32 {
    bridge().set_vibration(player_index as u32, left_motor as u32, right_motor as u32) as i32
}

/// Globally enable (nonzero) or disable (zero) XInput for this process.
#[no_mangle]
pub extern "system" fn xinput_set_enabled(enabled: i32) {
    bridge().set_enabled(enabled != 0);
}

/// Query capabilities into a 20-byte [`Capabilities`] buffer.
///
/// # Safety
/// `out` must be null or valid for writes of `len` bytes.
#[no_mangle]
pub unsafe extern "system" fn xinput_get_capabilities(
    player_index: i32,
    flags: i32,
    out: *mut u8,
    len: usize,
) -> i32 {
    to_status(
        buffer(out, len)
            .and_then(|out| bridge().get_capabilities(player_index as u32, flags as u32, out)),
    )
}

/// Query battery state into a 2-byte [`BatteryInformation`] buffer.
///
/// # Safety
/// `out` must be null or valid for writes of `len` bytes.
#[no_mangle]
pub unsafe extern "system" fn xinput_get_battery_information(
    player_index: i32,
    device_type: i32,
    out: *mut u8,
    len: usize,
) -> i32 {
    to_status(buffer(out, len).and_then(|out| {
        bridge().get_battery_information(player_index as u32, device_type as u8, out)
    }))
}

/// Read the next keystroke into an 8-byte [`Keystroke`] buffer.
///
/// # Safety
/// `out` must be null or valid for writes of `len` bytes.
#[no_mangle]
pub unsafe extern "system" fn xinput_get_keystroke(player_index: i32, out: *mut u8, len: usize) -> i32 {
    to_status(buffer(out, len).and_then(|out| bridge().get_keystroke(player_index as u32, out)))
}

/// Loaded library: 0 none, 1 = 1.4, 2 = 1.3, 3 = 9.1.0.
#[no_mangle]
pub extern "system" fn xinput_loaded_library_version() -> i32 {
    bridge().loaded_library_version() as i32
}

/// 1 if the guide-aware get-state entry point is bound, else 0.
#[no_mangle]
pub extern "system" fn xinput_is_guide_button_supported() -> i32 {
    i32::from(bridge().is_guide_button_supported())
}

/// Required buffer size for a record selector, or -1 for an unknown selector.
#[no_mangle]
pub extern "system" fn xinput_record_size(record: i32) -> i32 {
    let size = match record {
        RECORD_STATE => ControllerState::SIZE,
        RECORD_CAPABILITIES => Capabilities::SIZE,
        RECORD_BATTERY_INFORMATION => BatteryInformation::SIZE,
        RECORD_KEYSTROKE => Keystroke::SIZE,
        _ => return -1,
    };
    size as i32
}
