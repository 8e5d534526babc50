//! OS status codes returned across the bridge.
//!
//! Every operation returns the status code produced by the underlying XInput
//! call verbatim. The constants below are the Win32 values this crate itself
//! produces or that callers commonly branch on; any other nonzero value is an
//! OS-defined error and should be treated as opaque.

/// The call succeeded.
pub const ERROR_SUCCESS: u32 = 0;

/// A null buffer pointer was passed across the FFI boundary.
pub const ERROR_INVALID_PARAMETER: u32 = 87;

/// The caller-supplied buffer is smaller than the fixed size of the record.
///
/// Produced by this crate before any byte is written.
pub const ERROR_INSUFFICIENT_BUFFER: u32 = 122;

/// The module could not be found (used by the non-Windows loader).
pub const ERROR_MOD_NOT_FOUND: u32 = 126;

/// No controller in that slot, or no usable XInput entry point was bound.
///
/// The two cases are indistinguishable at the call-return level.
pub const ERROR_DEVICE_NOT_CONNECTED: u32 = 1167;

/// `XInputGetKeystroke` has no pending keystroke.
pub const ERROR_EMPTY: u32 = 4306;
