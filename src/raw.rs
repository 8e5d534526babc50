//! C layouts and entry-point signatures of the XInput DLLs.
//!
//! These mirror `XINPUT_*` from `xinput.h` field for field. They are only ever
//! handed to the OS entry points; callers never see them; the public records
//! live in [`snapshot`](crate::snapshot) and are serialized explicitly.

/// `XINPUT_GAMEPAD`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawGamepad {
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

/// `XINPUT_STATE`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawState {
    pub packet_number: u32,
    pub gamepad: RawGamepad,
}

/// `XINPUT_STATE` as written by the ordinal-100 entry point.
///
/// The undocumented variant is commonly declared with a trailing reserved
/// dword; the bridge always passes this larger buffer so either entry point
/// can write into it.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawStateEx {
    pub state: RawState,
    pub reserved: u32,
}

/// `XINPUT_VIBRATION`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawVibration {
    pub left_motor_speed: u16,
    pub right_motor_speed: u16,
}

/// `XINPUT_CAPABILITIES`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawCapabilities {
    pub device_type: u8,
    pub sub_type: u8,
    pub flags: u16,
    pub gamepad: RawGamepad,
    pub vibration: RawVibration,
}

/// `XINPUT_BATTERY_INFORMATION`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawBatteryInformation {
    pub battery_type: u8,
    pub battery_level: u8,
}

/// `XINPUT_KEYSTROKE`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawKeystroke {
    pub virtual_key: u16,
    pub unicode: u16,
    pub flags: u16,
    pub user_index: u8,
    pub hid_code: u8,
}

/// `XInputGetState` and the ordinal-100 `XInputGetStateEx`.
pub type GetStateFn = unsafe extern "system" fn(user_index: u32, state: *mut RawState) -> u32;

/// `XInputSetState`.
pub type SetStateFn =
    unsafe extern "system" fn(user_index: u32, vibration: *mut RawVibration) -> u32;

/// `XInputGetCapabilities`.
pub type GetCapabilitiesFn = unsafe extern "system" fn(
    user_index: u32,
    flags: u32,
    capabilities: *mut RawCapabilities,
) -> u32;

/// `XInputGetBatteryInformation`.
pub type GetBatteryInformationFn = unsafe extern "system" fn(
    user_index: u32,
    device_type: u8,
    information: *mut RawBatteryInformation,
) -> u32;

/// `XInputGetKeystroke`.
pub type GetKeystrokeFn =
    unsafe extern "system" fn(user_index: u32, reserved: u32, keystroke: *mut RawKeystroke) -> u32;

/// `XInputEnable`.
pub type EnableFn = unsafe extern "system" fn(enable: i32);

// Layouts must match the SDK headers exactly.
#[cfg(target_os = "windows")]
const _: () = {
    use std::mem::size_of;
    use windows_sys::Win32::UI::Input::XboxController::*;

    assert!(size_of::<RawGamepad>() == size_of::<XINPUT_GAMEPAD>());
    assert!(size_of::<RawState>() == size_of::<XINPUT_STATE>());
    assert!(size_of::<RawVibration>() == size_of::<XINPUT_VIBRATION>());
    assert!(size_of::<RawCapabilities>() == size_of::<XINPUT_CAPABILITIES>());
    assert!(size_of::<RawBatteryInformation>() == size_of::<XINPUT_BATTERY_INFORMATION>());
    assert!(size_of::<RawKeystroke>() == size_of::<XINPUT_KEYSTROKE>());
};
