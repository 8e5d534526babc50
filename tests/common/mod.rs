//! Fake XInput exports shared by the integration tests.
//!
//! Calls are forwarded synchronously on the calling thread, so thread-locals
//! are enough to observe what reached the "OS".

#![allow(dead_code)]

use std::cell::Cell;
use xinput_bridge::buttons::*;
use xinput_bridge::raw::*;
use xinput_bridge::status::*;

/// Returned by the fakes for player indices outside `0..4`.
pub const ERROR_BAD_ARGUMENTS: u32 = 160;

thread_local! {
    pub static LAST_VIBRATION: Cell<Option<(u32, RawVibration)>> = const { Cell::new(None) };
    pub static LAST_ENABLE: Cell<Option<i32>> = const { Cell::new(None) };
    pub static LAST_BATTERY_DEVICE: Cell<Option<u8>> = const { Cell::new(None) };
    pub static LAST_CAPS_FLAGS: Cell<Option<u32>> = const { Cell::new(None) };
}

pub const PACKET: u32 = 42;

pub fn connected_pad() -> RawGamepad {
    RawGamepad {
        buttons: XINPUT_GAMEPAD_A | XINPUT_GAMEPAD_DPAD_LEFT,
        left_trigger: 10,
        right_trigger: 250,
        thumb_lx: -12000,
        thumb_ly: 3000,
        thumb_rx: i16::MAX,
        thumb_ry: i16::MIN,
    }
}

fn check_index(user_index: u32) -> Option<u32> {
    match user_index {
        0 => None,
        1..=3 => Some(ERROR_DEVICE_NOT_CONNECTED),
        _ => Some(ERROR_BAD_ARGUMENTS),
    }
}

/// Documented `XInputGetState`: only player 0 is connected.
pub unsafe extern "system" fn get_state(user_index: u32, state: *mut RawState) -> u32 {
    if let Some(status) = check_index(user_index) {
        return status;
    }
    *state = RawState {
        packet_number: PACKET,
        gamepad: connected_pad(),
    };
    ERROR_SUCCESS
}

/// Ordinal-100 variant: same pad with the guide button held, and it writes
/// the trailing reserved dword.
pub unsafe extern "system" fn get_state_ex(user_index: u32, state: *mut RawState) -> u32 {
    if let Some(status) = check_index(user_index) {
        return status;
    }
    let ex = state.cast::<RawStateEx>();
    let mut pad = connected_pad();
    pad.buttons |= XINPUT_GAMEPAD_GUIDE;
    *ex = RawStateEx {
        state: RawState {
            packet_number: PACKET + 1,
            gamepad: pad,
        },
        reserved: 0xDEAD_BEEF,
    };
    ERROR_SUCCESS
}

pub unsafe extern "system" fn set_state(user_index: u32, vibration: *mut RawVibration) -> u32 {
    if let Some(status) = check_index(user_index) {
        return status;
    }
    LAST_VIBRATION.with(|v| v.set(Some((user_index, *vibration))));
    ERROR_SUCCESS
}

pub unsafe extern "system" fn get_capabilities(
    user_index: u32,
    flags: u32,
    caps: *mut RawCapabilities,
) -> u32 {
    if let Some(status) = check_index(user_index) {
        return status;
    }
    LAST_CAPS_FLAGS.with(|f| f.set(Some(flags)));
    *caps = RawCapabilities {
        device_type: 0x01,
        sub_type: 0x01,
        flags: XINPUT_CAPS_VOICE_SUPPORTED,
        gamepad: RawGamepad {
            buttons: 0xF3FF,
            left_trigger: 0xFF,
            right_trigger: 0xFF,
            thumb_lx: -64,
            thumb_ly: -64,
            thumb_rx: -64,
            thumb_ry: -64,
        },
        vibration: RawVibration {
            left_motor_speed: 0xFF,
            right_motor_speed: 0xFF,
        },
    };
    ERROR_SUCCESS
}

pub unsafe extern "system" fn get_battery_information(
    user_index: u32,
    device_type: u8,
    info: *mut RawBatteryInformation,
) -> u32 {
    if let Some(status) = check_index(user_index) {
        return status;
    }
    LAST_BATTERY_DEVICE.with(|d| d.set(Some(device_type)));
    *info = match device_type {
        0 => RawBatteryInformation {
            battery_type: 0x02,
            battery_level: 0x01,
        },
        _ => RawBatteryInformation {
            battery_type: 0x00,
            battery_level: 0x00,
        },
    };
    ERROR_SUCCESS
}

/// Player 0 has one keystroke pending; player 1 has none.
pub unsafe extern "system" fn get_keystroke(
    user_index: u32,
    reserved: u32,
    keystroke: *mut RawKeystroke,
) -> u32 {
    if reserved != 0 {
        return ERROR_INVALID_PARAMETER;
    }
    match user_index {
        0 => {
            *keystroke = RawKeystroke {
                virtual_key: 0x5800,
                unicode: 0,
                flags: XINPUT_KEYSTROKE_KEYDOWN,
                user_index: 0,
                hid_code: 0,
            };
            ERROR_SUCCESS
        }
        1 => ERROR_EMPTY,
        2 | 3 => ERROR_DEVICE_NOT_CONNECTED,
        _ => ERROR_BAD_ARGUMENTS,
    }
}

pub unsafe extern "system" fn enable(enable: i32) {
    LAST_ENABLE.with(|e| e.set(Some(enable)));
}

pub fn last_vibration() -> Option<(u32, RawVibration)> {
    LAST_VIBRATION.with(|v| v.get())
}

pub fn last_enable() -> Option<i32> {
    LAST_ENABLE.with(|e| e.get())
}
