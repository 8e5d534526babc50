//! XInput bit masks and selector enums.
//!
//! Button masks match `wButtons` in the state snapshot. [`Button::Guide`] is
//! only ever reported when the enhanced (ordinal 100) get-state entry point was
//! bound; see [`Resolver::guide_button_supported`](crate::resolver::Resolver::guide_button_supported).

use serde::{Deserialize, Serialize};

pub const XINPUT_GAMEPAD_DPAD_UP: u16 = 0x0001;
pub const XINPUT_GAMEPAD_DPAD_DOWN: u16 = 0x0002;
pub const XINPUT_GAMEPAD_DPAD_LEFT: u16 = 0x0004;
pub const XINPUT_GAMEPAD_DPAD_RIGHT: u16 = 0x0008;
pub const XINPUT_GAMEPAD_START: u16 = 0x0010;
pub const XINPUT_GAMEPAD_BACK: u16 = 0x0020;
pub const XINPUT_GAMEPAD_LEFT_THUMB: u16 = 0x0040;
pub const XINPUT_GAMEPAD_RIGHT_THUMB: u16 = 0x0080;
pub const XINPUT_GAMEPAD_LEFT_SHOULDER: u16 = 0x0100;
pub const XINPUT_GAMEPAD_RIGHT_SHOULDER: u16 = 0x0200;
/// Not in `xinput.h`; set only by `XInputGetStateEx`.
pub const XINPUT_GAMEPAD_GUIDE: u16 = 0x0400;
pub const XINPUT_GAMEPAD_A: u16 = 0x1000;
pub const XINPUT_GAMEPAD_B: u16 = 0x2000;
pub const XINPUT_GAMEPAD_X: u16 = 0x4000;
pub const XINPUT_GAMEPAD_Y: u16 = 0x8000;

/// `dwFlags` for `XInputGetCapabilities`: restrict to gamepads.
pub const XINPUT_FLAG_GAMEPAD: u32 = 0x0000_0001;

/// `XINPUT_CAPABILITIES::Flags` bits.
pub const XINPUT_CAPS_FFB_SUPPORTED: u16 = 0x0001;
pub const XINPUT_CAPS_WIRELESS: u16 = 0x0002;
pub const XINPUT_CAPS_VOICE_SUPPORTED: u16 = 0x0004;
pub const XINPUT_CAPS_PMD_SUPPORTED: u16 = 0x0008;
pub const XINPUT_CAPS_NO_NAVIGATION: u16 = 0x0010;

/// `XINPUT_KEYSTROKE::Flags` bits.
pub const XINPUT_KEYSTROKE_KEYDOWN: u16 = 0x0001;
pub const XINPUT_KEYSTROKE_KEYUP: u16 = 0x0002;
pub const XINPUT_KEYSTROKE_REPEAT: u16 = 0x0004;

/// Digital buttons of an XInput gamepad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Start,
    Back,
    LeftThumb,
    RightThumb,
    LeftShoulder,
    RightShoulder,
    Guide,
    A,
    B,
    X,
    Y,
}

impl Button {
    /// Every button, in bit order.
    pub const ALL: [Button; 15] = [
        Button::DpadUp,
        Button::DpadDown,
        Button::DpadLeft,
        Button::DpadRight,
        Button::Start,
        Button::Back,
        Button::LeftThumb,
        Button::RightThumb,
        Button::LeftShoulder,
        Button::RightShoulder,
        Button::Guide,
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
    ];

    /// Bit mask of this button in `wButtons`.
    pub const fn mask(self) -> u16 {
        match self {
            Button::DpadUp => XINPUT_GAMEPAD_DPAD_UP,
            Button::DpadDown => XINPUT_GAMEPAD_DPAD_DOWN,
            Button::DpadLeft => XINPUT_GAMEPAD_DPAD_LEFT,
            Button::DpadRight => XINPUT_GAMEPAD_DPAD_RIGHT,
            Button::Start => XINPUT_GAMEPAD_START,
            Button::Back => XINPUT_GAMEPAD_BACK,
            Button::LeftThumb => XINPUT_GAMEPAD_LEFT_THUMB,
            Button::RightThumb => XINPUT_GAMEPAD_RIGHT_THUMB,
            Button::LeftShoulder => XINPUT_GAMEPAD_LEFT_SHOULDER,
            Button::RightShoulder => XINPUT_GAMEPAD_RIGHT_SHOULDER,
            Button::Guide => XINPUT_GAMEPAD_GUIDE,
            Button::A => XINPUT_GAMEPAD_A,
            Button::B => XINPUT_GAMEPAD_B,
            Button::X => XINPUT_GAMEPAD_X,
            Button::Y => XINPUT_GAMEPAD_Y,
        }
    }
}

/// Eight-way d-pad direction derived from the four d-pad buttons.
///
/// The discriminants are the values managed callers compare against; `Center`
/// is `-1` and the directions run clockwise from up-left.
#[repr(i8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DpadDirection {
    #[default]
    Center = -1,
    UpLeft = 0,
    Up = 1,
    UpRight = 2,
    Right = 3,
    DownRight = 4,
    Down = 5,
    DownLeft = 6,
    Left = 7,
}

impl DpadDirection {
    /// Opposing presses on one axis cancel out on that axis only, so
    /// up+down+left is `Left`.
    pub fn from_buttons(up: bool, down: bool, left: bool, right: bool) -> Self {
        let vertical = up != down;
        let horizontal = left != right;
        match (vertical && up, vertical && down, horizontal && left, horizontal && right) {
            (true, _, true, _) => Self::UpLeft,
            (true, _, _, true) => Self::UpRight,
            (true, _, _, _) => Self::Up,
            (_, true, true, _) => Self::DownLeft,
            (_, true, _, true) => Self::DownRight,
            (_, true, _, _) => Self::Down,
            (_, _, true, _) => Self::Left,
            (_, _, _, true) => Self::Right,
            _ => Self::Center,
        }
    }
}

/// Subdevice selector for `XInputGetBatteryInformation`.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatteryDeviceType {
    Gamepad = 0,
    Headset = 1,
}

impl BatteryDeviceType {
    /// Map the caller's integer selector. Unknown values are passed through
    /// to the OS unchanged, so this is only a convenience for Rust callers.
    pub fn from_native(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Gamepad),
            1 => Some(Self::Headset),
            _ => None,
        }
    }
}

/// `XINPUT_BATTERY_INFORMATION::BatteryType`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatteryType {
    Disconnected,
    Wired,
    Alkaline,
    Nimh,
    Unknown,
}

impl BatteryType {
    pub fn from_native(value: u8) -> Self {
        match value {
            0x00 => Self::Disconnected,
            0x01 => Self::Wired,
            0x02 => Self::Alkaline,
            0x03 => Self::Nimh,
            _ => Self::Unknown,
        }
    }
}

/// `XINPUT_BATTERY_INFORMATION::BatteryLevel`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BatteryLevel {
    Empty,
    Low,
    Medium,
    Full,
}

impl BatteryLevel {
    /// Levels above `Full` do not exist; they are clamped.
    pub fn from_native(value: u8) -> Self {
        match value {
            0x00 => Self::Empty,
            0x01 => Self::Low,
            0x02 => Self::Medium,
            _ => Self::Full,
        }
    }
}
