//! Fixed-layout records written into caller-owned buffers.
//!
//! Each record here is a plain value with an explicit byte layout. The layout
//! is part of the bridge's ABI: managed callers allocate buffers of exactly
//! [`FixedLayout::SIZE`] bytes and decode the fields at the offsets documented
//! on each type. All multi-byte fields are little-endian.
//!
//! | Record                 | Size |
//! |------------------------|------|
//! | [`ControllerState`]    | 16   |
//! | [`Capabilities`]       | 20   |
//! | [`BatteryInformation`] | 2    |
//! | [`Keystroke`]          | 8    |
//!
//! Records are never retained by the bridge. Writing goes through
//! [`FixedLayout::encode`], which validates the buffer length before touching
//! a single byte.
//!
//! # Example
//! ```
//! use xinput_bridge::snapshot::{ControllerState, FixedLayout};
//!
//! let mut buf = [0xAAu8; ControllerState::SIZE];
//! let state = ControllerState { packet_number: 7, ..Default::default() };
//! state.encode(&mut buf).unwrap();
//! assert_eq!(ControllerState::decode(&buf).unwrap(), state);
//! ```

use crate::buttons::*;
use crate::error::BridgeError;
use crate::raw::*;
use serde::{Deserialize, Serialize};

/// A record with a fixed, documented byte layout.
pub trait FixedLayout: Sized {
    /// Record name used in error messages.
    const NAME: &'static str;
    /// Exact encoded size in bytes.
    const SIZE: usize;

    /// Write the fields into `out`, which is exactly [`Self::SIZE`] bytes.
    fn write_fields(&self, out: &mut [u8]);

    /// Read the fields from `bytes`, which is exactly [`Self::SIZE`] bytes.
    fn read_fields(bytes: &[u8]) -> Self;

    /// Borrow the leading [`Self::SIZE`] bytes of `buf`, or fail without writing.
    fn region(buf: &mut [u8]) -> Result<&mut [u8], BridgeError> {
        if buf.len() < Self::SIZE {
            return Err(BridgeError::BufferTooSmall {
                record: Self::NAME,
                required: Self::SIZE,
                actual: buf.len(),
            });
        }
        Ok(&mut buf[..Self::SIZE])
    }

    /// Like [`Self::region`], but the region is zero-filled first.
    fn zeroed_region(buf: &mut [u8]) -> Result<&mut [u8], BridgeError> {
        let region = Self::region(buf)?;
        region.fill(0);
        Ok(region)
    }

    /// Encode into the start of `buf`. Bytes past [`Self::SIZE`] are untouched.
    fn encode(&self, buf: &mut [u8]) -> Result<(), BridgeError> {
        let region = Self::region(buf)?;
        self.write_fields(region);
        Ok(())
    }

    /// Decode from the start of `buf`.
    fn decode(buf: &[u8]) -> Result<Self, BridgeError> {
        if buf.len() < Self::SIZE {
            return Err(BridgeError::BufferTooSmall {
                record: Self::NAME,
                required: Self::SIZE,
                actual: buf.len(),
            });
        }
        Ok(Self::read_fields(&buf[..Self::SIZE]))
    }
}

#[inline]
fn put_u16(out: &mut [u8], at: usize, v: u16) {
    out[at..at + 2].copy_from_slice(&v.to_le_bytes());
}

#[inline]
fn put_i16(out: &mut [u8], at: usize, v: i16) {
    out[at..at + 2].copy_from_slice(&v.to_le_bytes());
}

#[inline]
fn get_u16(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

#[inline]
fn get_i16(b: &[u8], at: usize) -> i16 {
    i16::from_le_bytes([b[at], b[at + 1]])
}

/// Buttons, triggers and sticks of one controller.
///
/// | Offset | Size | Field           |
/// |--------|------|-----------------|
/// | 0      | 2    | `buttons`       |
/// | 2      | 1    | `left_trigger`  |
/// | 3      | 1    | `right_trigger` |
/// | 4      | 2    | `thumb_lx`      |
/// | 6      | 2    | `thumb_ly`      |
/// | 8      | 2    | `thumb_rx`      |
/// | 10     | 2    | `thumb_ry`      |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gamepad {
    /// Button bitfield (see [`Button::mask`]).
    pub buttons: u16,
    /// `0..=255`.
    pub left_trigger: u8,
    /// `0..=255`.
    pub right_trigger: u8,
    /// Sticks: `-32768..=32767`, positive is right / up.
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

impl Gamepad {
    pub fn is_pressed(&self, button: Button) -> bool {
        self.buttons & button.mask() != 0
    }

    /// Iterate the buttons currently held.
    pub fn pressed(&self) -> impl Iterator<Item = Button> + '_ {
        Button::ALL.into_iter().filter(|b| self.is_pressed(*b))
    }

    /// Scale a thumbstick axis by `1/32768`: `-1.0..=0.99997`.
    #[inline]
    pub fn normalize_thumb(v: i16) -> f32 {
        f32::from(v) / 32768.0
    }

    /// Scale a trigger into `0.0..=1.0`.
    #[inline]
    pub fn normalize_trigger(v: u8) -> f32 {
        f32::from(v) / 255.0
    }

    /// Normalized sticks and triggers plus the d-pad direction.
    pub fn axes(&self) -> Axes {
        Axes {
            lx: Self::normalize_thumb(self.thumb_lx),
            ly: Self::normalize_thumb(self.thumb_ly),
            rx: Self::normalize_thumb(self.thumb_rx),
            ry: Self::normalize_thumb(self.thumb_ry),
            lt: Self::normalize_trigger(self.left_trigger),
            rt: Self::normalize_trigger(self.right_trigger),
            dpad: self.dpad(),
        }
    }

    pub fn dpad(&self) -> DpadDirection {
        DpadDirection::from_buttons(
            self.buttons & XINPUT_GAMEPAD_DPAD_UP != 0,
            self.buttons & XINPUT_GAMEPAD_DPAD_DOWN != 0,
            self.buttons & XINPUT_GAMEPAD_DPAD_LEFT != 0,
            self.buttons & XINPUT_GAMEPAD_DPAD_RIGHT != 0,
        )
    }

    /// Changes from `previous` to `self`.
    pub fn delta(&self, previous: &Gamepad) -> GamepadDelta {
        let (now, before) = (self.axes(), previous.axes());
        GamepadDelta {
            pressed: self.buttons & !previous.buttons,
            released: previous.buttons & !self.buttons,
            lx: now.lx - before.lx,
            ly: now.ly - before.ly,
            rx: now.rx - before.rx,
            ry: now.ry - before.ry,
            lt: now.lt - before.lt,
            rt: now.rt - before.rt,
        }
    }
}

/// Normalized view of a [`Gamepad`]. Not part of the byte layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Axes {
    pub lx: f32,
    pub ly: f32,
    pub rx: f32,
    pub ry: f32,
    pub lt: f32,
    pub rt: f32,
    pub dpad: DpadDirection,
}

/// What changed between two consecutive polls.
///
/// Axis deltas are `current - previous`: positive means right, up, or
/// trigger pressed further.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GamepadDelta {
    /// Buttons that went from released to held.
    pub pressed: u16,
    /// Buttons that went from held to released.
    pub released: u16,
    pub lx: f32,
    pub ly: f32,
    pub rx: f32,
    pub ry: f32,
    pub lt: f32,
    pub rt: f32,
}

impl GamepadDelta {
    pub fn is_pressed(&self, button: Button) -> bool {
        self.pressed & button.mask() != 0
    }

    pub fn is_released(&self, button: Button) -> bool {
        self.released & button.mask() != 0
    }

    /// No button edge and no axis movement.
    pub fn is_empty(&self) -> bool {
        self.pressed == 0
            && self.released == 0
            && [self.lx, self.ly, self.rx, self.ry, self.lt, self.rt]
                .iter()
                .all(|d| *d == 0.0)
    }
}

impl FixedLayout for Gamepad {
    const NAME: &'static str = "Gamepad";
    const SIZE: usize = 12;

    fn write_fields(&self, out: &mut [u8]) {
        put_u16(out, 0, self.buttons);
        out[2] = self.left_trigger;
        out[3] = self.right_trigger;
        put_i16(out, 4, self.thumb_lx);
        put_i16(out, 6, self.thumb_ly);
        put_i16(out, 8, self.thumb_rx);
        put_i16(out, 10, self.thumb_ry);
    }

    fn read_fields(b: &[u8]) -> Self {
        Self {
            buttons: get_u16(b, 0),
            left_trigger: b[2],
            right_trigger: b[3],
            thumb_lx: get_i16(b, 4),
            thumb_ly: get_i16(b, 6),
            thumb_rx: get_i16(b, 8),
            thumb_ry: get_i16(b, 10),
        }
    }
}

impl From<RawGamepad> for Gamepad {
    fn from(raw: RawGamepad) -> Self {
        Self {
            buttons: raw.buttons,
            left_trigger: raw.left_trigger,
            right_trigger: raw.right_trigger,
            thumb_lx: raw.thumb_lx,
            thumb_ly: raw.thumb_ly,
            thumb_rx: raw.thumb_rx,
            thumb_ry: raw.thumb_ry,
        }
    }
}

/// State snapshot of one controller (16 bytes).
///
/// | Offset | Size | Field           |
/// |--------|------|-----------------|
/// | 0      | 4    | `packet_number` |
/// | 4      | 12   | `gamepad`       |
///
/// Two polls returning the same `packet_number` mean the state did not change
/// in between; the absolute value carries no meaning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerState {
    pub packet_number: u32,
    pub gamepad: Gamepad,
}

impl ControllerState {
    /// True if this snapshot was taken after a state change relative to `previous`.
    pub fn changed_since(&self, previous: &ControllerState) -> bool {
        self.packet_number != previous.packet_number
    }

    /// Per-button and per-axis changes since `previous`.
    ///
    /// Returns an empty delta when the packet number did not move, without
    /// comparing the fields.
    pub fn delta(&self, previous: &ControllerState) -> GamepadDelta {
        if !self.changed_since(previous) {
            return GamepadDelta::default();
        }
        self.gamepad.delta(&previous.gamepad)
    }
}

impl FixedLayout for ControllerState {
    const NAME: &'static str = "ControllerState";
    const SIZE: usize = 16;

    fn write_fields(&self, out: &mut [u8]) {
        out[0..4].copy_from_slice(&self.packet_number.to_le_bytes());
        self.gamepad.write_fields(&mut out[4..16]);
    }

    fn read_fields(b: &[u8]) -> Self {
        Self {
            packet_number: u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            gamepad: Gamepad::read_fields(&b[4..16]),
        }
    }
}

impl From<RawState> for ControllerState {
    fn from(raw: RawState) -> Self {
        Self {
            packet_number: raw.packet_number,
            gamepad: raw.gamepad.into(),
        }
    }
}

/// Motor speeds (4 bytes): left (low frequency) at 0, right (high frequency) at 2.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vibration {
    pub left_motor: u16,
    pub right_motor: u16,
}

impl Vibration {
    pub fn new(left_motor: u16, right_motor: u16) -> Self {
        Self {
            left_motor,
            right_motor,
        }
    }

    /// Build from wider integers, keeping only the low 16 bits of each.
    ///
    /// Out-of-range speeds are never rejected; excess bits are discarded.
    pub fn from_wide(left_motor: u32, right_motor: u32) -> Self {
        Self {
            left_motor: (left_motor & 0xFFFF) as u16,
            right_motor: (right_motor & 0xFFFF) as u16,
        }
    }
}

impl FixedLayout for Vibration {
    const NAME: &'static str = "Vibration";
    const SIZE: usize = 4;

    fn write_fields(&self, out: &mut [u8]) {
        put_u16(out, 0, self.left_motor);
        put_u16(out, 2, self.right_motor);
    }

    fn read_fields(b: &[u8]) -> Self {
        Self {
            left_motor: get_u16(b, 0),
            right_motor: get_u16(b, 2),
        }
    }
}

impl From<Vibration> for RawVibration {
    fn from(v: Vibration) -> Self {
        Self {
            left_motor_speed: v.left_motor,
            right_motor_speed: v.right_motor,
        }
    }
}

impl From<RawVibration> for Vibration {
    fn from(raw: RawVibration) -> Self {
        Self::new(raw.left_motor_speed, raw.right_motor_speed)
    }
}

/// Device capabilities (20 bytes).
///
/// | Offset | Size | Field         |
/// |--------|------|---------------|
/// | 0      | 1    | `device_type` |
/// | 1      | 1    | `sub_type`    |
/// | 2      | 2    | `flags`       |
/// | 4      | 12   | `gamepad`     |
/// | 16     | 4    | `vibration`   |
///
/// `gamepad` and `vibration` report resolution: a nonzero field means the
/// control is supported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub device_type: u8,
    pub sub_type: u8,
    /// `XINPUT_CAPS_*` bits.
    pub flags: u16,
    pub gamepad: Gamepad,
    pub vibration: Vibration,
}

impl Capabilities {
    pub fn is_wireless(&self) -> bool {
        self.flags & XINPUT_CAPS_WIRELESS != 0
    }

    pub fn supports_voice(&self) -> bool {
        self.flags & XINPUT_CAPS_VOICE_SUPPORTED != 0
    }

    pub fn supports_force_feedback(&self) -> bool {
        self.flags & XINPUT_CAPS_FFB_SUPPORTED != 0
    }

    /// Plug-in modules such as the chatpad are supported.
    pub fn supports_plugin_modules(&self) -> bool {
        self.flags & XINPUT_CAPS_PMD_SUPPORTED != 0
    }

    /// The device lacks the menu navigation buttons (start, back, d-pad).
    pub fn lacks_navigation(&self) -> bool {
        self.flags & XINPUT_CAPS_NO_NAVIGATION != 0
    }
}

impl FixedLayout for Capabilities {
    const NAME: &'static str = "Capabilities";
    const SIZE: usize = 20;

    fn write_fields(&self, out: &mut [u8]) {
        out[0] = self.device_type;
        out[1] = self.sub_type;
        put_u16(out, 2, self.flags);
        self.gamepad.write_fields(&mut out[4..16]);
        self.vibration.write_fields(&mut out[16..20]);
    }

    fn read_fields(b: &[u8]) -> Self {
        Self {
            device_type: b[0],
            sub_type: b[1],
            flags: get_u16(b, 2),
            gamepad: Gamepad::read_fields(&b[4..16]),
            vibration: Vibration::read_fields(&b[16..20]),
        }
    }
}

impl From<RawCapabilities> for Capabilities {
    fn from(raw: RawCapabilities) -> Self {
        Self {
            device_type: raw.device_type,
            sub_type: raw.sub_type,
            flags: raw.flags,
            gamepad: raw.gamepad.into(),
            vibration: raw.vibration.into(),
        }
    }
}

/// Battery state (2 bytes): type at 0, level at 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryInformation {
    pub battery_type: u8,
    pub battery_level: u8,
}

impl BatteryInformation {
    pub fn kind(&self) -> BatteryType {
        BatteryType::from_native(self.battery_type)
    }

    pub fn level(&self) -> BatteryLevel {
        BatteryLevel::from_native(self.battery_level)
    }
}

impl FixedLayout for BatteryInformation {
    const NAME: &'static str = "BatteryInformation";
    const SIZE: usize = 2;

    fn write_fields(&self, out: &mut [u8]) {
        out[0] = self.battery_type;
        out[1] = self.battery_level;
    }

    fn read_fields(b: &[u8]) -> Self {
        Self {
            battery_type: b[0],
            battery_level: b[1],
        }
    }
}

impl From<RawBatteryInformation> for BatteryInformation {
    fn from(raw: RawBatteryInformation) -> Self {
        Self {
            battery_type: raw.battery_type,
            battery_level: raw.battery_level,
        }
    }
}

/// Keystroke event (8 bytes).
///
/// | Offset | Size | Field         |
/// |--------|------|---------------|
/// | 0      | 2    | `virtual_key` |
/// | 2      | 2    | `unicode`     |
/// | 4      | 2    | `flags`       |
/// | 6      | 1    | `user_index`  |
/// | 7      | 1    | `hid_code`    |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keystroke {
    /// `VK_PAD_*` code.
    pub virtual_key: u16,
    pub unicode: u16,
    /// `XINPUT_KEYSTROKE_*` bits.
    pub flags: u16,
    pub user_index: u8,
    pub hid_code: u8,
}

impl Keystroke {
    pub fn is_key_down(&self) -> bool {
        self.flags & XINPUT_KEYSTROKE_KEYDOWN != 0
    }

    pub fn is_key_up(&self) -> bool {
        self.flags & XINPUT_KEYSTROKE_KEYUP != 0
    }

    pub fn is_repeat(&self) -> bool {
        self.flags & XINPUT_KEYSTROKE_REPEAT != 0
    }
}

impl FixedLayout for Keystroke {
    const NAME: &'static str = "Keystroke";
    const SIZE: usize = 8;

    fn write_fields(&self, out: &mut [u8]) {
        put_u16(out, 0, self.virtual_key);
        put_u16(out, 2, self.unicode);
        put_u16(out, 4, self.flags);
        out[6] = self.user_index;
        out[7] = self.hid_code;
    }

    fn read_fields(b: &[u8]) -> Self {
        Self {
            virtual_key: get_u16(b, 0),
            unicode: get_u16(b, 2),
            flags: get_u16(b, 4),
            user_index: b[6],
            hid_code: b[7],
        }
    }
}

impl From<RawKeystroke> for Keystroke {
    fn from(raw: RawKeystroke) -> Self {
        Self {
            virtual_key: raw.virtual_key,
            unicode: raw.unicode,
            flags: raw.flags,
            user_index: raw.user_index,
            hid_code: raw.hid_code,
        }
    }
}
