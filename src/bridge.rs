//! Marshaling layer.
//!
//! [`Bridge`] adapts caller-owned byte buffers to the fixed layouts in
//! [`snapshot`](crate::snapshot) and forwards everything else to a
//! [`Resolver`]. Every buffer operation follows the same contract:
//!
//! 1. Validate the buffer length. Too short → [`BridgeError::BufferTooSmall`],
//!    nothing written.
//! 2. Zero the leading `SIZE` bytes.
//! 3. Call the OS entry point (or get `ERROR_DEVICE_NOT_CONNECTED` if unbound).
//! 4. On success, encode the record into the zeroed region.
//!
//! The OS status is returned unchanged inside `Ok`. Bytes past `SIZE` are never touched.
//!
//! Player indices are `0..=3`; other values are forwarded and rejected by the OS.

use crate::buttons::{BatteryDeviceType, XINPUT_FLAG_GAMEPAD};
use crate::error::BridgeError;
use crate::raw::*;
use crate::resolver::{LibraryVersion, Resolver};
use crate::snapshot::*;
use crate::status::ERROR_SUCCESS;
use log::debug;

/// Number of XInput player slots.
pub const MAX_PLAYERS: u32 = 4;

/// Buffer-level operations over a shared resolver.
#[derive(Clone, Copy, Debug)]
pub struct Bridge<'r> {
    resolver: &'r Resolver,
}

impl<'r> Bridge<'r> {
    pub fn new(resolver: &'r Resolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &'r Resolver {
        self.resolver
    }

    /// Poll a controller into `out` ([`ControllerState`], 16 bytes).
    pub fn poll_state(&self, player_index: u32, out: &mut [u8]) -> Result<u32, BridgeError> {
        let region = ControllerState::zeroed_region(out)?;
        let mut raw = RawState::default();
        let status = self.resolver.get_state(player_index, &mut raw);
        if status == ERROR_SUCCESS {
            ControllerState::from(raw).write_fields(region);
        }
        Ok(status)
    }

    /// Typed variant of [`Self::poll_state`] for Rust callers.
    ///
    /// ### Errors
    /// The OS status when it is not `ERROR_SUCCESS`.
    pub fn read_state(&self, player_index: u32) -> Result<ControllerState, u32> {
        let mut raw = RawState::default();
        match self.resolver.get_state(player_index, &mut raw) {
            ERROR_SUCCESS => Ok(raw.into()),
            status => Err(status),
        }
    }

    /// Set motor speeds. Only the low 16 bits of each speed are used.
    pub fn set_vibration(&self, player_index: u32, left_motor: u32, right_motor: u32) -> u32 {
        let vibration = Vibration::from_wide(left_motor, right_motor);
        self.resolver.set_state(player_index, vibration)
    }

    /// Enable or disable XInput input processing for the whole process.
    pub fn set_enabled(&self, enabled: bool) {
        self.resolver.enable(enabled);
    }

    /// Query capabilities into `out` ([`Capabilities`], 20 bytes).
    ///
    /// `flags` is passed through (`XINPUT_FLAG_GAMEPAD` or 0).
    pub fn get_capabilities(
        &self,
        player_index: u32,
        flags: u32,
        out: &mut [u8],
    ) -> Result<u32, BridgeError> {
        let region = Capabilities::zeroed_region(out)?;
        let mut raw = RawCapabilities::default();
        let status = self.resolver.get_capabilities(player_index, flags, &mut raw);
        if status == ERROR_SUCCESS {
            Capabilities::from(raw).write_fields(region);
        }
        Ok(status)
    }

    /// Query battery state into `out` ([`BatteryInformation`], 2 bytes).
    ///
    /// `device_type` selects the gamepad (0) or headset (1).
    pub fn get_battery_information(
        &self,
        player_index: u32,
        device_type: u8,
        out: &mut [u8],
    ) -> Result<u32, BridgeError> {
        let region = BatteryInformation::zeroed_region(out)?;
        if BatteryDeviceType::from_native(device_type).is_none() {
            debug!("Forwarding unknown battery device type {device_type}");
        }
        let mut raw = RawBatteryInformation::default();
        let status = self
            .resolver
            .get_battery_information(player_index, device_type, &mut raw);
        if status == ERROR_SUCCESS {
            BatteryInformation::from(raw).write_fields(region);
        }
        Ok(status)
    }

    /// Read the next keystroke event into `out` ([`Keystroke`], 8 bytes).
    ///
    /// `ERROR_EMPTY` means no event was pending; the buffer is left zeroed.
    pub fn get_keystroke(&self, player_index: u32, out: &mut [u8]) -> Result<u32, BridgeError> {
        let region = Keystroke::zeroed_region(out)?;
        let mut raw = RawKeystroke::default();
        let status = self.resolver.get_keystroke(player_index, &mut raw);
        if status == ERROR_SUCCESS {
            Keystroke::from(raw).write_fields(region);
        }
        Ok(status)
    }

    /// Typed capabilities query. `gamepad_only` passes `XINPUT_FLAG_GAMEPAD`.
    ///
    /// ### Errors
    /// The OS status when it is not `ERROR_SUCCESS`.
    pub fn read_capabilities(
        &self,
        player_index: u32,
        gamepad_only: bool,
    ) -> Result<Capabilities, u32> {
        let flags = if gamepad_only { XINPUT_FLAG_GAMEPAD } else { 0 };
        let mut raw = RawCapabilities::default();
        match self.resolver.get_capabilities(player_index, flags, &mut raw) {
            ERROR_SUCCESS => Ok(raw.into()),
            status => Err(status),
        }
    }

    /// Typed battery query for the gamepad or its headset.
    ///
    /// ### Errors
    /// The OS status when it is not `ERROR_SUCCESS`.
    pub fn read_battery_information(
        &self,
        player_index: u32,
        device: BatteryDeviceType,
    ) -> Result<BatteryInformation, u32> {
        let mut raw = RawBatteryInformation::default();
        match self
            .resolver
            .get_battery_information(player_index, device as u8, &mut raw)
        {
            ERROR_SUCCESS => Ok(raw.into()),
            status => Err(status),
        }
    }

    pub fn loaded_library_version(&self) -> LibraryVersion {
        self.resolver.loaded_version()
    }

    pub fn is_guide_button_supported(&self) -> bool {
        self.resolver.guide_button_supported()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::UnavailableLoader;
    use crate::config::ResolverConfig;
    use crate::status::ERROR_DEVICE_NOT_CONNECTED;

    fn unavailable() -> Resolver {
        Resolver::new(Box::new(UnavailableLoader), ResolverConfig::default())
    }

    #[test]
    fn degraded_poll_zeroes_buffer() {
        let resolver = unavailable();
        let bridge = Bridge::new(&resolver);
        for player in 0..MAX_PLAYERS {
            let mut buf = [0xA5u8; ControllerState::SIZE];
            assert_eq!(
                bridge.poll_state(player, &mut buf).unwrap(),
                ERROR_DEVICE_NOT_CONNECTED
            );
            assert_eq!(buf, [0u8; ControllerState::SIZE]);
        }
        assert_eq!(bridge.loaded_library_version(), LibraryVersion::None);
        assert!(!bridge.is_guide_button_supported());
    }

    #[test]
    fn degraded_operations_report_not_connected() {
        let resolver = unavailable();
        let bridge = Bridge::new(&resolver);

        let mut caps = [0xFFu8; Capabilities::SIZE];
        let mut battery = [0xFFu8; BatteryInformation::SIZE];
        let mut key = [0xFFu8; Keystroke::SIZE];
        assert_eq!(bridge.get_capabilities(0, 1, &mut caps).unwrap(), ERROR_DEVICE_NOT_CONNECTED);
        assert_eq!(
            bridge.get_battery_information(0, 0, &mut battery).unwrap(),
            ERROR_DEVICE_NOT_CONNECTED
        );
        assert_eq!(bridge.get_keystroke(0, &mut key).unwrap(), ERROR_DEVICE_NOT_CONNECTED);
        assert!(caps.iter().chain(&battery).chain(&key).all(|&b| b == 0));

        assert_eq!(bridge.set_vibration(0, 0x1FFFF, 0), ERROR_DEVICE_NOT_CONNECTED);
        assert_eq!(bridge.read_state(2), Err(ERROR_DEVICE_NOT_CONNECTED));
        assert_eq!(bridge.read_capabilities(0, true), Err(ERROR_DEVICE_NOT_CONNECTED));
        assert_eq!(
            bridge.read_battery_information(0, BatteryDeviceType::Headset),
            Err(ERROR_DEVICE_NOT_CONNECTED)
        );
        bridge.set_enabled(false);
    }

    #[test]
    fn short_buffers_fail_before_resolution() {
        let resolver = unavailable();
        let bridge = Bridge::new(&resolver);

        let mut buf = [0x5Au8; 3];
        let err = bridge.poll_state(0, &mut buf).unwrap_err();
        assert!(matches!(err, BridgeError::BufferTooSmall { required: 16, actual: 3, .. }));
        assert_eq!(buf, [0x5A; 3]);
        assert!(!resolver.is_resolved());

        let mut one = [0x5Au8; 1];
        assert!(bridge.get_battery_information(0, 0, &mut one).is_err());
        assert!(bridge.get_capabilities(0, 0, &mut buf).is_err());
        assert!(bridge.get_keystroke(0, &mut buf).is_err());
        assert_eq!(one, [0x5A]);
    }
}
