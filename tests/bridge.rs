mod common;

use xinput_bridge::backends::virtual_library::{VirtualLibrary, VirtualLoader};
use xinput_bridge::buttons::*;
use xinput_bridge::config::ResolverConfig;
use xinput_bridge::status::*;
use xinput_bridge::*;

fn resolver_with(library: VirtualLibrary) -> Resolver {
    let loader = VirtualLoader::new().with_library("xinput1_4.dll", library);
    Resolver::new(Box::new(loader), ResolverConfig::default())
}

fn documented() -> Resolver {
    resolver_with(
        VirtualLibrary::new()
            .with_get_state(common::get_state)
            .with_set_state(common::set_state)
            .with_get_capabilities(common::get_capabilities)
            .with_get_battery_information(common::get_battery_information)
            .with_get_keystroke(common::get_keystroke)
            .with_enable(common::enable),
    )
}

#[test]
fn poll_writes_little_endian_state() {
    let resolver = documented();
    let bridge = Bridge::new(&resolver);

    let mut buf = [0xCCu8; ControllerState::SIZE];
    assert_eq!(bridge.poll_state(0, &mut buf).unwrap(), ERROR_SUCCESS);

    let mask = (XINPUT_GAMEPAD_A | XINPUT_GAMEPAD_DPAD_LEFT).to_le_bytes();
    let mut expected = Vec::new();
    expected.extend_from_slice(&common::PACKET.to_le_bytes());
    expected.extend_from_slice(&mask);
    expected.extend_from_slice(&[10, 250]);
    expected.extend_from_slice(&(-12000i16).to_le_bytes());
    expected.extend_from_slice(&3000i16.to_le_bytes());
    expected.extend_from_slice(&i16::MAX.to_le_bytes());
    expected.extend_from_slice(&i16::MIN.to_le_bytes());
    assert_eq!(buf.as_slice(), expected.as_slice());

    let state = ControllerState::decode(&buf).unwrap();
    assert_eq!(state, bridge.read_state(0).unwrap());
    assert_eq!(state.gamepad.dpad(), buttons::DpadDirection::Left);
    assert!(!state.gamepad.is_pressed(buttons::Button::Guide));
}

#[test]
fn poll_with_guide_aware_entry_point() {
    let resolver = resolver_with(VirtualLibrary::new().with_get_state_ex(common::get_state_ex));
    let bridge = Bridge::new(&resolver);

    let mut buf = [0u8; ControllerState::SIZE];
    assert_eq!(bridge.poll_state(0, &mut buf).unwrap(), ERROR_SUCCESS);
    let state = ControllerState::decode(&buf).unwrap();
    assert_eq!(state.packet_number, common::PACKET + 1);
    assert!(state.gamepad.is_pressed(buttons::Button::Guide));
    assert!(bridge.is_guide_button_supported());
    assert_eq!(bridge.loaded_library_version(), LibraryVersion::V1_4);
}

#[test]
fn longer_buffers_only_touch_the_record_prefix() {
    let resolver = documented();
    let bridge = Bridge::new(&resolver);

    let mut buf = [0xEEu8; 24];
    assert_eq!(bridge.poll_state(1, &mut buf).unwrap(), ERROR_DEVICE_NOT_CONNECTED);
    assert_eq!(&buf[..16], &[0u8; 16]);
    assert_eq!(&buf[16..], &[0xEE; 8]);
}

#[test]
fn os_status_is_returned_verbatim() {
    let resolver = documented();
    let bridge = Bridge::new(&resolver);

    let mut buf = [0xFFu8; ControllerState::SIZE];
    assert_eq!(
        bridge.poll_state(4, &mut buf).unwrap(),
        common::ERROR_BAD_ARGUMENTS
    );
    assert_eq!(buf, [0u8; ControllerState::SIZE]);
    assert_eq!(bridge.read_state(3), Err(ERROR_DEVICE_NOT_CONNECTED));
    assert_eq!(bridge.set_vibration(7, 0, 0), common::ERROR_BAD_ARGUMENTS);
}

#[test]
fn vibration_uses_low_sixteen_bits() {
    let resolver = documented();
    let bridge = Bridge::new(&resolver);

    assert_eq!(bridge.set_vibration(0, 0x1FFFF, 0x0001_8000), ERROR_SUCCESS);
    let (index, vibration) = common::last_vibration().unwrap();
    assert_eq!(index, 0);
    assert_eq!(vibration.left_motor_speed, 0xFFFF);
    assert_eq!(vibration.right_motor_speed, 0x8000);
}

#[test]
fn capabilities_are_marshaled() {
    let resolver = documented();
    let bridge = Bridge::new(&resolver);

    let mut buf = [0xAAu8; Capabilities::SIZE];
    assert_eq!(
        bridge
            .get_capabilities(0, XINPUT_FLAG_GAMEPAD, &mut buf)
            .unwrap(),
        ERROR_SUCCESS
    );
    assert_eq!(
        common::LAST_CAPS_FLAGS.with(|f| f.get()),
        Some(XINPUT_FLAG_GAMEPAD)
    );

    assert_eq!(&buf[..4], &[0x01, 0x01, 0x04, 0x00]);
    let caps = Capabilities::decode(&buf).unwrap();
    assert!(caps.supports_voice());
    assert!(!caps.is_wireless());
    assert_eq!(caps.gamepad.buttons, 0xF3FF);
    assert_eq!(caps.gamepad.thumb_lx, -64);
    assert_eq!(caps.vibration, Vibration::new(0xFF, 0xFF));
}

#[test]
fn battery_device_type_is_forwarded() {
    let resolver = documented();
    let bridge = Bridge::new(&resolver);

    let mut buf = [0xAAu8; BatteryInformation::SIZE];
    assert_eq!(
        bridge.get_battery_information(0, 0, &mut buf).unwrap(),
        ERROR_SUCCESS
    );
    assert_eq!(buf, [0x02, 0x01]);
    let info = BatteryInformation::decode(&buf).unwrap();
    assert_eq!(info.kind(), BatteryType::Alkaline);
    assert_eq!(info.level(), BatteryLevel::Low);

    assert_eq!(
        bridge.get_battery_information(0, 1, &mut buf).unwrap(),
        ERROR_SUCCESS
    );
    assert_eq!(common::LAST_BATTERY_DEVICE.with(|d| d.get()), Some(1));
    assert_eq!(buf, [0x00, 0x00]);
}

#[test]
fn keystrokes_and_empty_queue() {
    let resolver = documented();
    let bridge = Bridge::new(&resolver);

    let mut buf = [0x11u8; Keystroke::SIZE];
    assert_eq!(bridge.get_keystroke(0, &mut buf).unwrap(), ERROR_SUCCESS);
    let key = Keystroke::decode(&buf).unwrap();
    assert_eq!(key.virtual_key, 0x5800);
    assert!(key.is_key_down());
    assert!(!key.is_repeat());

    let mut buf = [0x11u8; Keystroke::SIZE];
    assert_eq!(bridge.get_keystroke(1, &mut buf).unwrap(), ERROR_EMPTY);
    assert_eq!(buf, [0u8; Keystroke::SIZE]);
}

#[test]
fn enable_is_forwarded() {
    let resolver = documented();
    let bridge = Bridge::new(&resolver);

    bridge.set_enabled(false);
    assert_eq!(common::last_enable(), Some(0));
    bridge.set_enabled(true);
    assert_eq!(common::last_enable(), Some(1));
}

#[test]
fn short_buffer_is_rejected_even_when_loaded() {
    let resolver = documented();
    let bridge = Bridge::new(&resolver);
    let _ = resolver.ensure_loaded();

    let mut buf = [0x5Au8; 15];
    let err = bridge.poll_state(0, &mut buf).unwrap_err();
    assert_eq!(err.status(), ERROR_INSUFFICIENT_BUFFER);
    assert_eq!(buf, [0x5A; 15]);
}

#[test]
fn typed_queries_forward_selectors() {
    let resolver = documented();
    let bridge = Bridge::new(&resolver);

    let caps = bridge.read_capabilities(0, true).unwrap();
    assert_eq!(
        common::LAST_CAPS_FLAGS.with(|f| f.get()),
        Some(XINPUT_FLAG_GAMEPAD)
    );
    assert!(caps.supports_voice() && !caps.supports_plugin_modules());
    bridge.read_capabilities(0, false).unwrap();
    assert_eq!(common::LAST_CAPS_FLAGS.with(|f| f.get()), Some(0));

    let info = bridge
        .read_battery_information(0, BatteryDeviceType::Gamepad)
        .unwrap();
    assert_eq!(info.kind(), BatteryType::Alkaline);
    bridge
        .read_battery_information(0, BatteryDeviceType::Headset)
        .unwrap();
    assert_eq!(common::LAST_BATTERY_DEVICE.with(|d| d.get()), Some(1));
    assert_eq!(
        bridge.read_battery_information(2, BatteryDeviceType::Gamepad),
        Err(ERROR_DEVICE_NOT_CONNECTED)
    );
}

#[test]
fn consecutive_polls_yield_button_edges() {
    let resolver = resolver_with(VirtualLibrary::new().with_get_state_ex(common::get_state_ex));
    let bridge = Bridge::new(&resolver);

    let idle = ControllerState::default();
    let state = bridge.read_state(0).unwrap();
    let delta = state.delta(&idle);
    assert!(delta.is_pressed(buttons::Button::Guide));
    assert!(delta.is_pressed(buttons::Button::A));
    assert_eq!(state.gamepad.axes().rt, 250.0 / 255.0);

    // The fake reports the same packet again: no change.
    assert!(bridge.read_state(0).unwrap().delta(&state).is_empty());
}
