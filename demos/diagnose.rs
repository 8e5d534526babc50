use xinput_bridge::{Bridge, Resolver, ResolverConfig, MAX_PLAYERS};

fn main() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::new().filter_or(xinput_bridge::ffi::LOG_ENV, "debug"),
    )
    .try_init();

    let resolver = Resolver::system(ResolverConfig::from_env());
    println!("Config: {:?}", resolver.config());

    match serde_json::to_string_pretty(resolver.ensure_loaded()) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Could not serialize resolution report: {e}"),
    }

    let bridge = Bridge::new(&resolver);
    for player in 0..MAX_PLAYERS {
        match bridge.read_state(player) {
            Ok(state) => {
                let pressed: Vec<_> = state.gamepad.pressed().collect();
                println!(
                    "player {player}: packet={} pressed={pressed:?} axes={:?}",
                    state.packet_number,
                    state.gamepad.axes()
                );
            }
            Err(status) => println!("player {player}: status {status}"),
        }
    }
}
