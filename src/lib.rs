//! xinput-bridge: native XInput bridge for managed runtimes.
//!
//! Exposes the Windows XInput gamepad API through a small C ABI (see [`ffi`]):
//! poll a controller into a caller-allocated buffer, set vibration, query
//! capabilities, battery and keystrokes, and toggle XInput globally.
//!
//! The interesting part is [`resolver`]: at first use it picks the best XInput
//! DLL present (1.4, 1.3 or 9.1.0), binds whichever entry points that DLL
//! exports (including the unnamed guide-aware get-state at ordinal 100), and
//! caches the outcome for the life of the process. When nothing can be bound,
//! every call degrades to "device not connected".
//!
//! # Layers
//! - [`ffi`]: exported functions and the process-wide [`Resolver`].
//! - [`bridge`]: length-checked marshaling into caller buffers.
//! - [`snapshot`]: fixed-layout records and their byte encoding.
//! - [`resolver`] / [`library`] / [`backends`]: DLL selection behind a loader seam.
//!
//! Rust callers can skip the C ABI and drive a [`Resolver`] directly:
//!
//! ```no_run
//! use xinput_bridge::{Bridge, Resolver, ResolverConfig};
//!
//! let resolver = Resolver::system(ResolverConfig::default());
//! let bridge = Bridge::new(&resolver);
//! match bridge.read_state(0) {
//!     Ok(state) => println!("buttons={:#06x}", state.gamepad.buttons),
//!     Err(status) => println!("not available: {status}"),
//! }
//! ```

pub mod backends;
pub mod bridge;
pub mod buttons;
pub mod config;
pub mod error;
pub mod ffi;
pub mod library;
pub mod raw;
pub mod resolver;
pub mod snapshot;
pub mod status;

pub use bridge::{Bridge, MAX_PLAYERS};
pub use config::ResolverConfig;
pub use error::BridgeError;
pub use resolver::{LibraryVersion, ResolutionReport, Resolver};
pub use snapshot::*;
