//! Resolver configuration.
//!
//! The defaults reproduce the shipping behavior: prefer the newest XInput DLL
//! and probe the guide-capable entry point first. A TOML file can override
//! either policy:
//!
//! ```toml
//! # Try xinput1_3.dll before xinput1_4.dll.
//! preference = "legacy"
//! # Bind XInputGetState by name before trying ordinal 100.
//! state-probe = "documented-first"
//! ```
//!
//! The FFI entry points read the file named by `XINPUT_BRIDGE_CONFIG` once,
//! when the shared resolver is created.

use crate::error::BridgeError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_ENV: &str = "XINPUT_BRIDGE_CONFIG";

/// Order in which candidate DLLs are tried.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreferenceOrder {
    /// 1.4, then 1.3, then 9.1.0.
    #[default]
    NewestFirst,
    /// 1.3, then 1.4, then 9.1.0.
    Legacy,
}

/// Which get-state export is tried first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateProbe {
    /// Ordinal 100 (`XInputGetStateEx`, reports the guide button), then `XInputGetState`.
    #[default]
    EnhancedFirst,
    /// `XInputGetState`, then ordinal 100.
    DocumentedFirst,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ResolverConfig {
    pub preference: PreferenceOrder,
    pub state_probe: StateProbe,
}

impl ResolverConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, BridgeError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BridgeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| BridgeError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load from [`CONFIG_ENV`] if set.
    ///
    /// Never fails: a missing variable yields the defaults, and an unreadable
    /// or invalid file is logged and also yields the defaults.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::from_path(&path) {
            Ok(config) => {
                debug!("Loaded resolver config from {}: {config:?}", Path::new(&path).display());
                config
            }
            Err(e) => {
                warn!("Ignoring {CONFIG_ENV}: {e}");
                Self::default()
            }
        }
    }
}
