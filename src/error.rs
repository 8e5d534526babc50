//! Error types for the bridge.
//!
//! OS call failures are *not* errors here: they are status codes passed through
//! unchanged. [`BridgeError`] only covers caller contract violations detected
//! before anything is written, plus configuration problems.

use crate::status;
use thiserror::Error;

/// Failure detected by the bridge itself.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The caller-supplied buffer cannot hold the fixed-size record.
    #[error("buffer too small for {record}: need {required} bytes, got {actual}")]
    BufferTooSmall {
        /// Name of the record being written (e.g. `"ControllerState"`).
        record: &'static str,
        /// Fixed size of the record.
        required: usize,
        /// Length of the buffer that was supplied.
        actual: usize,
    },

    /// A null buffer pointer was passed across the FFI boundary.
    #[error("null buffer pointer")]
    NullBuffer,

    /// The resolver configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        /// Path that was read.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The resolver configuration file is not valid TOML for [`ResolverConfig`](crate::config::ResolverConfig).
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl BridgeError {
    /// Status code reported to FFI callers for this error.
    pub fn status(&self) -> u32 {
        match self {
            BridgeError::BufferTooSmall { .. } => status::ERROR_INSUFFICIENT_BUFFER,
            BridgeError::NullBuffer
            | BridgeError::ConfigIo { .. }
            | BridgeError::ConfigParse(_) => status::ERROR_INVALID_PARAMETER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_too_small_maps_to_insufficient_buffer() {
        let err = BridgeError::BufferTooSmall {
            record: "ControllerState",
            required: 16,
            actual: 4,
        };
        assert_eq!(err.status(), status::ERROR_INSUFFICIENT_BUFFER);
        assert_eq!(
            err.to_string(),
            "buffer too small for ControllerState: need 16 bytes, got 4"
        );
    }

    #[test]
    fn null_buffer_maps_to_invalid_parameter() {
        assert_eq!(BridgeError::NullBuffer.status(), status::ERROR_INVALID_PARAMETER);
    }
}
