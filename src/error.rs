//! # Error Types
//!
//! Custom error types for pad-mapper using `thiserror`.

use thiserror::Error;

/// Main error type for pad-mapper
#[derive(Debug, Error)]
pub enum PadMapperError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No gamepad is available at the requested index
    #[error("No controller connected at index {0}")]
    DeviceNotConnected(u32),

    /// Querying the controller state failed (e.g. unplugged mid-session)
    #[error("Controller read failed: {0}")]
    DeviceRead(String),

    /// No gamepad found while scanning input devices
    #[error("No gamepad found under /dev/input")]
    ControllerNotFound,

    /// Delivering synthetic events failed
    #[error("Event emitter error: {0}")]
    Emitter(String),
}

/// Result type alias for pad-mapper
pub type Result<T> = std::result::Result<T, PadMapperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_not_connected_message() {
        let err = PadMapperError::DeviceNotConnected(2);
        assert_eq!(err.to_string(), "No controller connected at index 2");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PadMapperError = io.into();
        assert!(matches!(err, PadMapperError::Io(_)));
    }
}
