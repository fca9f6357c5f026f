//! # Controller Module
//!
//! Gamepad input handling.
//!
//! This module handles:
//! - The [`GamepadSnapshot`](snapshot::GamepadSnapshot) data model
//! - The [`DeviceReader`](reader::DeviceReader) seam the polling loop samples through
//! - Gamepad detection and state queries via evdev

pub mod reader;
pub mod snapshot;

pub use reader::{DeviceReader, EvdevGamepadReader};
pub use snapshot::GamepadSnapshot;
