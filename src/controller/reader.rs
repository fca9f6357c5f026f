//! # Gamepad Reader Module
//!
//! The [`DeviceReader`] seam and its Linux implementation on top of evdev.
//!
//! ## Controller Detection
//!
//! Any `/dev/input/event*` device advertising `BTN_SOUTH` is treated as a
//! gamepad. Devices are sorted by path so that indices are stable across runs
//! with the same set of controllers attached.
//!
//! ## Reading
//!
//! Instead of consuming the event stream, each read queries the kernel's current
//! key and absolute-axis state (`EVIOCGKEY` / `EVIOCGABS`). Both calls return
//! immediately, which gives the polling loop snapshot semantics.
//!
//! ## Axis Layout (xpad / Xbox layout)
//!
//! | Snapshot field | evdev code | Notes |
//! |----------------|------------|-------|
//! | `left_x` / `left_y` | ABS_X / ABS_Y | Y inverted |
//! | `right_x` / `right_y` | ABS_RX / ABS_RY | Y inverted |
//! | `left_trigger` | ABS_Z | scaled to 0-255 |
//! | `right_trigger` | ABS_RZ | scaled to 0-255 |
//! | D-Pad | ABS_HAT0X / ABS_HAT0Y or BTN_DPAD_* | folded into button bits |

use evdev::{AbsoluteAxisType, Device, Key};
use std::path::Path;
use tracing::{debug, info};

use super::snapshot::{buttons, GamepadSnapshot};
use crate::config::ControllerConfig;
use crate::error::{PadMapperError, Result};

/// Source of controller snapshots.
#[cfg_attr(test, mockall::automock)]
pub trait DeviceReader {
    /// Samples the controller at `device_index`.
    ///
    /// # Errors
    ///
    /// Any error means "no sample this tick". Callers treat it as transient.
    fn read(&mut self, device_index: u32) -> Result<GamepadSnapshot>;
}

/// Digital buttons and the snapshot bit they set.
const BUTTON_MAP: &[(Key, u16)] = &[
    (Key::BTN_SOUTH, buttons::A),
    (Key::BTN_EAST, buttons::B),
    (Key::BTN_WEST, buttons::X),
    (Key::BTN_NORTH, buttons::Y),
    (Key::BTN_TL, buttons::LEFT_SHOULDER),
    (Key::BTN_TR, buttons::RIGHT_SHOULDER),
    (Key::BTN_SELECT, buttons::BACK),
    (Key::BTN_START, buttons::START),
    (Key::BTN_THUMBL, buttons::LEFT_THUMB),
    (Key::BTN_THUMBR, buttons::RIGHT_THUMB),
    (Key::BTN_DPAD_UP, buttons::DPAD_UP),
    (Key::BTN_DPAD_DOWN, buttons::DPAD_DOWN),
    (Key::BTN_DPAD_LEFT, buttons::DPAD_LEFT),
    (Key::BTN_DPAD_RIGHT, buttons::DPAD_RIGHT),
];

/// One absolute axis sample together with the range the device reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisReading {
    pub value: i32,
    pub minimum: i32,
    pub maximum: i32,
}

impl AxisReading {
    fn offset_and_span(self) -> Option<(i64, i64)> {
        if self.maximum <= self.minimum {
            return None;
        }
        let value = self.value.clamp(self.minimum, self.maximum);
        Some((
            i64::from(value) - i64::from(self.minimum),
            i64::from(self.maximum) - i64::from(self.minimum),
        ))
    }

    /// Rescales the reading to the full `i16` range.
    ///
    /// A device reporting an empty range yields 0 (centered).
    ///
    /// ```
    /// use pad_mapper::controller::reader::AxisReading;
    ///
    /// let reading = AxisReading { value: 255, minimum: 0, maximum: 255 };
    /// assert_eq!(reading.to_stick(), i16::MAX);
    /// ```
    #[must_use]
    pub fn to_stick(self) -> i16 {
        match self.offset_and_span() {
            Some((offset, span)) => (offset * 65535 / span - 32768) as i16,
            None => 0,
        }
    }

    /// Rescales the reading to 0-255.
    #[must_use]
    pub fn to_trigger(self) -> u8 {
        match self.offset_and_span() {
            Some((offset, span)) => (offset * 255 / span) as u8,
            None => 0,
        }
    }
}

/// Builds a snapshot from key and axis lookups.
///
/// Separated from the ioctl calls so the normalization can be tested without
/// hardware.
pub fn build_snapshot(
    pressed: impl Fn(Key) -> bool,
    axis: impl Fn(AbsoluteAxisType) -> AxisReading,
) -> GamepadSnapshot {
    let mut mask = BUTTON_MAP
        .iter()
        .filter(|(key, _)| pressed(*key))
        .fold(0u16, |acc, (_, bit)| acc | bit);

    // Hat-based D-Pad (xpad reports the D-Pad as two axes)
    let hat_x = axis(AbsoluteAxisType::ABS_HAT0X).value;
    let hat_y = axis(AbsoluteAxisType::ABS_HAT0Y).value;
    if hat_x < 0 {
        mask |= buttons::DPAD_LEFT;
    } else if hat_x > 0 {
        mask |= buttons::DPAD_RIGHT;
    }
    if hat_y < 0 {
        mask |= buttons::DPAD_UP;
    } else if hat_y > 0 {
        mask |= buttons::DPAD_DOWN;
    }

    GamepadSnapshot {
        buttons: mask,
        left_trigger: axis(AbsoluteAxisType::ABS_Z).to_trigger(),
        right_trigger: axis(AbsoluteAxisType::ABS_RZ).to_trigger(),
        left_x: axis(AbsoluteAxisType::ABS_X).to_stick(),
        left_y: axis(AbsoluteAxisType::ABS_Y).to_stick().saturating_neg(),
        right_x: axis(AbsoluteAxisType::ABS_RX).to_stick(),
        right_y: axis(AbsoluteAxisType::ABS_RY).to_stick().saturating_neg(),
    }
}

/// Returns `true` if the device looks like a gamepad.
fn is_gamepad(device: &Device) -> bool {
    device
        .supported_keys()
        .map_or(false, |keys| keys.contains(Key::BTN_SOUTH))
}

struct Gamepad {
    device: Device,
    path: String,
}

/// Reads gamepads through the Linux evdev interface.
pub struct EvdevGamepadReader {
    gamepads: Vec<Gamepad>,
}

impl std::fmt::Debug for EvdevGamepadReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvdevGamepadReader")
            .field("paths", &self.paths())
            .finish_non_exhaustive()
    }
}

impl EvdevGamepadReader {
    /// Opens the configured device, or scans for gamepads when no path is set.
    ///
    /// # Errors
    ///
    /// - `ControllerNotFound`: no gamepad found on the system
    /// - `Io`: the configured device cannot be opened
    pub fn from_config(config: &ControllerConfig) -> Result<Self> {
        if config.device_path.is_empty() {
            Self::scan()
        } else {
            Self::open_path(&config.device_path)
        }
    }

    /// Detects every gamepad under `/dev/input`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pad_mapper::controller::reader::EvdevGamepadReader;
    ///
    /// let reader = EvdevGamepadReader::scan()?;
    /// println!("Gamepads: {:?}", reader.paths());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn scan() -> Result<Self> {
        let input_dir = Path::new("/dev/input");

        if !input_dir.exists() {
            return Err(PadMapperError::ControllerNotFound);
        }

        let mut entries: Vec<_> = std::fs::read_dir(input_dir)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // Sort entries for deterministic indices when multiple pads are connected
        entries.sort_by_key(|entry| entry.path());

        let mut gamepads = Vec::new();
        for entry in entries {
            let path = entry.path();

            let is_event_node = path
                .file_name()
                .map_or(false, |name| name.to_string_lossy().starts_with("event"));
            if !is_event_node {
                continue;
            }

            match Device::open(&path) {
                Ok(device) => {
                    if is_gamepad(&device) {
                        let path = path.to_string_lossy().to_string();
                        info!(
                            "Found gamepad #{} at {} ({})",
                            gamepads.len(),
                            path,
                            device.name().unwrap_or("unnamed")
                        );
                        gamepads.push(Gamepad { device, path });
                    }
                }
                Err(e) => {
                    // Permission denied or other errors - skip device
                    debug!("Could not open {}: {}", path.display(), e);
                }
            }
        }

        if gamepads.is_empty() {
            return Err(PadMapperError::ControllerNotFound);
        }

        Ok(Self { gamepads })
    }

    /// Opens a single device at a known path. It becomes index 0.
    pub fn open_path(path: &str) -> Result<Self> {
        let device = Device::open(path)?;
        if !is_gamepad(&device) {
            return Err(PadMapperError::ControllerNotFound);
        }
        info!("Opened gamepad at {}", path);
        Ok(Self {
            gamepads: vec![Gamepad {
                device,
                path: path.to_string(),
            }],
        })
    }

    /// Device paths in index order.
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        self.gamepads.iter().map(|g| g.path.as_str()).collect()
    }
}

impl DeviceReader for EvdevGamepadReader {
    fn read(&mut self, device_index: u32) -> Result<GamepadSnapshot> {
        let gamepad = self
            .gamepads
            .get_mut(device_index as usize)
            .ok_or(PadMapperError::DeviceNotConnected(device_index))?;

        let keys = gamepad
            .device
            .get_key_state()
            .map_err(|e| PadMapperError::DeviceRead(format!("{}: {}", gamepad.path, e)))?;
        let abs = gamepad
            .device
            .get_abs_state()
            .map_err(|e| PadMapperError::DeviceRead(format!("{}: {}", gamepad.path, e)))?;

        Ok(build_snapshot(
            |key| keys.contains(key),
            |axis| {
                let info = &abs[axis.0 as usize];
                AxisReading {
                    value: info.value,
                    minimum: info.minimum,
                    maximum: info.maximum,
                }
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const XPAD_STICK: (i32, i32) = (-32768, 32767);
    const XPAD_TRIGGER: (i32, i32) = (0, 255);
    const HAT: (i32, i32) = (-1, 1);

    /// Axis lookup backed by a map; unknown axes read as an empty range.
    fn axes(values: &[(AbsoluteAxisType, i32, (i32, i32))]) -> impl Fn(AbsoluteAxisType) -> AxisReading {
        let map: HashMap<u16, AxisReading> = values
            .iter()
            .map(|&(axis, value, (minimum, maximum))| {
                (
                    axis.0,
                    AxisReading {
                        value,
                        minimum,
                        maximum,
                    },
                )
            })
            .collect();
        move |axis| {
            map.get(&axis.0).copied().unwrap_or(AxisReading {
                value: 0,
                minimum: 0,
                maximum: 0,
            })
        }
    }

    // ==================== AxisReading Tests ====================

    #[test]
    fn test_stick_identity_on_xpad_range() {
        for value in [-32768, -1, 0, 1, 15000, 32767] {
            let reading = AxisReading {
                value,
                minimum: XPAD_STICK.0,
                maximum: XPAD_STICK.1,
            };
            assert_eq!(i32::from(reading.to_stick()), value);
        }
    }

    #[test]
    fn test_stick_rescales_byte_range() {
        let min = AxisReading { value: 0, minimum: 0, maximum: 255 };
        let max = AxisReading { value: 255, minimum: 0, maximum: 255 };
        let center = AxisReading { value: 128, minimum: 0, maximum: 255 };
        assert_eq!(min.to_stick(), i16::MIN);
        assert_eq!(max.to_stick(), i16::MAX);
        assert!(center.to_stick().abs() < 300);
    }

    #[test]
    fn test_stick_clamps_out_of_range_values() {
        let reading = AxisReading { value: 400, minimum: 0, maximum: 255 };
        assert_eq!(reading.to_stick(), i16::MAX);
    }

    #[test]
    fn test_empty_range_is_centered() {
        let reading = AxisReading { value: 7, minimum: 0, maximum: 0 };
        assert_eq!(reading.to_stick(), 0);
        assert_eq!(reading.to_trigger(), 0);
    }

    #[test]
    fn test_trigger_rescales_10_bit_range() {
        let full = AxisReading { value: 1023, minimum: 0, maximum: 1023 };
        let half = AxisReading { value: 512, minimum: 0, maximum: 1023 };
        assert_eq!(full.to_trigger(), 255);
        assert_eq!(half.to_trigger(), 127);
    }

    // ==================== Snapshot Tests ====================

    #[test]
    fn test_idle_snapshot() {
        let snapshot = build_snapshot(
            |_| false,
            axes(&[
                (AbsoluteAxisType::ABS_X, 0, XPAD_STICK),
                (AbsoluteAxisType::ABS_Y, 0, XPAD_STICK),
                (AbsoluteAxisType::ABS_RX, 0, XPAD_STICK),
                (AbsoluteAxisType::ABS_RY, 0, XPAD_STICK),
                (AbsoluteAxisType::ABS_Z, 0, XPAD_TRIGGER),
                (AbsoluteAxisType::ABS_RZ, 0, XPAD_TRIGGER),
            ]),
        );
        assert_eq!(snapshot, GamepadSnapshot::default());
    }

    #[test]
    fn test_buttons_fold_into_mask() {
        let snapshot = build_snapshot(
            |key| key == Key::BTN_SOUTH || key == Key::BTN_TR || key == Key::BTN_START,
            axes(&[]),
        );
        assert_eq!(
            snapshot.buttons,
            buttons::A | buttons::RIGHT_SHOULDER | buttons::START
        );
    }

    #[test]
    fn test_hat_dpad() {
        let snapshot = build_snapshot(
            |_| false,
            axes(&[
                (AbsoluteAxisType::ABS_HAT0X, 1, HAT),
                (AbsoluteAxisType::ABS_HAT0Y, -1, HAT),
            ]),
        );
        assert_eq!(snapshot.buttons, buttons::DPAD_RIGHT | buttons::DPAD_UP);
    }

    #[test]
    fn test_dpad_buttons() {
        let snapshot = build_snapshot(|key| key == Key::BTN_DPAD_LEFT, axes(&[]));
        assert_eq!(snapshot.buttons, buttons::DPAD_LEFT);
    }

    #[test]
    fn test_y_axes_are_inverted() {
        // evdev reports "stick up" as negative Y
        let snapshot = build_snapshot(
            |_| false,
            axes(&[
                (AbsoluteAxisType::ABS_Y, -20000, XPAD_STICK),
                (AbsoluteAxisType::ABS_RY, i32::from(i16::MIN), XPAD_STICK),
            ]),
        );
        assert_eq!(snapshot.left_y, 20000);
        assert_eq!(snapshot.right_y, i16::MAX);
    }

    #[test]
    fn test_triggers() {
        let snapshot = build_snapshot(
            |_| false,
            axes(&[
                (AbsoluteAxisType::ABS_Z, 10, XPAD_TRIGGER),
                (AbsoluteAxisType::ABS_RZ, 255, XPAD_TRIGGER),
            ]),
        );
        assert_eq!(snapshot.left_trigger, 10);
        assert_eq!(snapshot.right_trigger, 255);
    }

    #[test]
    fn test_open_path_nonexistent() {
        let result = EvdevGamepadReader::open_path("/dev/input/nonexistent_event_device");
        assert!(matches!(result, Err(PadMapperError::Io(_))));
    }

    // Integration test - only runs with real hardware
    #[test]
    #[ignore]
    fn test_read_with_real_hardware() {
        // This test requires a connected gamepad and read access to /dev/input
        let mut reader = EvdevGamepadReader::scan().expect("Gamepad not found");
        assert!(!reader.paths().is_empty());

        let snapshot = reader.read(0);
        assert!(snapshot.is_ok(), "Should read connected gamepad: {:?}", snapshot);
    }

    #[test]
    #[ignore]
    fn test_read_missing_index_with_real_hardware() {
        let mut reader = EvdevGamepadReader::scan().expect("Gamepad not found");
        let missing = reader.paths().len() as u32;
        assert!(matches!(
            reader.read(missing),
            Err(PadMapperError::DeviceNotConnected(index)) if index == missing
        ));
    }
}
