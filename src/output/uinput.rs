//! # uinput Emitter Module
//!
//! Creates a virtual keyboard + mouse through `/dev/uinput` and writes
//! synthetic events to it.
//!
//! ## Event Translation
//!
//! | Synthetic event | evdev events |
//! |-----------------|--------------|
//! | KeyDown / KeyUp | EV_KEY KEY_*, value 1 / 0 |
//! | MouseButtonDown / Up | EV_KEY BTN_LEFT / BTN_RIGHT / BTN_MIDDLE, value 1 / 0 |
//! | MouseWheel | EV_REL REL_WHEEL, value in notches (120 units = 1 notch) |
//! | MouseMove | EV_REL REL_X and/or REL_Y |
//!
//! Every batch is terminated with a single `SYN_REPORT`, so the events of one
//! tick reach applications as one frame.

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key, RelativeAxisType};
use tracing::{info, trace};

use super::EventEmitter;
use crate::error::{PadMapperError, Result};
use crate::mapping::event::{MouseButton, SyntheticEvent, VirtualKey};
use crate::mapping::table::WHEEL_DELTA;

/// Maximum device name length accepted by uinput (`UINPUT_MAX_NAME_SIZE` - 1).
pub const MAX_DEVICE_NAME_LEN: usize = 79;

/// evdev key code for a virtual key.
#[must_use]
pub fn evdev_key(key: VirtualKey) -> Key {
    match key {
        VirtualKey::Shift => Key::KEY_LEFTSHIFT,
        VirtualKey::Control => Key::KEY_LEFTCTRL,
        VirtualKey::Escape => Key::KEY_ESC,
        VirtualKey::Space => Key::KEY_SPACE,
        VirtualKey::Digit1 => Key::KEY_1,
        VirtualKey::Digit2 => Key::KEY_2,
        VirtualKey::Digit3 => Key::KEY_3,
        VirtualKey::Digit4 => Key::KEY_4,
        VirtualKey::A => Key::KEY_A,
        VirtualKey::B => Key::KEY_B,
        VirtualKey::D => Key::KEY_D,
        VirtualKey::E => Key::KEY_E,
        VirtualKey::G => Key::KEY_G,
        VirtualKey::Q => Key::KEY_Q,
        VirtualKey::S => Key::KEY_S,
        VirtualKey::W => Key::KEY_W,
    }
}

/// evdev button code for a mouse button.
#[must_use]
pub fn evdev_button(button: MouseButton) -> Key {
    match button {
        MouseButton::Left => Key::BTN_LEFT,
        MouseButton::Right => Key::BTN_RIGHT,
        MouseButton::Middle => Key::BTN_MIDDLE,
    }
}

/// Converts a wheel magnitude to notches, rounding partial notches up to one.
///
/// ```
/// use pad_mapper::output::uinput::wheel_notches;
///
/// assert_eq!(wheel_notches(120), 1);
/// assert_eq!(wheel_notches(-240), -2);
/// assert_eq!(wheel_notches(30), 1);
/// assert_eq!(wheel_notches(0), 0);
/// ```
#[must_use]
pub fn wheel_notches(delta: i32) -> i32 {
    match delta / WHEEL_DELTA {
        0 => delta.signum(),
        notches => notches,
    }
}

/// Appends the evdev events for one synthetic event.
pub fn translate(event: &SyntheticEvent, out: &mut Vec<InputEvent>) {
    let key_event = |key: Key, pressed: bool| {
        InputEvent::new(EventType::KEY, key.code(), i32::from(pressed))
    };

    match *event {
        SyntheticEvent::KeyDown(key) => out.push(key_event(evdev_key(key), true)),
        SyntheticEvent::KeyUp(key) => out.push(key_event(evdev_key(key), false)),
        SyntheticEvent::MouseButtonDown(button) => out.push(key_event(evdev_button(button), true)),
        SyntheticEvent::MouseButtonUp(button) => out.push(key_event(evdev_button(button), false)),
        SyntheticEvent::MouseWheel(delta) => out.push(InputEvent::new(
            EventType::RELATIVE,
            RelativeAxisType::REL_WHEEL.0,
            wheel_notches(delta),
        )),
        SyntheticEvent::MouseMove { dx, dy } => {
            if dx != 0 {
                out.push(InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_X.0, dx));
            }
            if dy != 0 {
                out.push(InputEvent::new(EventType::RELATIVE, RelativeAxisType::REL_Y.0, dy));
            }
        }
    }
}

/// Virtual keyboard + mouse backed by uinput.
pub struct UinputEmitter {
    device: VirtualDevice,
    name: String,
    buffer: Vec<InputEvent>,
}

impl std::fmt::Debug for UinputEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UinputEmitter")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl UinputEmitter {
    /// Creates the virtual device.
    ///
    /// The device advertises every key in [`VirtualKey::ALL`], the three mouse
    /// buttons and the `REL_X`, `REL_Y` and `REL_WHEEL` axes.
    ///
    /// # Errors
    ///
    /// Returns `Emitter` if `/dev/uinput` cannot be opened (missing module or
    /// insufficient permissions) or the device cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pad_mapper::output::UinputEmitter;
    ///
    /// let emitter = UinputEmitter::create("pad-mapper virtual input")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn create(name: &str) -> Result<Self> {
        let mut keys = AttributeSet::<Key>::new();
        for key in VirtualKey::ALL {
            keys.insert(evdev_key(key));
        }
        for button in [MouseButton::Left, MouseButton::Right, MouseButton::Middle] {
            keys.insert(evdev_button(button));
        }

        let mut axes = AttributeSet::<RelativeAxisType>::new();
        axes.insert(RelativeAxisType::REL_X);
        axes.insert(RelativeAxisType::REL_Y);
        axes.insert(RelativeAxisType::REL_WHEEL);

        let device = VirtualDeviceBuilder::new()
            .and_then(|builder| builder.name(name).with_keys(&keys))
            .and_then(|builder| builder.with_relative_axes(&axes))
            .and_then(|builder| builder.build())
            .map_err(|e| PadMapperError::Emitter(format!("Failed to create uinput device: {}", e)))?;

        info!("Created virtual input device \"{}\"", name);

        Ok(Self {
            device,
            name: name.to_string(),
            buffer: Vec::with_capacity(32),
        })
    }

    /// Name the virtual device was registered with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl EventEmitter for UinputEmitter {
    fn send(&mut self, events: &[SyntheticEvent]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        self.buffer.clear();
        for event in events {
            trace!("Emitting {}", event);
            translate(event, &mut self.buffer);
        }

        self.device
            .emit(&self.buffer)
            .map_err(|e| PadMapperError::Emitter(format!("Failed to write events: {}", e)))
    }
}
