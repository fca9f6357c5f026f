//! # Synthetic Event Types
//!
//! The events the mapping engine produces and the emitter delivers to the OS.
//! Virtual key codes use the Windows virtual-key numbering, and mouse buttons
//! expose the native mouse-event flag encoding where each *up* flag is the
//! matching *down* flag shifted left by one bit.

use std::fmt;

/// Keyboard keys the mapping table can target.
///
/// Discriminants are virtual-key codes, so `key as u16` yields the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum VirtualKey {
    Shift = 0x10,
    Control = 0x11,
    Escape = 0x1B,
    Space = 0x20,
    Digit1 = 0x31,
    Digit2 = 0x32,
    Digit3 = 0x33,
    Digit4 = 0x34,
    A = 0x41,
    B = 0x42,
    D = 0x44,
    E = 0x45,
    G = 0x47,
    Q = 0x51,
    S = 0x53,
    W = 0x57,
}

impl VirtualKey {
    /// Every key the table can target, in code order.
    pub const ALL: [VirtualKey; 16] = [
        VirtualKey::Shift,
        VirtualKey::Control,
        VirtualKey::Escape,
        VirtualKey::Space,
        VirtualKey::Digit1,
        VirtualKey::Digit2,
        VirtualKey::Digit3,
        VirtualKey::Digit4,
        VirtualKey::A,
        VirtualKey::B,
        VirtualKey::D,
        VirtualKey::E,
        VirtualKey::G,
        VirtualKey::Q,
        VirtualKey::S,
        VirtualKey::W,
    ];

    /// Returns the virtual-key code.
    #[must_use]
    pub fn code(self) -> u16 {
        self as u16
    }
}

/// Mouse buttons the mapping table can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Native flag for the button-down event.
    #[must_use]
    pub fn down_flag(self) -> u32 {
        match self {
            MouseButton::Left => 0x0002,
            MouseButton::Right => 0x0008,
            MouseButton::Middle => 0x0020,
        }
    }

    /// Native flag for a press (`true`) or release (`false`).
    ///
    /// ```
    /// use pad_mapper::mapping::event::MouseButton;
    ///
    /// assert_eq!(MouseButton::Left.flag(true), 0x0002);
    /// assert_eq!(MouseButton::Left.flag(false), 0x0004);
    /// ```
    #[must_use]
    pub fn flag(self, pressed: bool) -> u32 {
        if pressed {
            self.down_flag()
        } else {
            self.down_flag() << 1
        }
    }
}

/// One synthesized keyboard or mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticEvent {
    KeyDown(VirtualKey),
    KeyUp(VirtualKey),
    MouseButtonDown(MouseButton),
    MouseButtonUp(MouseButton),
    /// Wheel rotation; positive scrolls up. 120 units is one notch.
    MouseWheel(i32),
    /// Relative pointer displacement in pixels; positive `dy` moves down.
    MouseMove { dx: i32, dy: i32 },
}

impl SyntheticEvent {
    /// Key event for the given logical state.
    #[must_use]
    pub fn key(key: VirtualKey, pressed: bool) -> Self {
        if pressed {
            SyntheticEvent::KeyDown(key)
        } else {
            SyntheticEvent::KeyUp(key)
        }
    }

    /// Mouse button event for the given logical state.
    #[must_use]
    pub fn mouse_button(button: MouseButton, pressed: bool) -> Self {
        if pressed {
            SyntheticEvent::MouseButtonDown(button)
        } else {
            SyntheticEvent::MouseButtonUp(button)
        }
    }
}

impl fmt::Display for SyntheticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntheticEvent::KeyDown(key) => write!(f, "key-down(0x{:02x})", key.code()),
            SyntheticEvent::KeyUp(key) => write!(f, "key-up(0x{:02x})", key.code()),
            SyntheticEvent::MouseButtonDown(button) => {
                write!(f, "mouse-down(0x{:04x})", button.flag(true))
            }
            SyntheticEvent::MouseButtonUp(button) => {
                write!(f, "mouse-up(0x{:04x})", button.flag(false))
            }
            SyntheticEvent::MouseWheel(delta) => write!(f, "wheel({})", delta),
            SyntheticEvent::MouseMove { dx, dy } => write!(f, "move({}, {})", dx, dy),
        }
    }
}
