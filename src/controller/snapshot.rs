//! # Gamepad Snapshot Module
//!
//! A [`GamepadSnapshot`] is one fully-read sample of controller state taken at a
//! single tick. The layout follows the XInput gamepad report, which is the
//! lowest common denominator every pad can be folded into:
//!
//! | Field | Type | Range | Description |
//! |-------|------|-------|-------------|
//! | `buttons` | `u16` | bitmask | Digital buttons, see [`buttons`] |
//! | `left_trigger` | `u8` | 0-255 | 0 = released |
//! | `right_trigger` | `u8` | 0-255 | 0 = released |
//! | `left_x` / `left_y` | `i16` | full range | Left stick, Y positive = up |
//! | `right_x` / `right_y` | `i16` | full range | Right stick, Y positive = up |
//!
//! ## Usage
//!
//! ```
//! use pad_mapper::controller::snapshot::{buttons, GamepadSnapshot};
//!
//! let snapshot = GamepadSnapshot {
//!     buttons: buttons::A | buttons::DPAD_UP,
//!     ..GamepadSnapshot::default()
//! };
//! assert!(snapshot.is_pressed(buttons::A));
//! assert!(!snapshot.is_pressed(buttons::B));
//! ```

/// Digital button bits, using the XInput bit assignments.
pub mod buttons {
    /// D-Pad up.
    pub const DPAD_UP: u16 = 0x0001;
    /// D-Pad down.
    pub const DPAD_DOWN: u16 = 0x0002;
    /// D-Pad left.
    pub const DPAD_LEFT: u16 = 0x0004;
    /// D-Pad right.
    pub const DPAD_RIGHT: u16 = 0x0008;
    /// Start / Menu.
    pub const START: u16 = 0x0010;
    /// Back / View.
    pub const BACK: u16 = 0x0020;
    /// Left stick click.
    pub const LEFT_THUMB: u16 = 0x0040;
    /// Right stick click.
    pub const RIGHT_THUMB: u16 = 0x0080;
    /// Left bumper.
    pub const LEFT_SHOULDER: u16 = 0x0100;
    /// Right bumper.
    pub const RIGHT_SHOULDER: u16 = 0x0200;
    /// South face button.
    pub const A: u16 = 0x1000;
    /// East face button.
    pub const B: u16 = 0x2000;
    /// West face button.
    pub const X: u16 = 0x4000;
    /// North face button.
    pub const Y: u16 = 0x8000;
}

/// One sample of controller state.
///
/// The default value is the all-zero snapshot: no buttons, triggers released,
/// sticks centered. It is what the mapping state starts from before the first
/// successful read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GamepadSnapshot {
    /// Digital button bitmask (see [`buttons`]).
    pub buttons: u16,
    /// Left trigger analog value. 0 = released, 255 = fully pressed.
    pub left_trigger: u8,
    /// Right trigger analog value. 0 = released, 255 = fully pressed.
    pub right_trigger: u8,
    /// Left stick X axis. Negative = left.
    pub left_x: i16,
    /// Left stick Y axis. Positive = up.
    pub left_y: i16,
    /// Right stick X axis. Negative = left.
    pub right_x: i16,
    /// Right stick Y axis. Positive = up.
    pub right_y: i16,
}

impl GamepadSnapshot {
    /// Returns `true` if any bit of `mask` is set in the button bitmask.
    #[must_use]
    pub fn is_pressed(&self, mask: u16) -> bool {
        self.buttons & mask != 0
    }

    /// Returns the button bits that differ from `other`.
    ///
    /// ```
    /// use pad_mapper::controller::snapshot::{buttons, GamepadSnapshot};
    ///
    /// let before = GamepadSnapshot::default();
    /// let after = GamepadSnapshot { buttons: buttons::X, ..before };
    /// assert_eq!(after.changed_buttons(&before), buttons::X);
    /// ```
    #[must_use]
    pub fn changed_buttons(&self, other: &GamepadSnapshot) -> u16 {
        self.buttons ^ other.buttons
    }
}
