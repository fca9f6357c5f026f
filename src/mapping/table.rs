//! # Mapping Table Module
//!
//! Static, compiled-in mapping policy.
//!
//! ## Default Bindings
//!
//! | Input | Output | Behavior |
//! |-------|--------|----------|
//! | A | Space | level |
//! | B | G | level |
//! | Y | B | level |
//! | X | E | level |
//! | L3 / R3 | Shift / Control | level |
//! | D-Pad Up / Right / Down / Left | 1 / 2 / 3 / 4 | level |
//! | Start / Back | Escape / Q | level |
//! | LB / RB | wheel +120 / -120 | every tick while held |
//! | Right trigger | left mouse button | edge, threshold 30 |
//! | Left stick | W / S / A / D | edge, threshold 15000 |
//! | Right stick | pointer motion | deadzone 9600, 0.0017 px/unit |

use super::event::{MouseButton, SyntheticEvent, VirtualKey};
use crate::controller::snapshot::buttons;

/// One notch of wheel rotation.
pub const WHEEL_DELTA: i32 = 120;

/// Right stick magnitude below which pointer motion is suppressed.
pub const DEADZONE: i32 = 9600;

/// Pointer pixels per raw stick unit.
pub const MOUSE_SENSITIVITY: f32 = 0.0017;

/// Left stick magnitude that counts as a direction key press.
///
/// Kept well outside [`DEADZONE`] to avoid jittery key toggling.
pub const LEFT_STICK_THRESHOLD: i16 = 15000;

/// Right trigger value that counts as a left click.
pub const TRIGGER_THRESHOLD: u8 = 30;

/// What a button rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonTarget {
    /// Key down while held, key up otherwise; reasserted every tick.
    Key(VirtualKey),
    /// Mouse button down while held, up otherwise; reasserted every tick.
    MouseButton(MouseButton),
    /// One wheel event of the given signed magnitude per tick while held.
    Wheel(i32),
}

impl ButtonTarget {
    /// Event for this target given the button's current logical state.
    ///
    /// Wheel targets produce nothing while the button is up.
    #[must_use]
    pub fn resolve(self, pressed: bool) -> Option<SyntheticEvent> {
        match self {
            ButtonTarget::Key(key) => Some(SyntheticEvent::key(key, pressed)),
            ButtonTarget::MouseButton(button) => {
                Some(SyntheticEvent::mouse_button(button, pressed))
            }
            ButtonTarget::Wheel(delta) => pressed.then_some(SyntheticEvent::MouseWheel(delta)),
        }
    }
}

/// Binds a digital button to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonRule {
    /// Source button bit (see [`buttons`]).
    pub mask: u16,
    pub target: ButtonTarget,
}

impl ButtonRule {
    #[must_use]
    pub const fn key(mask: u16, key: VirtualKey) -> Self {
        Self {
            mask,
            target: ButtonTarget::Key(key),
        }
    }

    #[must_use]
    pub const fn mouse(mask: u16, button: MouseButton) -> Self {
        Self {
            mask,
            target: ButtonTarget::MouseButton(button),
        }
    }

    #[must_use]
    pub const fn wheel(mask: u16, delta: i32) -> Self {
        Self {
            mask,
            target: ButtonTarget::Wheel(delta),
        }
    }
}

/// Left stick direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Whether the stick position lies beyond `threshold` in this direction.
    ///
    /// ```
    /// use pad_mapper::mapping::table::Direction;
    ///
    /// assert!(Direction::Up.is_active(0, 20000, 15000));
    /// assert!(!Direction::Down.is_active(0, 20000, 15000));
    /// assert!(Direction::Left.is_active(-15001, 0, 15000));
    /// ```
    #[must_use]
    pub fn is_active(self, x: i16, y: i16, threshold: i16) -> bool {
        let threshold = i32::from(threshold);
        match self {
            Direction::Up => i32::from(y) > threshold,
            Direction::Down => i32::from(y) < -threshold,
            Direction::Right => i32::from(x) > threshold,
            Direction::Left => i32::from(x) < -threshold,
        }
    }
}

/// Binds a left stick direction to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRule {
    pub direction: Direction,
    pub threshold: i16,
    pub key: VirtualKey,
}

impl AxisRule {
    #[must_use]
    pub const fn new(direction: Direction, key: VirtualKey) -> Self {
        Self {
            direction,
            threshold: LEFT_STICK_THRESHOLD,
            key,
        }
    }
}

/// Right trigger to mouse button binding.
///
/// Press when the value rises above `press_above`, release when it falls below
/// `release_below`. Equal thresholds give single-threshold switching; a lower
/// release threshold adds hysteresis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerRule {
    pub press_above: u8,
    pub release_below: u8,
    pub button: MouseButton,
}

/// Complete mapping policy.
#[derive(Debug, Clone, Copy)]
pub struct MappingTable {
    /// Evaluated in order; output order follows this order.
    pub buttons: &'static [ButtonRule],
    pub axes: &'static [AxisRule],
    pub trigger: TriggerRule,
    /// Right stick deadzone (raw units).
    pub deadzone: i32,
    /// Right stick pointer speed (pixels per raw unit per tick).
    pub mouse_sensitivity: f32,
}

impl MappingTable {
    /// Returns a description of the first inconsistency, if any.
    #[must_use]
    pub fn check(&self) -> Option<String> {
        if self.trigger.release_below > self.trigger.press_above {
            return Some(format!(
                "trigger release threshold {} exceeds press threshold {}",
                self.trigger.release_below, self.trigger.press_above
            ));
        }
        if self.deadzone < 0 {
            return Some("deadzone must not be negative".to_string());
        }
        if !self.mouse_sensitivity.is_finite() {
            return Some("mouse sensitivity must be finite".to_string());
        }
        if let Some(rule) = self.axes.iter().find(|rule| rule.threshold < 0) {
            return Some(format!("axis threshold for {:?} is negative", rule.direction));
        }
        None
    }
}

/// Default button bindings.
pub const BUTTON_RULES: &[ButtonRule] = &[
    // Face buttons: jump, drop, map, interact
    ButtonRule::key(buttons::A, VirtualKey::Space),
    ButtonRule::key(buttons::B, VirtualKey::G),
    ButtonRule::key(buttons::Y, VirtualKey::B),
    ButtonRule::key(buttons::X, VirtualKey::E),
    // Stick clicks: sprint, crouch
    ButtonRule::key(buttons::LEFT_THUMB, VirtualKey::Shift),
    ButtonRule::key(buttons::RIGHT_THUMB, VirtualKey::Control),
    // D-Pad: slots
    ButtonRule::key(buttons::DPAD_UP, VirtualKey::Digit1),
    ButtonRule::key(buttons::DPAD_RIGHT, VirtualKey::Digit2),
    ButtonRule::key(buttons::DPAD_DOWN, VirtualKey::Digit3),
    ButtonRule::key(buttons::DPAD_LEFT, VirtualKey::Digit4),
    ButtonRule::key(buttons::START, VirtualKey::Escape),
    ButtonRule::key(buttons::BACK, VirtualKey::Q),
    // Shoulders: cycle active item
    ButtonRule::wheel(buttons::LEFT_SHOULDER, WHEEL_DELTA),
    ButtonRule::wheel(buttons::RIGHT_SHOULDER, -WHEEL_DELTA),
];

/// Default left stick bindings.
pub const AXIS_RULES: &[AxisRule] = &[
    AxisRule::new(Direction::Up, VirtualKey::W),
    AxisRule::new(Direction::Down, VirtualKey::S),
    AxisRule::new(Direction::Left, VirtualKey::A),
    AxisRule::new(Direction::Right, VirtualKey::D),
];

/// The shipped policy.
pub const DEFAULT_TABLE: MappingTable = MappingTable {
    buttons: BUTTON_RULES,
    axes: AXIS_RULES,
    trigger: TriggerRule {
        press_above: TRIGGER_THRESHOLD,
        release_below: TRIGGER_THRESHOLD,
        button: MouseButton::Left,
    },
    deadzone: DEADZONE,
    mouse_sensitivity: MOUSE_SENSITIVITY,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_consistent() {
        assert_eq!(DEFAULT_TABLE.check(), None);
    }

    #[test]
    fn test_default_table_sizes() {
        assert_eq!(DEFAULT_TABLE.buttons.len(), 14);
        assert_eq!(DEFAULT_TABLE.axes.len(), 4);
    }

    #[test]
    fn test_stick_threshold_outside_deadzone() {
        assert!(i32::from(LEFT_STICK_THRESHOLD) > DEADZONE);
    }

    #[test]
    fn test_each_source_button_bound_once() {
        let mut seen = 0u16;
        for rule in BUTTON_RULES {
            assert_eq!(seen & rule.mask, 0, "mask 0x{:04x} bound twice", rule.mask);
            seen |= rule.mask;
        }
    }

    #[test]
    fn test_shoulders_scroll_in_opposite_directions() {
        let wheel: Vec<_> = BUTTON_RULES
            .iter()
            .filter_map(|rule| match rule.target {
                ButtonTarget::Wheel(delta) => Some((rule.mask, delta)),
                _ => None,
            })
            .collect();
        assert_eq!(
            wheel,
            vec![
                (buttons::LEFT_SHOULDER, WHEEL_DELTA),
                (buttons::RIGHT_SHOULDER, -WHEEL_DELTA)
            ]
        );
    }

    #[test]
    fn test_resolve_targets() {
        assert_eq!(
            ButtonTarget::Key(VirtualKey::E).resolve(false),
            Some(SyntheticEvent::KeyUp(VirtualKey::E))
        );
        assert_eq!(
            ButtonTarget::MouseButton(MouseButton::Middle).resolve(true),
            Some(SyntheticEvent::MouseButtonDown(MouseButton::Middle))
        );
        assert_eq!(ButtonTarget::Wheel(-120).resolve(true), Some(SyntheticEvent::MouseWheel(-120)));
        assert_eq!(ButtonTarget::Wheel(-120).resolve(false), None);
    }

    #[test]
    fn test_direction_threshold_is_exclusive() {
        assert!(!Direction::Up.is_active(0, LEFT_STICK_THRESHOLD, LEFT_STICK_THRESHOLD));
        assert!(!Direction::Down.is_active(0, -LEFT_STICK_THRESHOLD, LEFT_STICK_THRESHOLD));
        assert!(Direction::Down.is_active(0, i16::MIN, LEFT_STICK_THRESHOLD));
        assert!(Direction::Right.is_active(i16::MAX, 0, LEFT_STICK_THRESHOLD));
    }

    #[test]
    fn test_check_rejects_inverted_trigger_thresholds() {
        let table = MappingTable {
            trigger: TriggerRule {
                press_above: 30,
                release_below: 40,
                button: MouseButton::Left,
            },
            ..DEFAULT_TABLE
        };
        assert!(table.check().is_some());
    }

    #[test]
    fn test_check_rejects_negative_deadzone() {
        let table = MappingTable {
            deadzone: -1,
            ..DEFAULT_TABLE
        };
        assert!(table.check().is_some());
    }
}
