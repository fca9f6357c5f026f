//! # Mapping Engine Module
//!
//! Turns consecutive [`GamepadSnapshot`]s into an ordered list of
//! [`SyntheticEvent`]s.
//!
//! ## Processing Order
//!
//! Each call to [`MappingEngine::step`] evaluates, in this order:
//!
//! 1. **Button rules** in table order. Key and mouse-button targets are
//!    level-triggered: the current logical state is re-sent every tick. Wheel
//!    targets fire once per tick while the button is held.
//! 2. **Right trigger** to mouse button. Edge-triggered through a latch.
//! 3. **Left stick** to direction keys. Edge-triggered through one latch per key.
//! 4. **Right stick** to relative pointer motion. Stateless.
//!
//! The event order follows the evaluation order, and downstream consumers see
//! the events of one tick in exactly this sequence.
//!
//! ## Usage
//!
//! ```
//! use pad_mapper::controller::snapshot::{buttons, GamepadSnapshot};
//! use pad_mapper::mapping::engine::{MappingEngine, MappingState};
//! use pad_mapper::mapping::event::{SyntheticEvent, VirtualKey};
//! use pad_mapper::mapping::table::DEFAULT_TABLE;
//!
//! let engine = MappingEngine::new(DEFAULT_TABLE);
//! let mut state = MappingState::new();
//!
//! let current = GamepadSnapshot { buttons: buttons::A, ..GamepadSnapshot::default() };
//! let previous = state.previous();
//! let events = engine.step(&previous, &current, &mut state);
//!
//! assert_eq!(events[0], SyntheticEvent::KeyDown(VirtualKey::Space));
//! ```

use tracing::trace;

use super::event::{SyntheticEvent, VirtualKey};
use super::table::MappingTable;
use crate::controller::snapshot::GamepadSnapshot;

/// Number of latch slots; one per possible virtual-key code.
const LATCH_SLOTS: usize = 256;

/// Latch bookkeeping carried from one tick to the next.
///
/// Owned by whoever drives the engine (the polling worker in production, the
/// test in unit tests). A fresh state has every latch released and a zeroed
/// previous snapshot, which matches an idle controller, so the first tick never
/// produces spurious releases for axis or trigger bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingState {
    axis_latches: [bool; LATCH_SLOTS],
    trigger_latch: bool,
    previous: GamepadSnapshot,
}

impl Default for MappingState {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingState {
    /// Creates a state with all latches released.
    #[must_use]
    pub fn new() -> Self {
        Self {
            axis_latches: [false; LATCH_SLOTS],
            trigger_latch: false,
            previous: GamepadSnapshot::default(),
        }
    }

    /// Last logical state emitted for an axis-derived key.
    #[must_use]
    pub fn axis_latch(&self, key: VirtualKey) -> bool {
        self.axis_latches[usize::from(key.code())]
    }

    pub fn set_axis_latch(&mut self, key: VirtualKey, pressed: bool) {
        self.axis_latches[usize::from(key.code())] = pressed;
    }

    /// Whether the trigger binding currently holds its mouse button down.
    #[must_use]
    pub fn trigger_latch(&self) -> bool {
        self.trigger_latch
    }

    pub fn set_trigger_latch(&mut self, pressed: bool) {
        self.trigger_latch = pressed;
    }

    /// The last successfully processed snapshot.
    #[must_use]
    pub fn previous(&self) -> GamepadSnapshot {
        self.previous
    }

    /// Records `snapshot` as processed. Only call after a successful read.
    pub fn commit(&mut self, snapshot: GamepadSnapshot) {
        self.previous = snapshot;
    }
}

/// Applies a [`MappingTable`] to controller snapshots.
#[derive(Debug, Clone, Copy)]
pub struct MappingEngine {
    table: MappingTable,
}

impl MappingEngine {
    #[must_use]
    pub fn new(table: MappingTable) -> Self {
        Self { table }
    }

    #[must_use]
    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    /// Computes the events for one tick and updates the latches in `state`.
    ///
    /// `previous` is the last processed snapshot; the level-triggered button
    /// rules do not depend on it. `state.previous` is left untouched, so the
    /// caller decides when the tick counts as processed (see
    /// [`MappingState::commit`]).
    pub fn step(
        &self,
        previous: &GamepadSnapshot,
        current: &GamepadSnapshot,
        state: &mut MappingState,
    ) -> Vec<SyntheticEvent> {
        let changed = current.changed_buttons(previous);
        if changed != 0 {
            trace!("Buttons changed: 0x{:04x} (now 0x{:04x})", changed, current.buttons);
        }

        let mut events = Vec::with_capacity(self.table.buttons.len() + self.table.axes.len() + 2);

        self.map_buttons(current, &mut events);
        self.map_trigger(current, state, &mut events);
        self.map_left_stick(current, state, &mut events);
        events.extend(self.pointer_motion(current));

        events
    }

    /// Button rules, level-triggered.
    fn map_buttons(&self, current: &GamepadSnapshot, events: &mut Vec<SyntheticEvent>) {
        events.extend(
            self.table
                .buttons
                .iter()
                .filter_map(|rule| rule.target.resolve(current.is_pressed(rule.mask))),
        );
    }

    /// Right trigger to mouse button, edge-triggered.
    fn map_trigger(
        &self,
        current: &GamepadSnapshot,
        state: &mut MappingState,
        events: &mut Vec<SyntheticEvent>,
    ) {
        let rule = self.table.trigger;
        let value = current.right_trigger;

        if value > rule.press_above && !state.trigger_latch {
            events.push(SyntheticEvent::MouseButtonDown(rule.button));
            state.trigger_latch = true;
        } else if value < rule.release_below && state.trigger_latch {
            events.push(SyntheticEvent::MouseButtonUp(rule.button));
            state.trigger_latch = false;
        }
    }

    /// Left stick to direction keys, edge-triggered.
    fn map_left_stick(
        &self,
        current: &GamepadSnapshot,
        state: &mut MappingState,
        events: &mut Vec<SyntheticEvent>,
    ) {
        for rule in self.table.axes {
            let active = rule
                .direction
                .is_active(current.left_x, current.left_y, rule.threshold);
            if active != state.axis_latch(rule.key) {
                events.push(SyntheticEvent::key(rule.key, active));
                state.set_axis_latch(rule.key, active);
            }
        }
    }

    /// Right stick to pointer motion.
    ///
    /// Returns `None` while both axes are inside the deadzone. Once either axis
    /// leaves it, both axes contribute. The vertical axis is inverted so that
    /// pushing the stick up moves the pointer up.
    ///
    /// ```
    /// use pad_mapper::controller::snapshot::GamepadSnapshot;
    /// use pad_mapper::mapping::engine::MappingEngine;
    /// use pad_mapper::mapping::event::SyntheticEvent;
    /// use pad_mapper::mapping::table::DEFAULT_TABLE;
    ///
    /// let engine = MappingEngine::new(DEFAULT_TABLE);
    /// let snapshot = GamepadSnapshot { right_x: 20000, right_y: 20000, ..Default::default() };
    /// assert_eq!(
    ///     engine.pointer_motion(&snapshot),
    ///     Some(SyntheticEvent::MouseMove { dx: 34, dy: -34 })
    /// );
    /// ```
    #[must_use]
    pub fn pointer_motion(&self, current: &GamepadSnapshot) -> Option<SyntheticEvent> {
        let x = i32::from(current.right_x);
        let y = i32::from(current.right_y);
        let deadzone = self.table.deadzone;

        if x.abs() <= deadzone && y.abs() <= deadzone {
            return None;
        }

        let sensitivity = self.table.mouse_sensitivity;
        Some(SyntheticEvent::MouseMove {
            dx: (x as f32 * sensitivity) as i32,
            dy: (-(y as f32) * sensitivity) as i32,
        })
    }
}
