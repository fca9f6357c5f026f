//! # Output Module
//!
//! Delivery of synthetic keyboard and mouse events to the operating system.
//!
//! This module handles:
//! - The [`EventEmitter`] seam the polling loop forwards each tick's events through
//! - A uinput virtual keyboard/mouse implementing it ([`uinput`])

pub mod uinput;

pub use uinput::UinputEmitter;

use crate::error::Result;
use crate::mapping::event::SyntheticEvent;

/// Sink for synthetic events.
#[cfg_attr(test, mockall::automock)]
pub trait EventEmitter {
    /// Applies `events` in order.
    ///
    /// Delivery is best-effort: callers log a failure and move on to the next
    /// tick without retrying.
    fn send(&mut self, events: &[SyntheticEvent]) -> Result<()>;
}
