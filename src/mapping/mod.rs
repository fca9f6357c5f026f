//! # Mapping Module
//!
//! Translation of controller snapshots into synthetic keyboard and mouse events.
//!
//! This module handles:
//! - The static binding policy ([`table`])
//! - The per-tick state machine and its latches ([`engine`])
//! - The synthetic event vocabulary shared with the emitter ([`event`])

pub mod engine;
pub mod event;
pub mod table;

pub use engine::{MappingEngine, MappingState};
pub use event::{MouseButton, SyntheticEvent, VirtualKey};
pub use table::{MappingTable, DEFAULT_TABLE};
