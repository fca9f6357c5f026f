//! # pad-mapper Library
//!
//! Drive keyboard/mouse-only applications with a gamepad.
//!
//! This library provides the sampling-and-mapping core: a fixed-cadence
//! polling loop that reads controller snapshots, a per-tick state machine that
//! turns them into synthetic keyboard and mouse events, and Linux adapters that
//! read gamepads through evdev and emit events through uinput.

pub mod config;
pub mod controller;
pub mod error;
pub mod mapping;
pub mod output;
pub mod scheduler;
