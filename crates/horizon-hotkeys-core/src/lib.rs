//! Core systems for Horizon Hotkeys.
//!
//! This crate provides the infrastructure the hotkey engine is built on:
//!
//! - **Signal/Slot System**: Type-safe notification of fired hotkeys
//! - **Logging**: `tracing` targets, span names and helper macros
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_hotkeys_core::Signal;
//!
//! let fired = Signal::<&'static str>::new();
//!
//! let conn_id = fired.connect(|keys| {
//!     println!("Hotkey {} fired", keys);
//! });
//!
//! fired.emit("ctrl.s");
//! fired.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
