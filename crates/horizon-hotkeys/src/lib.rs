//! Horizon Hotkeys - keyboard shortcut matching.
//!
//! Declare hotkeys as plain strings, feed raw keyboard events in, and get
//! told which hotkeys fired.
//!
//! - Single combinations: `"a"`, `"ctrl.s"`, `"meta+shift+k"`
//! - Sequences pressed in order within a timeout: `"g>m"`, `"ctrl.k>ctrl.c"`
//! - Scoping: hotkeys stay quiet while an editable element (`INPUT`,
//!   `TEXTAREA`, `SELECT`) has focus, unless allowed with `allow_in`
//!
//! # Example
//!
//! ```
//! use horizon_hotkeys::{HotkeyOptions, HotkeysService, KeyEvent, Modifiers};
//!
//! let service = HotkeysService::default();
//! let save = service.register("ctrl.s", &HotkeyOptions::new().with_description("Save"))?;
//!
//! let event = KeyEvent::key_down("s").with_modifiers(Modifiers::CTRL);
//! let outcome = service.dispatch(&event);
//!
//! assert!(outcome.has_fired(save));
//! assert!(outcome.prevent_default);
//! # Ok::<(), horizon_hotkeys::Error>(())
//! ```
//!
//! The lower-level [`RegistrationStore`] and [`MatchEngine`] can be used
//! directly when the caller owns synchronization.

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod help;
pub mod key;
pub mod options;
pub mod parser;
pub mod registration;
pub mod service;

pub use config::HotkeysConfig;
pub use engine::{DispatchOutcome, MatchEngine};
pub use error::{Error, InvalidSpecError, Result};
pub use event::KeyEvent;
pub use help::{HelpEntry, HelpGroup};
pub use key::{HotkeyKeys, Key, KeySpec, Modifier, Modifiers, SequenceSpec};
pub use options::{HotkeyOptions, KeyPhase, ResolvedOptions};
pub use parser::parse;
pub use registration::{HotkeyRegistration, RegistrationId, RegistrationStore};
pub use service::{HotkeyFired, HotkeyGuard, HotkeysService};

pub use horizon_hotkeys_core::{ConnectionGuard, ConnectionId, Signal};
