//! Logging facilities for Horizon Hotkeys.
//!
//! This module provides:
//! - Target constants for filtering logs by subsystem
//! - Span names used to instrument event dispatch
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! Horizon Hotkeys uses the `tracing` crate for instrumentation and never
//! installs a subscriber itself. To see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_hotkeys=debug")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```

/// Span names used throughout Horizon Hotkeys for tracing.
pub mod span_names {
    /// Keyboard event dispatch span.
    pub const DISPATCH: &str = "horizon_hotkeys::dispatch";
    /// Signal emission span.
    pub const SIGNAL: &str = "horizon_hotkeys::signal";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core infrastructure target.
    pub const CORE: &str = "horizon_hotkeys_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_hotkeys_core::signal";
    /// Key specification parser target.
    pub const PARSER: &str = "horizon_hotkeys::parser";
    /// Registration store target.
    pub const STORE: &str = "horizon_hotkeys::store";
    /// Match engine target.
    pub const ENGINE: &str = "horizon_hotkeys::engine";
    /// Service facade target.
    pub const SERVICE: &str = "horizon_hotkeys::service";
    /// Configuration loading target.
    pub const CONFIG: &str = "horizon_hotkeys::config";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::trace_span!(target: "horizon_hotkeys::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are thin wrappers around the `tracing` macros with consistent
/// target naming.
#[macro_export]
macro_rules! hotkeys_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_hotkeys_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! hotkeys_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_hotkeys_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! hotkeys_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "horizon_hotkeys_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! hotkeys_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_hotkeys_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! hotkeys_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "horizon_hotkeys_core", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        // Just ensure it compiles and doesn't panic
        let _span = PerfSpan::new("test_operation");
    }

    #[test]
    fn test_targets_are_namespaced() {
        for target in [
            targets::PARSER,
            targets::STORE,
            targets::ENGINE,
            targets::SERVICE,
            targets::CONFIG,
        ] {
            assert!(target.starts_with("horizon_hotkeys::"), "{target}");
        }
        assert!(targets::SIGNAL.starts_with(targets::CORE));
    }

    #[test]
    fn test_macros_expand() {
        hotkeys_trace!(value = 1, "trace message");
        hotkeys_debug!("debug message");
        hotkeys_info!("info message");
        hotkeys_warn!("warn message");
        hotkeys_error!("error message");
    }
}
