//! The hotkeys service.
//!
//! [`HotkeysService`] bundles a [`RegistrationStore`] and a [`MatchEngine`]
//! behind one lock and announces fired hotkeys through a [`Signal`]. It is
//! meant to be created once and passed to whatever needs it, usually inside
//! an `Arc`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use horizon_hotkeys::{HotkeyOptions, HotkeysConfig, HotkeysService, KeyEvent};
//!
//! let service = Arc::new(HotkeysService::new(HotkeysConfig::default()));
//! let count = Arc::new(AtomicUsize::new(0));
//!
//! let guard = service.mount("g>m", &HotkeyOptions::new())?;
//! let seen = Arc::clone(&count);
//! guard.connect(move |_| {
//!     seen.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! service.dispatch(&KeyEvent::key_down("g"));
//! service.dispatch(&KeyEvent::key_down("m"));
//! assert_eq!(count.load(Ordering::SeqCst), 1);
//!
//! drop(guard);
//! assert!(service.hotkeys().is_empty());
//! # Ok::<(), horizon_hotkeys::Error>(())
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use horizon_hotkeys_core::logging::targets;
use horizon_hotkeys_core::{ConnectionId, Signal};
use parking_lot::Mutex;

use crate::config::HotkeysConfig;
use crate::engine::{DispatchOutcome, MatchEngine};
use crate::error::Result;
use crate::event::KeyEvent;
use crate::help::{self, HelpGroup};
use crate::options::HotkeyOptions;
use crate::registration::{HotkeyRegistration, RegistrationId, RegistrationStore};

/// Payload of [`HotkeysService::hotkey_fired`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HotkeyFired {
    /// The registration that fired.
    pub id: RegistrationId,
    /// The event that completed the match.
    pub event: KeyEvent,
}

struct ServiceState {
    store: RegistrationStore,
    engine: MatchEngine,
}

/// Registration and dispatch entry point.
pub struct HotkeysService {
    state: Mutex<ServiceState>,
    paused: AtomicBool,

    /// Emitted once per fired registration, in registration order.
    ///
    /// Slots run after the service lock is released and may call back into
    /// the service.
    pub hotkey_fired: Signal<HotkeyFired>,
}

impl Default for HotkeysService {
    fn default() -> Self {
        Self::new(HotkeysConfig::default())
    }
}

impl HotkeysService {
    /// Create a service with no registrations.
    pub fn new(config: HotkeysConfig) -> Self {
        Self {
            state: Mutex::new(ServiceState {
                store: RegistrationStore::with_defaults(config.default_options.clone()),
                engine: MatchEngine::with_config(&config),
            }),
            paused: AtomicBool::new(false),
            hotkey_fired: Signal::new(),
        }
    }

    /// Register a hotkey.
    pub fn register(&self, keys: &str, options: &HotkeyOptions) -> Result<RegistrationId> {
        Ok(self.state.lock().store.register(keys, options)?)
    }

    /// Register a hotkey with options given as JSON.
    pub fn register_json(&self, keys: &str, options_json: &str) -> Result<RegistrationId> {
        let options = HotkeyOptions::from_json(options_json)?;
        self.register(keys, &options)
    }

    /// Remove a registration and its sequence progress.
    ///
    /// Returns `false` if the id was not registered.
    pub fn unregister(&self, id: RegistrationId) -> bool {
        let mut state = self.state.lock();
        state.engine.forget(id);
        state.store.unregister(id).is_some()
    }

    /// Remove every registration whose keys equal `keys`.
    ///
    /// Returns how many registrations were removed.
    pub fn remove_shortcuts(&self, keys: &str) -> Result<usize> {
        let mut state = self.state.lock();
        let removed = state.store.remove_by_keys(keys)?;
        for id in &removed {
            state.engine.forget(*id);
        }
        Ok(removed.len())
    }

    /// Snapshot of all registrations in registration order.
    pub fn hotkeys(&self) -> Vec<HotkeyRegistration> {
        self.state.lock().store.list()
    }

    /// Look up one registration.
    pub fn get(&self, id: RegistrationId) -> Option<HotkeyRegistration> {
        self.state.lock().store.get(id).cloned()
    }

    /// Snapshot of the registrations in `group`.
    pub fn find_by_group(&self, group: &str) -> Vec<HotkeyRegistration> {
        self.state.lock().store.find_by_group(group)
    }

    /// Help listing for the registrations shown in the help menu.
    pub fn help_groups(&self) -> Vec<HelpGroup> {
        help::help_groups(&self.state.lock().store)
    }

    /// Register a hotkey for as long as the returned guard lives.
    pub fn mount(self: &Arc<Self>, keys: &str, options: &HotkeyOptions) -> Result<HotkeyGuard> {
        let id = self.register(keys, options)?;
        Ok(HotkeyGuard {
            service: Arc::clone(self),
            id,
            connections: Mutex::new(Vec::new()),
        })
    }

    /// Connect a slot that runs only when `id` fires.
    pub fn on_hotkey<F>(&self, id: RegistrationId, slot: F) -> ConnectionId
    where
        F: Fn(&HotkeyFired) + Send + Sync + 'static,
    {
        self.hotkey_fired.connect(move |fired| {
            if fired.id == id {
                slot(fired);
            }
        })
    }

    /// Dispatch an event at the current time.
    pub fn dispatch(&self, event: &KeyEvent) -> DispatchOutcome {
        self.dispatch_at(event, Instant::now())
    }

    /// Dispatch an event as if it arrived at `now`.
    pub fn dispatch_at(&self, event: &KeyEvent, now: Instant) -> DispatchOutcome {
        if self.is_paused() {
            tracing::trace!(target: targets::SERVICE, key = %event.key, "paused, event ignored");
            return DispatchOutcome::default();
        }

        let outcome = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            state.engine.handle_event_at(&state.store, event, now)
        };

        for id in &outcome.fired {
            self.hotkey_fired.emit(HotkeyFired {
                id: *id,
                event: event.clone(),
            });
        }

        outcome
    }

    /// Ignore all events until [`resume`](Self::resume) is called.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
        tracing::debug!(target: targets::SERVICE, "hotkeys paused");
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
        tracing::debug!(target: targets::SERVICE, "hotkeys resumed");
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Change the maximum time between two steps of a sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) for a zero timeout.
    pub fn set_sequence_timeout(&self, timeout: Duration) -> Result<()> {
        self.state.lock().engine.set_sequence_timeout(timeout)
    }

    pub fn sequence_timeout(&self) -> Duration {
        self.state.lock().engine.sequence_timeout()
    }
}

/// A mounted hotkey.
///
/// Dropping the guard unregisters the hotkey and disconnects every slot
/// connected through [`HotkeyGuard::connect`].
pub struct HotkeyGuard {
    service: Arc<HotkeysService>,
    id: RegistrationId,
    connections: Mutex<Vec<ConnectionId>>,
}

impl HotkeyGuard {
    /// The mounted registration.
    pub fn id(&self) -> RegistrationId {
        self.id
    }

    /// Connect a slot that runs whenever this hotkey fires.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&HotkeyFired) + Send + Sync + 'static,
    {
        let connection = self.service.on_hotkey(self.id, slot);
        self.connections.lock().push(connection);
        connection
    }
}

impl Drop for HotkeyGuard {
    fn drop(&mut self) {
        for connection in self.connections.get_mut().drain(..) {
            self.service.hotkey_fired.disconnect(connection);
        }
        self.service.unregister(self.id);
    }
}

impl std::fmt::Debug for HotkeyGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotkeyGuard").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, impl Fn(&HotkeyFired) + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        (count, move |_: &HotkeyFired| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_dispatch_emits_fired() {
        let service = HotkeysService::default();
        let id = service.register("a", &HotkeyOptions::new()).unwrap();

        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&fired);
        service.hotkey_fired.connect(move |f| sink.lock().push(f.id));

        service.dispatch(&KeyEvent::key_down("a"));
        assert_eq!(*fired.lock(), vec![id]);
    }

    #[test]
    fn test_on_hotkey_filters_by_id() {
        let service = HotkeysService::default();
        let a = service.register("a", &HotkeyOptions::new()).unwrap();
        service.register("b", &HotkeyOptions::new()).unwrap();

        let (count, slot) = counter();
        service.on_hotkey(a, slot);

        service.dispatch(&KeyEvent::key_down("b"));
        service.dispatch(&KeyEvent::key_down("a"));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_register_json() {
        let service = HotkeysService::default();
        let id = service
            .register_json("a", r#"{"trigger": "keyup", "group": "General"}"#)
            .unwrap();

        let registration = service.get(id).unwrap();
        assert_eq!(registration.group(), Some("General"));
        assert!(service.dispatch(&KeyEvent::key_down("a")).is_empty());
        assert!(service.dispatch(&KeyEvent::key_up("a")).has_fired(id));
    }

    #[test]
    fn test_register_invalid_spec() {
        let service = HotkeysService::default();
        let err = service.register("ctrl.", &HotkeyOptions::new()).unwrap_err();

        assert!(matches!(err, crate::Error::InvalidSpec(_)));
        assert!(service.hotkeys().is_empty());
    }

    #[test]
    fn test_config_defaults_apply() {
        let config = HotkeysConfig::new()
            .with_default_options(HotkeyOptions::new().with_prevent_default(false));
        let service = HotkeysService::new(config);
        service.register("a", &HotkeyOptions::new()).unwrap();

        let outcome = service.dispatch(&KeyEvent::key_down("a"));
        assert!(!outcome.is_empty());
        assert!(!outcome.prevent_default);
    }

    #[test]
    fn test_pause_ignores_events_and_keeps_progress() {
        let service = HotkeysService::default();
        let id = service.register("g>m", &HotkeyOptions::new()).unwrap();
        let t0 = Instant::now();

        service.dispatch_at(&KeyEvent::key_down("g"), t0);
        service.pause();
        assert!(service.is_paused());
        assert!(service.dispatch_at(&KeyEvent::key_down("x"), t0).is_empty());

        service.resume();
        let outcome = service.dispatch_at(&KeyEvent::key_down("m"), t0 + Duration::from_millis(10));
        assert!(outcome.has_fired(id));
    }

    #[test]
    fn test_unregister_drops_progress() {
        let service = HotkeysService::default();
        let id = service.register("g>m", &HotkeyOptions::new()).unwrap();
        service.dispatch(&KeyEvent::key_down("g"));

        assert!(service.unregister(id));
        assert!(!service.unregister(id));
        assert_eq!(service.state.lock().engine.pending_sequences(), 0);
    }

    #[test]
    fn test_remove_shortcuts() {
        let service = HotkeysService::default();
        service.register("ctrl.s", &HotkeyOptions::new()).unwrap();
        service.register("ctrl+s", &HotkeyOptions::new()).unwrap();
        service.register("s", &HotkeyOptions::new()).unwrap();

        assert_eq!(service.remove_shortcuts("control.s").unwrap(), 2);
        assert_eq!(service.hotkeys().len(), 1);
        assert!(service.remove_shortcuts("ctrl.").is_err());
    }

    #[test]
    fn test_mount_guard_unregisters_on_drop() {
        let service = Arc::new(HotkeysService::default());
        let (count, slot) = counter();

        let guard = service.mount("a", &HotkeyOptions::new()).unwrap();
        guard.connect(slot);
        assert_eq!(service.hotkey_fired.connection_count(), 1);

        service.dispatch(&KeyEvent::key_down("a"));
        drop(guard);

        assert!(service.hotkeys().is_empty());
        assert_eq!(service.hotkey_fired.connection_count(), 0);
        assert!(service.dispatch(&KeyEvent::key_down("a")).is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_mount_guard_released_on_unwind() {
        let service = Arc::new(HotkeysService::default());
        let inner = Arc::clone(&service);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = inner.mount("a", &HotkeyOptions::new()).unwrap();
            panic!("component failed");
        }));

        assert!(result.is_err());
        assert!(service.hotkeys().is_empty());
    }

    #[test]
    fn test_slot_may_call_back_into_service() {
        let service = Arc::new(HotkeysService::default());
        let id = service.register("a", &HotkeyOptions::new()).unwrap();

        let weak = Arc::downgrade(&service);
        service.on_hotkey(id, move |fired| {
            if let Some(service) = weak.upgrade() {
                service.unregister(fired.id);
            }
        });

        assert!(service.dispatch(&KeyEvent::key_down("a")).has_fired(id));
        assert!(service.hotkeys().is_empty());
    }

    #[test]
    fn test_set_sequence_timeout() {
        let service = HotkeysService::default();
        service.set_sequence_timeout(Duration::from_millis(100)).unwrap();
        assert_eq!(service.sequence_timeout(), Duration::from_millis(100));

        let id = service.register("g>m", &HotkeyOptions::new()).unwrap();
        let t0 = Instant::now();
        service.dispatch_at(&KeyEvent::key_down("g"), t0);
        let outcome = service.dispatch_at(&KeyEvent::key_down("m"), t0 + Duration::from_millis(150));
        assert!(!outcome.has_fired(id));
    }

    #[test]
    fn test_sequence_timeout_validation() {
        let service = HotkeysService::default();
        let id = service.register("g>m", &HotkeyOptions::new()).unwrap();

        assert!(service.set_sequence_timeout(Duration::ZERO).is_err());
        assert_eq!(service.sequence_timeout(), Duration::from_millis(1500));

        service.set_sequence_timeout(Duration::MAX).unwrap();
        let t0 = Instant::now();
        assert!(service.dispatch_at(&KeyEvent::key_down("g"), t0).is_empty());
        let outcome = service.dispatch_at(&KeyEvent::key_down("m"), t0 + Duration::from_secs(3600));
        assert!(outcome.has_fired(id));
    }

    #[test]
    fn test_modifier_press_between_steps() {
        let service = HotkeysService::default();
        let id = service.register("g>shift.a", &HotkeyOptions::new()).unwrap();

        service.dispatch(&KeyEvent::key_down("g"));
        service.dispatch(&KeyEvent::key_down("Shift").with_modifiers(crate::Modifiers::SHIFT));
        let outcome =
            service.dispatch(&KeyEvent::key_down("A").with_modifiers(crate::Modifiers::SHIFT));
        assert!(outcome.has_fired(id));
    }
}
