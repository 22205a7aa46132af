//! The keystroke match engine.
//!
//! [`MatchEngine`] consumes raw [`KeyEvent`]s and decides which
//! registrations fire. It owns the progress of every in-flight sequence and
//! nothing else; registrations are read from a [`RegistrationStore`].
//!
//! # Dispatch
//!
//! For each registration, in registration order:
//!
//! 1. Registrations whose trigger phase differs from the event are skipped.
//! 2. If the focused element is editable and its tag is not in the
//!    registration's `allow_in`, the registration is skipped entirely. It
//!    neither fires nor advances sequence progress.
//! 3. A combination fires if key and modifiers match exactly.
//! 4. A sequence compares the event against its next expected step:
//!    - progress whose deadline has passed is reset before comparing,
//!    - a match on the last step fires and resets,
//!    - a match on an earlier step advances and renews the deadline,
//!    - a mismatch resets in-flight progress. The mismatching event is not
//!      re-tried against the first step in the same dispatch.
//!
//! A press of a modifier key on its own (`"Shift"`, `"Control"`, ...) is
//! dropped before any of this, so it never disturbs sequence progress.
//! Other unrecognized keys count as a mismatch.
//!
//! A timeout too large to add to an [`Instant`] means the sequence never
//! expires.
//!
//! Timeouts are checked lazily on the next event, so [`MatchEngine::handle_event_at`]
//! is a pure function of the engine state, the store and `now`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use horizon_hotkeys_core::PerfSpan;
use horizon_hotkeys_core::logging::{span_names, targets};

use crate::config::{self, HotkeysConfig};
use crate::error::Result;
use crate::event::KeyEvent;
use crate::key::{HotkeyKeys, Key};
use crate::registration::{HotkeyRegistration, RegistrationId, RegistrationStore};

/// Progress of one sequence registration.
///
/// Only sequences with at least one matched step have an entry, so `index`
/// is always in `1..len`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SequenceProgress {
    /// Index of the next expected step.
    index: usize,
    /// The sequence resets if the next step arrives after this instant.
    /// `None` when the timeout is too large to represent as an instant.
    deadline: Option<Instant>,
}

/// Result of dispatching one keyboard event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Registrations that fired, in registration order, each at most once.
    pub fired: Vec<RegistrationId>,
    /// At least one fired registration asks to suppress the default action.
    pub prevent_default: bool,
}

impl DispatchOutcome {
    /// Returns `true` if nothing fired.
    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }

    /// Check whether a registration fired.
    pub fn has_fired(&self, id: RegistrationId) -> bool {
        self.fired.contains(&id)
    }
}

/// Per-registration verdict for one event.
#[derive(Debug, PartialEq, Eq)]
enum StepResult {
    Fired,
    Advanced,
    Reset,
    Ignored,
}

/// Tracks sequence progress and matches events against registrations.
#[derive(Debug)]
pub struct MatchEngine {
    progress: HashMap<RegistrationId, SequenceProgress>,
    sequence_timeout: Duration,
    editable_tags: Vec<String>,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchEngine {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&HotkeysConfig::default())
    }

    /// Create an engine from a configuration.
    pub fn with_config(config: &HotkeysConfig) -> Self {
        Self {
            progress: HashMap::new(),
            sequence_timeout: config.sequence_timeout,
            editable_tags: config.editable_tags.clone(),
        }
    }

    /// The maximum time allowed between two steps of a sequence.
    pub fn sequence_timeout(&self) -> Duration {
        self.sequence_timeout
    }

    /// Change the sequence timeout. In-flight deadlines are kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig) for a zero timeout.
    pub fn set_sequence_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.sequence_timeout = config::validate_sequence_timeout(timeout)?;
        Ok(())
    }

    /// Check whether an uppercase tag name counts as editable.
    pub fn is_editable(&self, tag: &str) -> bool {
        self.editable_tags.iter().any(|editable| editable == tag)
    }

    /// Drop the progress of a registration (call on unregister).
    pub fn forget(&mut self, id: RegistrationId) {
        self.progress.remove(&id);
    }

    /// Drop all sequence progress.
    pub fn reset(&mut self) {
        self.progress.clear();
    }

    /// Number of sequences with at least one matched step.
    pub fn pending_sequences(&self) -> usize {
        self.progress.len()
    }

    /// Dispatch an event at the current time.
    pub fn handle_event(&mut self, store: &RegistrationStore, event: &KeyEvent) -> DispatchOutcome {
        self.handle_event_at(store, event, Instant::now())
    }

    /// Dispatch an event as if it arrived at `now`.
    pub fn handle_event_at(
        &mut self,
        store: &RegistrationStore,
        event: &KeyEvent,
        now: Instant,
    ) -> DispatchOutcome {
        let _span = PerfSpan::new(span_names::DISPATCH);

        // Modifier presses are not an attempt at any step.
        if event.is_modifier_key() {
            tracing::trace!(target: targets::ENGINE, key = %event.key, "modifier key ignored");
            return DispatchOutcome::default();
        }

        let key = event.normalized_key();
        let target_tag = event.target_tag_upper();
        let editable_tag = target_tag.filter(|tag| self.is_editable(tag));

        let mut outcome = DispatchOutcome::default();

        for registration in store.iter() {
            if registration.trigger() != event.phase {
                continue;
            }

            if let Some(tag) = &editable_tag
                && !registration.allows(tag)
            {
                continue;
            }

            let result = match registration.spec() {
                HotkeyKeys::Combo(spec) => {
                    if key.as_ref().is_some_and(|key| spec.matches(key, event.modifiers)) {
                        StepResult::Fired
                    } else {
                        StepResult::Ignored
                    }
                }
                HotkeyKeys::Sequence(_) => self.step_sequence(registration, key.as_ref(), event, now),
            };

            if result == StepResult::Fired {
                tracing::debug!(
                    target: targets::ENGINE,
                    keys = registration.keys(),
                    id = ?registration.id(),
                    "hotkey fired"
                );
                outcome.fired.push(registration.id());
                outcome.prevent_default |= registration.prevent_default();
            }
        }

        outcome
    }

    /// Advance, complete or reset one sequence registration.
    fn step_sequence(
        &mut self,
        registration: &HotkeyRegistration,
        key: Option<&Key>,
        event: &KeyEvent,
        now: Instant,
    ) -> StepResult {
        let id = registration.id();
        let steps = registration.spec().steps();

        let mut index = match self.progress.get(&id) {
            Some(progress) if progress.deadline.is_some_and(|deadline| now > deadline) => {
                tracing::trace!(target: targets::ENGINE, keys = registration.keys(), "sequence timed out");
                self.progress.remove(&id);
                0
            }
            Some(progress) => progress.index,
            None => 0,
        };

        let matched = key.is_some_and(|key| steps[index].matches(key, event.modifiers));
        if !matched {
            if index == 0 {
                return StepResult::Ignored;
            }
            tracing::trace!(target: targets::ENGINE, keys = registration.keys(), index, "sequence reset");
            self.progress.remove(&id);
            return StepResult::Reset;
        }

        index += 1;
        if index == steps.len() {
            self.progress.remove(&id);
            return StepResult::Fired;
        }

        tracing::trace!(target: targets::ENGINE, keys = registration.keys(), index, "sequence advanced");
        self.progress.insert(
            id,
            SequenceProgress {
                index,
                deadline: now.checked_add(self.sequence_timeout),
            },
        );
        StepResult::Advanced
    }
}
