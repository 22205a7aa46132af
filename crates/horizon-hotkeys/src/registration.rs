//! Hotkey registrations and the store that owns them.
//!
//! The [`RegistrationStore`] keeps registrations in insertion order. That
//! order drives both help listings and the iteration order of the match
//! engine, so dispatch results are deterministic. Entries are never mutated
//! in place; an update is an unregister followed by a register.

use std::collections::BTreeSet;

use horizon_hotkeys_core::logging::targets;
use slotmap::{SlotMap, new_key_type};

use crate::error::InvalidSpecError;
use crate::key::HotkeyKeys;
use crate::options::{HotkeyOptions, KeyPhase, ResolvedOptions};
use crate::parser;

new_key_type! {
    /// Unique identifier assigned to a registration.
    ///
    /// Identifiers of removed registrations are never handed out again.
    pub struct RegistrationId;
}

/// A registered hotkey.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HotkeyRegistration {
    id: RegistrationId,
    keys: String,
    spec: HotkeyKeys,
    options: ResolvedOptions,
}

impl HotkeyRegistration {
    /// The registration's identifier.
    pub fn id(&self) -> RegistrationId {
        self.id
    }

    /// The key specification exactly as registered (e.g. `"g>m"`).
    pub fn keys(&self) -> &str {
        &self.keys
    }

    /// The parsed key specification.
    pub fn spec(&self) -> &HotkeyKeys {
        &self.spec
    }

    /// Returns `true` for multi-step sequences.
    pub fn is_sequence(&self) -> bool {
        self.spec.is_sequence()
    }

    pub fn group(&self) -> Option<&str> {
        self.options.group.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.options.description.as_deref()
    }

    pub fn trigger(&self) -> KeyPhase {
        self.options.trigger
    }

    pub fn prevent_default(&self) -> bool {
        self.options.prevent_default
    }

    pub fn show_in_help_menu(&self) -> bool {
        self.options.show_in_help_menu
    }

    /// Uppercase tag names the hotkey may fire in while they have focus.
    pub fn allow_in(&self) -> &BTreeSet<String> {
        &self.options.allow_in
    }

    /// Check whether an uppercase tag name is in `allow_in`.
    pub fn allows(&self, tag: &str) -> bool {
        self.options.allow_in.contains(tag)
    }
}

/// Ordered collection of live registrations.
#[derive(Debug, Default)]
pub struct RegistrationStore {
    entries: SlotMap<RegistrationId, HotkeyRegistration>,
    order: Vec<RegistrationId>,
    defaults: HotkeyOptions,
}

impl RegistrationStore {
    /// Create an empty store using the built-in option defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store whose unset options fall back to `defaults`.
    pub fn with_defaults(defaults: HotkeyOptions) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// Replace the option defaults used by later registrations.
    pub fn set_defaults(&mut self, defaults: HotkeyOptions) {
        self.defaults = defaults;
    }

    /// Parse `keys`, apply defaults to `options`, and append a registration.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidSpecError`] if `keys` does not parse; nothing is
    /// registered in that case.
    pub fn register(
        &mut self,
        keys: &str,
        options: &HotkeyOptions,
    ) -> Result<RegistrationId, InvalidSpecError> {
        let spec = parser::parse(keys)?;
        let options = options.merged_over(&self.defaults).resolve();

        let conflicts = self.find_conflicts(&spec);
        if !conflicts.is_empty() {
            tracing::warn!(
                target: targets::STORE,
                keys,
                conflicts = conflicts.len(),
                "hotkey overlaps existing registrations"
            );
        }

        let id = self.entries.insert_with_key(|id| HotkeyRegistration {
            id,
            keys: keys.to_string(),
            spec,
            options,
        });
        self.order.push(id);

        tracing::debug!(target: targets::STORE, keys, ?id, "registered hotkey");
        Ok(id)
    }

    /// Remove a registration. Absent ids are ignored.
    pub fn unregister(&mut self, id: RegistrationId) -> Option<HotkeyRegistration> {
        let removed = self.entries.remove(id)?;
        self.order.retain(|entry| *entry != id);

        tracing::debug!(target: targets::STORE, keys = removed.keys(), ?id, "unregistered hotkey");
        Some(removed)
    }

    /// Remove every registration whose parsed keys equal `keys`.
    ///
    /// Returns the removed ids in registration order.
    pub fn remove_by_keys(&mut self, keys: &str) -> Result<Vec<RegistrationId>, InvalidSpecError> {
        let spec = parser::parse(keys)?;
        let matching: Vec<RegistrationId> = self
            .iter()
            .filter(|registration| *registration.spec() == spec)
            .map(HotkeyRegistration::id)
            .collect();

        for id in &matching {
            self.unregister(*id);
        }
        Ok(matching)
    }

    /// Remove all registrations.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Look up a registration.
    pub fn get(&self, id: RegistrationId) -> Option<&HotkeyRegistration> {
        self.entries.get(id)
    }

    /// Check whether a registration is live.
    pub fn contains(&self, id: RegistrationId) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate registrations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &HotkeyRegistration> {
        self.order.iter().filter_map(|id| self.entries.get(*id))
    }

    /// Snapshot of all registrations in registration order.
    pub fn list(&self) -> Vec<HotkeyRegistration> {
        self.iter().cloned().collect()
    }

    /// Snapshot of the registrations in `group`, in registration order.
    pub fn find_by_group(&self, group: &str) -> Vec<HotkeyRegistration> {
        self.iter()
            .filter(|registration| registration.group() == Some(group))
            .cloned()
            .collect()
    }

    /// Distinct group names in order of first appearance.
    pub fn groups(&self) -> Vec<Option<String>> {
        let mut groups: Vec<Option<String>> = Vec::new();
        for registration in self.iter() {
            let group = registration.group().map(str::to_string);
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        groups
    }

    /// Registrations whose keys equal `spec` or are a prefix of it (or vice versa).
    pub fn find_conflicts(&self, spec: &HotkeyKeys) -> Vec<RegistrationId> {
        self.iter()
            .filter(|registration| registration.spec().conflicts_with(spec))
            .map(HotkeyRegistration::id)
            .collect()
    }
}
