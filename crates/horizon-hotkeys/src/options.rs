//! Registration options.
//!
//! [`HotkeyOptions`] is a partial options bag: every field is optional and
//! unset fields fall back to configured defaults, then to built-in defaults.
//! It deserializes from the JSON shape UI layers already use:
//!
//! ```
//! use horizon_hotkeys::{HotkeyOptions, KeyPhase};
//!
//! let options = HotkeyOptions::from_json(r#"{"trigger": "keyup", "allowIn": ["INPUT"]}"#)?;
//! assert_eq!(options.trigger, Some(KeyPhase::KeyUp));
//! # Ok::<(), horizon_hotkeys::Error>(())
//! ```

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The keyboard event phase a registration responds to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyPhase {
    /// Key pressed.
    #[default]
    KeyDown,
    /// Key released.
    KeyUp,
}

impl fmt::Display for KeyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyDown => f.write_str("keydown"),
            Self::KeyUp => f.write_str("keyup"),
        }
    }
}

/// Options bag accepted at registration time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotkeyOptions {
    /// Event phase to respond to (default keydown).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<KeyPhase>,

    /// Editable element tags the hotkey may fire in (default none).
    #[serde(alias = "allow_in", skip_serializing_if = "Option::is_none")]
    pub allow_in: Option<Vec<String>>,

    /// Ask the caller to suppress the default action (default true).
    #[serde(alias = "prevent_default", skip_serializing_if = "Option::is_none")]
    pub prevent_default: Option<bool>,

    /// List the hotkey in help listings (default true).
    #[serde(alias = "show_in_help_menu", skip_serializing_if = "Option::is_none")]
    pub show_in_help_menu: Option<bool>,

    /// Help-menu group name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Help-menu description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl HotkeyOptions {
    /// Create an empty options bag (all defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an options bag from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the trigger phase.
    pub fn with_trigger(mut self, trigger: KeyPhase) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Set the editable element tags the hotkey may fire in.
    pub fn with_allow_in<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_in = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Set whether the default action should be suppressed.
    pub fn with_prevent_default(mut self, prevent_default: bool) -> Self {
        self.prevent_default = Some(prevent_default);
        self
    }

    /// Set whether the hotkey appears in help listings.
    pub fn with_show_in_help_menu(mut self, show: bool) -> Self {
        self.show_in_help_menu = Some(show);
        self
    }

    /// Set the help-menu group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Set the help-menu description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Fill every unset field from `defaults`.
    pub fn merged_over(&self, defaults: &HotkeyOptions) -> HotkeyOptions {
        HotkeyOptions {
            trigger: self.trigger.or(defaults.trigger),
            allow_in: self.allow_in.clone().or_else(|| defaults.allow_in.clone()),
            prevent_default: self.prevent_default.or(defaults.prevent_default),
            show_in_help_menu: self.show_in_help_menu.or(defaults.show_in_help_menu),
            group: self.group.clone().or_else(|| defaults.group.clone()),
            description: self
                .description
                .clone()
                .or_else(|| defaults.description.clone()),
        }
    }

    /// Apply the built-in defaults to every unset field.
    pub fn resolve(&self) -> ResolvedOptions {
        ResolvedOptions {
            trigger: self.trigger.unwrap_or_default(),
            allow_in: normalize_tags(self.allow_in.iter().flatten()),
            prevent_default: self.prevent_default.unwrap_or(true),
            show_in_help_menu: self.show_in_help_menu.unwrap_or(true),
            group: self.group.clone(),
            description: self.description.clone(),
        }
    }
}

/// Fully-defaulted options, as stored on a registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub trigger: KeyPhase,
    pub allow_in: BTreeSet<String>,
    pub prevent_default: bool,
    pub show_in_help_menu: bool,
    pub group: Option<String>,
    pub description: Option<String>,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        HotkeyOptions::default().resolve()
    }
}

/// Uppercase, trim and deduplicate element tag names.
pub(crate) fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_ascii_uppercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}
