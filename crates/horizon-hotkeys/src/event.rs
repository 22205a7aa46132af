//! Keyboard events as forwarded by the UI layer.

use crate::key::{Key, Modifier, Modifiers};
use crate::options::KeyPhase;

/// A raw keyboard event.
///
/// `key` is the platform key identifier as delivered (`"a"`, `"A"`,
/// `"ArrowUp"`, `" "`); it is normalized when matched. `target_tag` is the
/// tag name of the element that has focus, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key identifier as delivered by the event source.
    pub key: String,
    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
    /// Whether the key went down or up.
    pub phase: KeyPhase,
    /// Tag name of the focused element.
    pub target_tag: Option<String>,
}

impl KeyEvent {
    /// Create an event with no modifiers and no focused element.
    pub fn new(key: impl Into<String>, phase: KeyPhase) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::NONE,
            phase,
            target_tag: None,
        }
    }

    /// Create a keydown event.
    pub fn key_down(key: impl Into<String>) -> Self {
        Self::new(key, KeyPhase::KeyDown)
    }

    /// Create a keyup event.
    pub fn key_up(key: impl Into<String>) -> Self {
        Self::new(key, KeyPhase::KeyUp)
    }

    /// Set the held modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the tag name of the focused element.
    pub fn in_element(mut self, tag: impl Into<String>) -> Self {
        self.target_tag = Some(tag.into());
        self
    }

    /// The canonical key, or `None` if the key is not recognized.
    pub fn normalized_key(&self) -> Option<Key> {
        Key::normalize(&self.key)
    }

    /// Returns `true` if the key itself is a modifier (`"Shift"`, `"Control"`, ...).
    pub fn is_modifier_key(&self) -> bool {
        Modifier::from_key_name(&self.key).is_some()
    }

    /// The focused element's tag name, uppercased.
    pub fn target_tag_upper(&self) -> Option<String> {
        self.target_tag
            .as_deref()
            .map(|tag| tag.trim().to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let event = KeyEvent::key_up("K")
            .with_modifiers(Modifiers::CTRL)
            .in_element("input");

        assert_eq!(event.phase, KeyPhase::KeyUp);
        assert_eq!(event.modifiers, Modifiers::CTRL);
        assert_eq!(event.target_tag_upper().as_deref(), Some("INPUT"));
        assert_eq!(event.normalized_key().unwrap().as_str(), "k");
    }

    #[test]
    fn test_modifier_key_names() {
        for key in ["Shift", "Control", "Alt", "AltGraph", "Meta", "OS"] {
            assert!(KeyEvent::key_down(key).is_modifier_key(), "{key}");
        }
        assert!(!KeyEvent::key_down("a").is_modifier_key());
        assert!(!KeyEvent::key_down("Unidentified").is_modifier_key());
    }

    #[test]
    fn test_unknown_key_does_not_normalize() {
        assert!(KeyEvent::key_down("Unidentified").normalized_key().is_none());
        assert!(KeyEvent::key_down("Shift").normalized_key().is_none());
    }
}
