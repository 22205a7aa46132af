//! Key, modifier and key-specification types.
//!
//! - [`Modifiers`]: The set of held modifier keys (ctrl/shift/alt/meta)
//! - [`Key`]: A canonical, lowercase key identifier in the DOM `key` space
//! - [`KeySpec`]: A single combination, one key plus modifiers (`ctrl.s`)
//! - [`SequenceSpec`]: Two or more combinations pressed in order (`g>m`)
//! - [`HotkeyKeys`]: Either of the above, as produced by the parser
//!
//! Canonical rendering uses `.` between the parts of a combination and `>`
//! between the steps of a sequence, so `"Ctrl+Shift+K"` renders as
//! `"ctrl.shift.k"`.

use std::fmt;

use crate::error::InvalidSpecError;

// =============================================================================
// Modifiers
// =============================================================================

/// A single modifier key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    Meta,
}

impl Modifier {
    /// Resolve a case-insensitive modifier alias.
    pub fn from_alias(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Self::Ctrl),
            "shift" => Some(Self::Shift),
            "alt" | "option" => Some(Self::Alt),
            "meta" | "cmd" | "command" | "super" | "win" | "os" => Some(Self::Meta),
            _ => None,
        }
    }

    /// Identify the modifier a DOM `key` value names (`"Shift"`, `"Control"`).
    ///
    /// `AltGraph` counts as alt; `OS`, `Super` and `Hyper` count as meta.
    pub fn from_key_name(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "control" => Some(Self::Ctrl),
            "shift" => Some(Self::Shift),
            "alt" | "altgraph" => Some(Self::Alt),
            "meta" | "os" | "super" | "hyper" => Some(Self::Meta),
            _ => None,
        }
    }

    /// The canonical token for this modifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ctrl => "ctrl",
            Self::Shift => "shift",
            Self::Alt => "alt",
            Self::Meta => "meta",
        }
    }
}

/// Modifier keys held during a key event or required by a combination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// The Control key is held.
    pub ctrl: bool,
    /// The Shift key is held.
    pub shift: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta key is held (Cmd on macOS, Windows key elsewhere).
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Alt modifier only.
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    /// Meta modifier only.
    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    /// Control + Shift modifiers.
    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        shift: true,
        ..Self::NONE
    };

    /// Returns `true` if no modifier is held.
    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }

    /// Mark a modifier as held.
    pub fn insert(&mut self, modifier: Modifier) {
        match modifier {
            Modifier::Ctrl => self.ctrl = true,
            Modifier::Shift => self.shift = true,
            Modifier::Alt => self.alt = true,
            Modifier::Meta => self.meta = true,
        }
    }

    /// Returns `true` if the modifier is held.
    pub fn contains(self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Ctrl => self.ctrl,
            Modifier::Shift => self.shift,
            Modifier::Alt => self.alt,
            Modifier::Meta => self.meta,
        }
    }

    /// Iterate the held modifiers in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        [Modifier::Ctrl, Modifier::Shift, Modifier::Alt, Modifier::Meta]
            .into_iter()
            .filter(move |m| self.contains(*m))
    }
}

// =============================================================================
// Key
// =============================================================================

/// Named keys, in their canonical (lowercased DOM `key`) form.
const NAMED_KEYS: &[&str] = &[
    "escape",
    "enter",
    "tab",
    "space",
    "backspace",
    "delete",
    "insert",
    "home",
    "end",
    "pageup",
    "pagedown",
    "arrowup",
    "arrowdown",
    "arrowleft",
    "arrowright",
    "capslock",
    "contextmenu",
    "printscreen",
    "pause",
    "scrolllock",
    "numlock",
];

/// Highest supported function key (`f24`).
const MAX_FUNCTION_KEY: u8 = 24;

/// A canonical key identifier.
///
/// Keys live in the lowercased DOM `KeyboardEvent.key` space: printable
/// characters are themselves (`"a"`, `"/"`), named keys use their DOM name
/// (`"escape"`, `"arrowup"`, `"f5"`). Modifier keys are never primary keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    /// Normalize a raw key token (spec token or DOM event key).
    ///
    /// Returns `None` for unknown tokens and for modifier keys.
    pub fn normalize(raw: &str) -> Option<Self> {
        if raw == " " {
            return Some(Self("space".to_string()));
        }

        let lower = raw.to_lowercase();
        let mut chars = lower.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if ch.is_whitespace() || ch.is_control() {
                return None;
            }
            return Some(Self(lower));
        }

        let canonical = match lower.as_str() {
            "esc" => "escape",
            "return" => "enter",
            "spacebar" => "space",
            "del" => "delete",
            "ins" => "insert",
            "pgup" => "pageup",
            "pgdn" => "pagedown",
            "up" => "arrowup",
            "down" => "arrowdown",
            "left" => "arrowleft",
            "right" => "arrowright",
            "plus" => "+",
            "minus" => "-",
            "period" | "dot" => ".",
            "comma" => ",",
            "slash" => "/",
            "backslash" => "\\",
            "semicolon" => ";",
            "quote" => "'",
            "backquote" | "grave" => "`",
            "equal" | "equals" => "=",
            "greater" => ">",
            "bracketleft" => "[",
            "bracketright" => "]",
            name if NAMED_KEYS.contains(&name) || is_function_key(name) => name,
            _ => return None,
        };

        Some(Self(canonical.to_string()))
    }

    /// The canonical identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Separator characters render by name so the output parses back.
        let name = match self.0.as_str() {
            "." => "period",
            "+" => "plus",
            ">" => "greater",
            other => other,
        };
        f.write_str(name)
    }
}

fn is_function_key(name: &str) -> bool {
    name.strip_prefix('f')
        .filter(|digits| !digits.starts_with('0'))
        .and_then(|digits| digits.parse::<u8>().ok())
        .is_some_and(|n| (1..=MAX_FUNCTION_KEY).contains(&n))
}

// =============================================================================
// Key Specification (Single Combination)
// =============================================================================

/// A single key combination: one primary key plus the exact modifiers held.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeySpec {
    /// The modifier keys that must be held.
    pub modifiers: Modifiers,
    /// The primary key.
    pub key: Key,
}

impl KeySpec {
    /// Create a new combination from a key and modifiers.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { modifiers, key }
    }

    /// Check if this combination exactly matches the given key and modifiers.
    pub fn matches(&self, key: &Key, modifiers: Modifiers) -> bool {
        self.key == *key && self.modifiers == modifiers
    }
}

impl fmt::Display for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in self.modifiers.iter() {
            write!(f, "{}.", modifier.as_str())?;
        }
        write!(f, "{}", self.key)
    }
}

// =============================================================================
// Sequence Specification
// =============================================================================

/// An ordered list of two or more combinations, pressed one after another.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SequenceSpec {
    steps: Vec<KeySpec>,
}

impl SequenceSpec {
    /// Build a sequence from its steps.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSpecError::SequenceTooShort`] for fewer than two steps.
    pub fn new(steps: Vec<KeySpec>) -> Result<Self, InvalidSpecError> {
        if steps.len() < 2 {
            return Err(InvalidSpecError::SequenceTooShort);
        }
        Ok(Self { steps })
    }

    /// The combinations in press order.
    pub fn steps(&self) -> &[KeySpec] {
        &self.steps
    }

    /// Number of combinations (always at least two).
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for SequenceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(">")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Parsed Hotkey Keys
// =============================================================================

/// The parsed form of a key specification string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HotkeyKeys {
    /// A single combination such as `a` or `ctrl.shift.k`.
    Combo(KeySpec),
    /// A multi-step sequence such as `g>m`.
    Sequence(SequenceSpec),
}

impl HotkeyKeys {
    /// Returns `true` for multi-step sequences.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// The combinations in press order (one for a combo).
    pub fn steps(&self) -> &[KeySpec] {
        match self {
            Self::Combo(spec) => std::slice::from_ref(spec),
            Self::Sequence(seq) => seq.steps(),
        }
    }

    /// Number of combinations.
    pub fn len(&self) -> usize {
        self.steps().len()
    }

    /// Always `false`; a parsed spec has at least one combination.
    pub fn is_empty(&self) -> bool {
        self.steps().is_empty()
    }

    /// Two specs conflict if they are equal or one is a prefix of the other.
    pub fn conflicts_with(&self, other: &HotkeyKeys) -> bool {
        self.steps()
            .iter()
            .zip(other.steps())
            .all(|(a, b)| a == b)
    }
}

impl fmt::Display for HotkeyKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Combo(spec) => write!(f, "{spec}"),
            Self::Sequence(seq) => write!(f, "{seq}"),
        }
    }
}
