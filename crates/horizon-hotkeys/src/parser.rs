//! Key specification parser.
//!
//! Turns plain-text hotkey definitions into [`HotkeyKeys`].
//!
//! ## Supported Syntax
//!
//! ```text
//! spec     = combo (">" combo)*
//! combo    = token (("." | "+") token)*
//! token    = modifier | key
//! modifier = "ctrl" | "control" | "shift" | "alt" | "option"
//!          | "meta" | "cmd" | "command" | "super" | "win"
//! key      = char | named-key | fn-key
//! ```
//!
//! Every combination holds exactly one key and any number of modifiers, in
//! any order. Tokens are case-insensitive and surrounding whitespace is
//! ignored. Separator characters are spelled by name when used as keys
//! (`ctrl.plus`, `shift.period`, `alt.greater`).

use std::str::FromStr;

use horizon_hotkeys_core::logging::targets;

use crate::error::InvalidSpecError;
use crate::key::{HotkeyKeys, Key, KeySpec, Modifier, Modifiers, SequenceSpec};

/// Separates the steps of a sequence.
pub const SEQUENCE_SEPARATOR: char = '>';

/// Separate the tokens of a single combination.
pub const COMBO_SEPARATORS: [char; 2] = ['.', '+'];

/// Parse a key specification string.
///
/// One step yields [`HotkeyKeys::Combo`], two or more `>`-separated steps
/// yield [`HotkeyKeys::Sequence`].
///
/// # Errors
///
/// Returns an [`InvalidSpecError`] for empty input, blank parts, unknown
/// tokens, or steps with zero or several primary keys.
pub fn parse(spec: &str) -> Result<HotkeyKeys, InvalidSpecError> {
    let result = parse_inner(spec);
    if let Err(err) = &result {
        tracing::debug!(target: targets::PARSER, spec, %err, "rejected key specification");
    }
    result
}

fn parse_inner(spec: &str) -> Result<HotkeyKeys, InvalidSpecError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(InvalidSpecError::Empty);
    }

    let mut steps = spec
        .split(SEQUENCE_SEPARATOR)
        .enumerate()
        .map(|(step, part)| parse_combo(part, step))
        .collect::<Result<Vec<_>, _>>()?;

    if steps.len() == 1 {
        Ok(HotkeyKeys::Combo(steps.remove(0)))
    } else {
        Ok(HotkeyKeys::Sequence(SequenceSpec::new(steps)?))
    }
}

/// Parse one combination such as `"ctrl.shift.k"`.
fn parse_combo(part: &str, step: usize) -> Result<KeySpec, InvalidSpecError> {
    if part.trim().is_empty() {
        return Err(InvalidSpecError::EmptyPart { step });
    }

    let mut modifiers = Modifiers::NONE;
    let mut key: Option<(Key, &str)> = None;

    for token in part.split(COMBO_SEPARATORS) {
        let token = token.trim();
        if token.is_empty() {
            return Err(InvalidSpecError::EmptyPart { step });
        }

        if let Some(modifier) = Modifier::from_alias(token) {
            modifiers.insert(modifier);
            continue;
        }

        let parsed =
            Key::normalize(token).ok_or_else(|| InvalidSpecError::UnknownKey(token.to_string()))?;
        if let Some((_, first)) = key {
            return Err(InvalidSpecError::MultipleKeys {
                first: first.to_string(),
                second: token.to_string(),
            });
        }
        key = Some((parsed, token));
    }

    match key {
        Some((key, _)) => Ok(KeySpec::new(key, modifiers)),
        None => Err(InvalidSpecError::NoKey),
    }
}

impl FromStr for HotkeyKeys {
    type Err = InvalidSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl FromStr for KeySpec {
    type Err = InvalidSpecError;

    /// Parse a single combination; sequences are rejected as `UnexpectedSequence`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse(s)? {
            HotkeyKeys::Combo(spec) => Ok(spec),
            HotkeyKeys::Sequence(seq) => Err(InvalidSpecError::UnexpectedSequence(seq.to_string())),
        }
    }
}
