//! Engine configuration.
//!
//! ```toml
//! sequence_timeout_ms = 1000
//! editable_tags = ["INPUT", "TEXTAREA", "SELECT"]
//!
//! [default_options]
//! prevent_default = false
//! ```

use std::path::Path;
use std::time::Duration;

use horizon_hotkeys_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::options::HotkeyOptions;

/// Default inter-keystroke window for sequences (in milliseconds).
pub const DEFAULT_SEQUENCE_TIMEOUT_MS: u64 = 1500;

/// Tag names treated as editable when nothing else is configured.
pub const DEFAULT_EDITABLE_TAGS: [&str; 3] = ["INPUT", "TEXTAREA", "SELECT"];

/// Configuration for the match engine and registration defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeysConfig {
    /// Maximum time between two steps of a sequence.
    #[serde(rename = "sequence_timeout_ms", with = "duration_ms")]
    pub sequence_timeout: Duration,

    /// Focused-element tag names that suppress hotkeys unless allowed.
    pub editable_tags: Vec<String>,

    /// Defaults for options a registration leaves unset.
    pub default_options: HotkeyOptions,
}

impl Default for HotkeysConfig {
    fn default() -> Self {
        Self {
            sequence_timeout: Duration::from_millis(DEFAULT_SEQUENCE_TIMEOUT_MS),
            editable_tags: DEFAULT_EDITABLE_TAGS.iter().map(|t| t.to_string()).collect(),
            default_options: HotkeyOptions::default(),
        }
    }
}

impl HotkeysConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML. Missing fields take their defaults.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: HotkeysConfig = toml::from_str(toml)?;
        let config = config.validated()?;
        tracing::debug!(
            target: targets::CONFIG,
            timeout_ms = config.sequence_timeout.as_millis() as u64,
            editable_tags = ?config.editable_tags,
            "loaded hotkeys config"
        );
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        Self::from_toml_str(&text)
    }

    /// Set the sequence timeout. `Duration::MAX` disables expiry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for a zero timeout.
    pub fn with_sequence_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.sequence_timeout = validate_sequence_timeout(timeout)?;
        Ok(self)
    }

    /// Replace the editable tag names.
    pub fn with_editable_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.editable_tags = normalize_tag_list(tags);
        self
    }

    /// Set the registration option defaults.
    pub fn with_default_options(mut self, options: HotkeyOptions) -> Self {
        self.default_options = options;
        self
    }

    /// Reject unusable values and normalize tag names.
    fn validated(mut self) -> Result<Self> {
        validate_sequence_timeout(self.sequence_timeout)?;
        self.editable_tags = normalize_tag_list(&self.editable_tags);
        Ok(self)
    }
}

/// Reject a zero sequence timeout.
pub(crate) fn validate_sequence_timeout(timeout: Duration) -> Result<Duration> {
    if timeout.is_zero() {
        return Err(Error::invalid_config("sequence timeout must be greater than 0"));
    }
    Ok(timeout)
}

/// Uppercase and trim tag names, dropping blanks and repeats but keeping order.
fn normalize_tag_list<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_ascii_uppercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
