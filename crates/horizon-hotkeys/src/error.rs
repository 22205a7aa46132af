//! Error types for the hotkey engine.

use std::path::PathBuf;

/// Result type alias for hotkey operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A key specification string could not be parsed.
///
/// Raised synchronously at registration time. Dispatching events never fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSpecError {
    /// The specification string is empty.
    #[error("empty key specification")]
    Empty,

    /// A `>`-separated step or a `.`/`+`-separated token is blank.
    #[error("blank key specification part at step {step}")]
    EmptyPart { step: usize },

    /// A step has modifiers but no primary key.
    #[error("no key specified (only modifiers)")]
    NoKey,

    /// A step names more than one primary key.
    #[error("more than one key in a combination: '{first}' and '{second}'")]
    MultipleKeys { first: String, second: String },

    /// A token is neither a modifier nor a recognized key.
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// A sequence was given where a single combination is expected.
    #[error("expected a single key combination, got sequence '{0}'")]
    UnexpectedSequence(String),

    /// A sequence was built from fewer than two combinations.
    #[error("a key sequence needs at least two combinations")]
    SequenceTooShort,
}

/// Errors that can occur while configuring or registering hotkeys.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed key specification.
    #[error(transparent)]
    InvalidSpec(#[from] InvalidSpecError),

    /// Malformed JSON options bag.
    #[error("invalid hotkey options: {0}")]
    Options(#[from] serde_json::Error),

    /// Malformed TOML configuration.
    #[error("invalid hotkeys config: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration parsed but holds an unusable value.
    #[error("invalid hotkeys config: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("failed to read hotkeys config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an invalid-config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
