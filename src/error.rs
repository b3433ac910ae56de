//! Error and warning types
//!
//! Configuration problems never abort loading: they are [`ConfigWarning`]s,
//! logged and recorded while a safe default is used instead. [`PartcfgError`]
//! is reserved for the things around the core that can genuinely fail, such
//! as reading a configuration file.

use thiserror::Error;

use crate::types::{InvalidChoiceError, SwapChoice};

/// Recoverable configuration problem.
///
/// Every variant has a defined fallback; the configuration always ends up in
/// a valid state after one is recorded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// Both `userSwapChoices` and a legacy swap key were given
    #[error("Partition-module configuration mixes old- and new-style swap settings")]
    MixedSwapSettings,

    /// A deprecated key was used; it is still honored
    #[error("Partition-module setting *{key}* is deprecated")]
    DeprecatedSetting { key: &'static str },

    /// A choice name did not match the name table
    #[error("Unknown name {name:?} for *{key}*")]
    UnrecognizedName { key: &'static str, name: String },

    /// None of the `userSwapChoices` entries was usable
    #[error("Partition-module configuration for *userSwapChoices* is empty: {given:?}")]
    EmptySwapChoices { given: Vec<String> },

    /// A swap choice that is recognized but not implemented
    #[error("Partition-module does not support *userSwapChoices* setting {choice}")]
    UnsupportedSwapChoice { choice: SwapChoice },

    /// A raw integer outside the enum's range was substituted
    #[error("{source}; using the default instead")]
    OutOfRange { source: InvalidChoiceError },

    /// `initialSwapChoice` is not offered by the resolved choice set
    #[error(
        "Configuration for *initialSwapChoice* ({requested}) is not one of the *userSwapChoices*, using {substituted}"
    )]
    InitialSwapNotOffered {
        requested: SwapChoice,
        substituted: SwapChoice,
    },

    /// A filesystem name that could not be canonicalized
    #[error("Filesystem {name:?} is not a known filesystem type")]
    UnknownFilesystem { name: String },
}

/// Log a warning and keep it for the caller to inspect.
pub(crate) fn record(warnings: &mut Vec<ConfigWarning>, warning: ConfigWarning) {
    tracing::warn!("{}", warning);
    warnings.push(warning);
}

/// Main error type for partcfg
#[derive(Error, Debug)]
pub enum PartcfgError {
    /// IO errors (configuration and storage files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse errors in module configuration files
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration document is not a key/value mapping
    #[error("Configuration error: {0}")]
    Config(String),

    /// A raw integer that names no choice
    #[error(transparent)]
    InvalidChoice(#[from] InvalidChoiceError),
}

/// Result type alias for partcfg operations
pub type Result<T> = std::result::Result<T, PartcfgError>;

impl PartcfgError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
