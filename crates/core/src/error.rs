use std::io;
use std::path::PathBuf;

/// Errors that abort a pluginforge run.
///
/// Compatibility failures and step failures are not errors: they are
/// recorded in the run report and never leave their phase.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid unit name '{name}': expected prefix '{prefix}'")]
    InvalidUnitName { name: String, prefix: String },

    #[error("Unit '{0}' was not found in the plugins directory")]
    UnknownUnit(String),

    #[error("Cannot read plugins directory {path}: {source}")]
    UnitSourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Duplicate step key: {0}")]
    DuplicateStepKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error belongs to the configuration class.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidUnitName { .. }
                | Error::UnknownUnit(_)
                | Error::UnitSourceUnreadable { .. }
                | Error::DuplicateStepKey(_)
                | Error::ConfigError(_)
        )
    }
}

/// Result type alias for pluginforge operations
pub type Result<T> = std::result::Result<T, Error>;
