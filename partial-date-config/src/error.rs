//! Error types for partial date configuration loading and storage

use std::path::PathBuf;

use partial_date::PartialDateError;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Layered configuration could not be extracted
    #[error("Failed to parse configuration: {source}")]
    ParseError {
        #[source]
        source: Box<figment::Error>,
    },

    /// A stored configuration object could not be read or written
    #[error("Failed to access configuration file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A stored configuration object is not valid YAML
    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },

    /// Configuration object name cannot be used as a file name
    #[error("Invalid configuration name '{name}'")]
    InvalidName { name: String },

    /// The underlying configuration store failed
    #[error(transparent)]
    Store(#[from] PartialDateError),

    /// Value could not be converted between serde representations
    #[error("Invalid configuration value for '{name}': {source}")]
    InvalidValue {
        name: String,
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn yaml(path: impl Into<PathBuf>, source: serde_yaml_ng::Error) -> Self {
        Self::Yaml {
            path: path.into(),
            source,
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError {
            source: Box::new(error),
        }
    }
}

/// The core crate reports store failures as [`PartialDateError::Store`].
impl From<ConfigError> for PartialDateError {
    fn from(error: ConfigError) -> Self {
        PartialDateError::Store {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = ConfigError::file_access(
            "/tmp/partial_date.settings.yaml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("partial_date.settings.yaml"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_converts_to_store_error() {
        let err: PartialDateError = ConfigError::InvalidName {
            name: "../escape".into(),
        }
        .into();
        match err {
            PartialDateError::Store { message } => assert!(message.contains("../escape")),
            other => panic!("expected store error, got {other:?}"),
        }
    }
}
