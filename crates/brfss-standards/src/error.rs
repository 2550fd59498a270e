#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read registry file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse registry TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown registry generation: {name}")]
    UnknownGeneration { name: String },

    #[error("duplicate canonical column: {name}")]
    DuplicateCanonical { name: String },

    #[error("raw column {alias} is mapped to both {first} and {second}")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("registry declares {count} target columns, expected exactly one")]
    TargetCount { count: usize },

    #[error("column {name}: {message}")]
    InvalidColumn { name: String, message: String },
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidColumn {
            name: name.to_string(),
            message: message.into(),
        }
    }
}
