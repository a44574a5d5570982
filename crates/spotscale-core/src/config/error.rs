//! Error types for configuration and credential resolution

use thiserror::Error;

/// Errors that can occur while building a target configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} is a required field")]
    MissingField { field: &'static str },

    #[error("{field} is required when using static credentials")]
    IncompleteStaticCredentials { field: &'static str },

    #[error(
        "unable to find Spot credentials: no credential file, environment variables, or static config values"
    )]
    NoCredentials,

    #[error("failed to load credential file {path}: {source}")]
    CredentialFileLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse credential file {path}: {source}")]
    CredentialFileParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid api_url {url:?}: {source}")]
    InvalidApiUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
