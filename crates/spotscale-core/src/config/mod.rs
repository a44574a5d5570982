//! Configuration and credential handling for the target
//!
//! The orchestrator supplies a flat string map; this module freezes it into
//! an immutable [`TargetConfig`] and resolves Spot API credentials from the
//! ordered source chain (credential file, environment, static config).

#![allow(clippy::module_inception)]

pub mod config;
pub mod credential;
pub mod error;

pub use config::{
    CONFIG_KEY_ACCOUNT_ID, CONFIG_KEY_API_URL, CONFIG_KEY_GROUP_ID, CONFIG_KEY_PROVIDER,
    CONFIG_KEY_TOKEN, TargetConfig,
};
pub use credential::{SpotCredentials, resolve as resolve_credentials};
pub use error::{ConfigError, Result};
