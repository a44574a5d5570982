//! Credential resolution for the Spot API
//!
//! Credentials are resolved from an ordered list of sources: the credential
//! file, then the environment, then static values from the target config.
//! The first source that yields a complete (non-empty) credential wins; only
//! when every source is exhausted does resolution fail.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::Deserialize;
use tracing::debug;

use super::config::TargetConfig;
use super::error::{ConfigError, Result};

pub const ENV_TOKEN: &str = "SPOTINST_TOKEN";
pub const ENV_ACCOUNT: &str = "SPOTINST_ACCOUNT";
pub const ENV_CREDENTIALS_FILE: &str = "SPOTINST_CREDENTIALS_FILE";

/// Default credential file location, relative to the home directory.
const DEFAULT_CREDENTIALS_PATH: &str = ".spotinst/credentials";

/// A resolved Spot API credential pair.
#[derive(Debug, Clone)]
pub struct SpotCredentials {
    pub token: String,
    pub account_id: String,
}

/// On-disk credential file shape (TOML).
#[derive(Debug, Deserialize)]
struct CredentialFile {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    account: Option<String>,
}

/// Resolve credentials by walking the source chain in order.
pub fn resolve(config: &TargetConfig) -> Result<SpotCredentials> {
    for source in [Source::File, Source::Environment, Source::Static] {
        if let Some(credentials) = source.load(config)? {
            debug!(source = source.name(), "resolved Spot credentials");
            return Ok(credentials);
        }
    }
    Err(ConfigError::NoCredentials)
}

#[derive(Clone, Copy)]
enum Source {
    File,
    Environment,
    Static,
}

impl Source {
    fn name(self) -> &'static str {
        match self {
            Source::File => "credential-file",
            Source::Environment => "environment",
            Source::Static => "static-config",
        }
    }

    fn load(self, config: &TargetConfig) -> Result<Option<SpotCredentials>> {
        match self {
            Source::File => load_file(),
            Source::Environment => Ok(load_environment()),
            Source::Static => load_static(config),
        }
    }
}

/// Location of the credential file: `$SPOTINST_CREDENTIALS_FILE` when set,
/// otherwise `~/.spotinst/credentials`.
fn credentials_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(ENV_CREDENTIALS_FILE)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }
    BaseDirs::new().map(|dirs| dirs.home_dir().join(DEFAULT_CREDENTIALS_PATH))
}

/// A missing file yields nothing and the chain moves on; an unreadable or
/// malformed file is a hard error so a typo never silently falls through to
/// weaker sources.
fn load_file() -> Result<Option<SpotCredentials>> {
    let Some(path) = credentials_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }

    let text = fs::read_to_string(&path).map_err(|source| ConfigError::CredentialFileLoad {
        path: path.display().to_string(),
        source,
    })?;
    let parsed: CredentialFile =
        toml::from_str(&text).map_err(|source| ConfigError::CredentialFileParse {
            path: path.display().to_string(),
            source,
        })?;

    Ok(complete(parsed.token, parsed.account))
}

fn load_environment() -> Option<SpotCredentials> {
    complete(env::var(ENV_TOKEN).ok(), env::var(ENV_ACCOUNT).ok())
}

/// Static config values are the last resort. Supplying only one of the pair
/// is a configuration mistake, not an empty source, and errors out with the
/// missing field named.
fn load_static(config: &TargetConfig) -> Result<Option<SpotCredentials>> {
    match (config.static_token(), config.static_account_id()) {
        (None, None) => Ok(None),
        (Some(token), Some(account_id)) => Ok(Some(SpotCredentials {
            token: token.to_string(),
            account_id: account_id.to_string(),
        })),
        (None, Some(_)) => Err(ConfigError::IncompleteStaticCredentials { field: "token" }),
        (Some(_), None) => Err(ConfigError::IncompleteStaticCredentials { field: "account_id" }),
    }
}

fn complete(token: Option<String>, account: Option<String>) -> Option<SpotCredentials> {
    match (token, account) {
        (Some(token), Some(account_id)) if !token.is_empty() && !account_id.is_empty() => {
            Some(SpotCredentials { token, account_id })
        }
        _ => None,
    }
}
