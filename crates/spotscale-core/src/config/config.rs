//! Target configuration parsed from the orchestrator's string-keyed map
//!
//! The orchestrator hands every target a flat `map<string, string>`. This
//! module validates the keys this target cares about and freezes them into an
//! immutable [`TargetConfig`] for the lifetime of the controller.

use std::collections::HashMap;

use url::Url;

use super::error::{ConfigError, Result};

pub const CONFIG_KEY_PROVIDER: &str = "provider";
pub const CONFIG_KEY_GROUP_ID: &str = "group_id";
pub const CONFIG_KEY_TOKEN: &str = "token";
pub const CONFIG_KEY_ACCOUNT_ID: &str = "account_id";
pub const CONFIG_KEY_API_URL: &str = "api_url";

/// Immutable target configuration.
///
/// Constructed once per controller; the provider selection and group identity
/// never change after that, so remote state is always re-read per operation
/// rather than carried here.
#[derive(Debug, Clone)]
pub struct TargetConfig {
    provider: String,
    group_id: String,
    token: Option<String>,
    account_id: Option<String>,
    api_url: Option<String>,
    raw: HashMap<String, String>,
}

impl TargetConfig {
    /// Validate and freeze a raw config map.
    ///
    /// `provider` and `group_id` are required and must be non-empty. The
    /// credential keys are optional here; whether credentials are ultimately
    /// available is decided by the resolution chain in
    /// [`super::credential::resolve`].
    pub fn from_map(raw: &HashMap<String, String>) -> Result<Self> {
        let provider = require(raw, CONFIG_KEY_PROVIDER)?;
        let group_id = require(raw, CONFIG_KEY_GROUP_ID)?;

        let api_url = optional(raw, CONFIG_KEY_API_URL);
        if let Some(ref url) = api_url {
            Url::parse(url).map_err(|source| ConfigError::InvalidApiUrl {
                url: url.clone(),
                source,
            })?;
        }

        Ok(Self {
            provider,
            group_id,
            token: optional(raw, CONFIG_KEY_TOKEN),
            account_id: optional(raw, CONFIG_KEY_ACCOUNT_ID),
            api_url,
            raw: raw.clone(),
        })
    }

    /// The configured provider tag, e.g. `"aws"`. Validated against the
    /// supported set when the provider adapter is selected, not here.
    pub fn provider_tag(&self) -> &str {
        &self.provider
    }

    /// The elastigroup identifier all operations act on.
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Static API token from the config map, if any.
    pub fn static_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Static account id from the config map, if any.
    pub fn static_account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    /// Base URL override for the Spot API.
    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    /// Look up any other key from the raw map. External collaborators
    /// (e.g. the cluster inventory utility) read their own namespaced keys
    /// through this.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.raw.get(key).map(String::as_str)
    }
}

fn require(raw: &HashMap<String, String>, field: &'static str) -> Result<String> {
    match raw.get(field) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => Err(ConfigError::MissingField { field }),
    }
}

fn optional(raw: &HashMap<String, String>, field: &str) -> Option<String> {
    raw.get(field).filter(|v| !v.is_empty()).cloned()
}
