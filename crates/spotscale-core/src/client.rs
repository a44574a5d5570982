//! HTTP client for the Spot management API
//!
//! All three provider variants are served by the same management API, so one
//! client is shared across adapters: bearer-token auth, an `accountId` query
//! parameter on every call, and a `{"response": {"items": [...]}}` envelope
//! around every payload.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::SpotCredentials;

/// User agent string for spotscale HTTP requests
const SPOTSCALE_USER_AGENT: &str = concat!("spotscale/", env!("CARGO_PKG_VERSION"));

/// Production endpoint of the Spot management API.
pub const DEFAULT_API_URL: &str = "https://api.spotinst.io";

/// Errors from the Spot API transport layer
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {code}: {message}")]
    Api { code: u16, message: String },

    #[error("response contained no items")]
    EmptyResponse,

    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ApiError {
    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Api { code: 404, .. })
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::Api { code, .. } if *code >= 500)
    }

    /// Returns true if the underlying request timed out
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Request(e) if e.is_timeout())
    }

    /// Returns true if this error is worth the orchestrator retrying on its
    /// next invocation (this layer itself never retries)
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.is_server_error() || self.is_timeout()
    }
}

/// Standard response envelope of the Spot API.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub response: ApiItems<T>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct ApiItems<T> {
    #[serde(default)]
    pub items: Vec<T>,
}

/// Authenticated client for the Spot management API.
#[derive(Debug, Clone)]
pub struct SpotClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
    account_id: String,
}

impl SpotClient {
    /// Build a client from resolved credentials and an optional base-URL
    /// override.
    pub fn new(credentials: SpotCredentials, base_url: Option<&str>) -> Result<Self, ApiError> {
        let raw = base_url.unwrap_or(DEFAULT_API_URL);
        let base_url = Url::parse(raw).map_err(|source| ApiError::InvalidBaseUrl {
            url: raw.to_string(),
            source,
        })?;
        let http = reqwest::Client::builder()
            .user_agent(SPOTSCALE_USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: credentials.token,
            account_id: credentials.account_id,
        })
    }

    /// GET `path` and unwrap the item list from the response envelope.
    pub(crate) async fn get_items<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.http.get(url).bearer_auth(&self.token).send().await?;
        Self::parse_items(response).await
    }

    /// PUT a JSON body to `path`, discarding the response payload.
    pub(crate) async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .put(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|source| ApiError::InvalidBaseUrl {
                url: format!("{}{}", self.base_url, path),
                source,
            })?;
        url.query_pairs_mut()
            .append_pair("accountId", &self.account_id);
        Ok(url)
    }

    async fn parse_items<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, ApiError> {
        let response = Self::ensure_success(response).await?;
        let envelope: ApiEnvelope<T> = response.json().await?;
        Ok(envelope.response.items)
    }

    async fn ensure_success(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(Self::api_error(status, response).await)
    }

    async fn api_error(status: StatusCode, response: Response) -> ApiError {
        let body = response.text().await.unwrap_or_default();
        let message = if body.is_empty() {
            status.canonical_reason().unwrap_or("unknown error").to_string()
        } else {
            body
        };
        ApiError::Api {
            code: status.as_u16(),
            message,
        }
    }
}
