//! Unified error handling for spotscale-core
//!
//! Every provider-level failure is wrapped with the operation that failed and
//! the provider/group it was aimed at before it reaches the orchestrator.
//! There is no retry here: one invocation makes exactly one attempt per
//! external call, and the orchestrator re-invokes on its own schedule.

use thiserror::Error;

use crate::client::ApiError;
use crate::config::ConfigError;
use crate::provider::CloudProvider;

/// Error type for all target operations
#[derive(Error, Debug)]
pub enum TargetError {
    /// Configuration or credential resolution failure
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The configured provider tag is not one of the supported variants
    #[error("unknown provider {tag:?}: expected \"aws\", \"azure\", or \"gcp\"")]
    UnknownProvider { tag: String },

    /// Building the API client failed
    #[error("failed to build Spot API client: {0}")]
    ClientBuild(#[source] ApiError),

    /// Reading the group's capacity snapshot failed
    #[error("could not read {provider} group {group_id}: {source}")]
    GroupRead {
        provider: CloudProvider,
        group_id: String,
        #[source]
        source: ApiError,
    },

    /// Reading per-instance state failed
    #[error("could not read {provider} group {group_id} status: {source}")]
    GroupStatus {
        provider: CloudProvider,
        group_id: String,
        #[source]
        source: ApiError,
    },

    /// Applying the new target capacity failed
    #[error("could not update {provider} group {group_id}: {source}")]
    GroupUpdate {
        provider: CloudProvider,
        group_id: String,
        #[source]
        source: ApiError,
    },

    /// A group handle was passed to a different provider's update path
    #[error("group handle belongs to {actual}, not {expected}; refusing to update")]
    HandleMismatch {
        expected: CloudProvider,
        actual: CloudProvider,
    },

    /// The external cluster-inventory precheck failed
    #[error("failed to run cluster node readiness check: {0}")]
    ReadinessCheck(#[source] anyhow::Error),

    /// Outer context for any failure inside the scaling action
    #[error("failed to perform scaling action: {0}")]
    ScalingFailed(#[source] Box<TargetError>),

    /// An orchestrator node is missing the attribute that maps it to a
    /// provider instance
    #[error("node attribute {attribute:?} not found")]
    MissingNodeAttribute { attribute: &'static str },
}

/// Result type alias for target operations
pub type Result<T> = std::result::Result<T, TargetError>;

impl TargetError {
    /// The provider this error is tagged with, when there is one.
    #[must_use]
    pub fn provider(&self) -> Option<CloudProvider> {
        match self {
            TargetError::GroupRead { provider, .. }
            | TargetError::GroupStatus { provider, .. }
            | TargetError::GroupUpdate { provider, .. } => Some(*provider),
            TargetError::HandleMismatch { expected, .. } => Some(*expected),
            TargetError::ScalingFailed(inner) => inner.provider(),
            _ => None,
        }
    }

    /// Returns true when the orchestrator's next periodic invocation has a
    /// reasonable chance of succeeding (transient API failures).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            TargetError::GroupRead { source, .. }
            | TargetError::GroupStatus { source, .. }
            | TargetError::GroupUpdate { source, .. } => source.is_retryable(),
            TargetError::ScalingFailed(inner) => inner.is_retryable(),
            _ => false,
        }
    }
}
