//! The elastigroup target controller
//!
//! Orchestrates one provider adapter against one group: `scale` turns a
//! desired instance count into at most one capacity update, `status` turns
//! per-instance state into a readiness verdict. Holds no mutable state;
//! every operation re-reads the remote group, and concurrent invocations are
//! the orchestrator's responsibility to serialize.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::SpotClient;
use crate::config::{TargetConfig, resolve_credentials};
use crate::error::{Result, TargetError};
use crate::provider::{GroupProvider, provider_for};
use crate::readiness;
use crate::scaling::{self, ScaleDirection};

/// Node attribute that carries the provider-level instance identifier.
pub const NODE_ID_ATTRIBUTE: &str = "unique.hostname";

/// One scaling request from the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingAction {
    /// Desired instance count for the group.
    pub count: i64,
    /// When set, report success without contacting the provider.
    pub dry_run: bool,
}

/// Group status reported back to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetStatus {
    pub ready: bool,
    pub count: i64,
    pub meta: HashMap<String, String>,
}

/// Orchestrator-side view of the node pool backing this target.
///
/// Implemented by the cluster-inventory utility outside this crate; `status`
/// consults it before spending a cloud API call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterPool: Send + Sync {
    /// Whether the orchestrator-visible nodes backing this target are healthy.
    async fn is_pool_ready(&self, config: &TargetConfig) -> anyhow::Result<bool>;
}

/// Map an orchestrator-visible node's attributes to the provider-level
/// instance identifier. Installed by the cluster-inventory utility as its
/// node lookup function.
pub fn node_instance_id(attributes: &HashMap<String, String>) -> Result<String> {
    match attributes.get(NODE_ID_ATTRIBUTE) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => Err(TargetError::MissingNodeAttribute {
            attribute: NODE_ID_ATTRIBUTE,
        }),
    }
}

/// The autoscaler target: one provider, one group, immutable after
/// construction.
pub struct ElastigroupTarget {
    config: TargetConfig,
    provider: Box<dyn GroupProvider>,
    cluster: Arc<dyn ClusterPool>,
}

impl ElastigroupTarget {
    /// Build a target from the orchestrator's raw config map.
    ///
    /// Freezes the config, resolves credentials through the source chain,
    /// and selects the provider adapter. Every misconfiguration (missing
    /// fields, exhausted credential chain, unknown provider tag) surfaces
    /// here, before any operation path exists.
    pub fn new(raw: &HashMap<String, String>, cluster: Arc<dyn ClusterPool>) -> Result<Self> {
        let config = TargetConfig::from_map(raw)?;
        let credentials = resolve_credentials(&config)?;
        let client = SpotClient::new(credentials, config.api_url())
            .map_err(TargetError::ClientBuild)?;
        let provider = provider_for(config.provider_tag(), Arc::new(client))?;

        Ok(Self {
            config,
            provider,
            cluster,
        })
    }

    #[cfg(test)]
    fn with_parts(
        config: TargetConfig,
        provider: Box<dyn GroupProvider>,
        cluster: Arc<dyn ClusterPool>,
    ) -> Self {
        Self {
            config,
            provider,
            cluster,
        }
    }

    /// The configuration this target was built from.
    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// Apply one scaling action.
    ///
    /// Reads the group, computes the direction, and issues at most one
    /// capacity update. A desired count outside the group's bounds is logged
    /// and the update is still issued; the provider enforces its own limits.
    pub async fn scale(&self, action: ScalingAction) -> Result<()> {
        if action.dry_run {
            debug!(
                group_id = self.config.group_id(),
                "dry-run scaling action, skipping"
            );
            return Ok(());
        }

        let state = self.provider.read_group(self.config.group_id()).await?;

        let direction = scaling::direction(state.capacity.target, action.count);
        if direction == ScaleDirection::None {
            info!(
                current_count = state.capacity.target,
                strategy_count = action.count,
                "scaling not required"
            );
            return Ok(());
        }

        if let Err(violation) = scaling::validate_bounds(direction, action.count, &state.capacity) {
            warn!(
                current_count = state.capacity.target,
                strategy_count = action.count,
                %violation,
                "desired count is outside group capacity bounds"
            );
        }

        self.provider
            .update_capacity(state.handle, action.count)
            .await
            .map_err(|err| TargetError::ScalingFailed(Box::new(err)))
    }

    /// Report group readiness.
    ///
    /// The orchestrator's own node pool is checked first; if it is not ready
    /// the verdict is already "not ready" and the cloud API call would not
    /// change the outcome.
    pub async fn status(&self) -> Result<TargetStatus> {
        let pool_ready = self
            .cluster
            .is_pool_ready(&self.config)
            .await
            .map_err(TargetError::ReadinessCheck)?;
        if !pool_ready {
            return Ok(TargetStatus {
                ready: false,
                count: 0,
                meta: HashMap::new(),
            });
        }

        let nodes = self.provider.group_status(self.config.group_id()).await?;
        let report = readiness::aggregate(&nodes);

        Ok(TargetStatus {
            ready: report.ready,
            count: report.count,
            meta: HashMap::new(),
        })
    }
}
