//! # spotscale-core
//!
//! Autoscaler target engine for Spot Elastigroups. An external orchestrator
//! decides *how many* instances a group should have; this crate turns that
//! decision into provider-specific calls against one of three cloud variants
//! of the elastigroup API (AWS, Azure, GCP) and reports group readiness back.
//!
//! The engine does three things:
//!
//! 1. **Normalize**: each cloud exposes its own endpoint tree, group
//!    document, and instance-state vocabulary; the [`provider`] adapters
//!    fold all three into one capability contract (read capacity, read
//!    status, update capacity).
//! 2. **Decide**: [`scaling`] maps (current, desired) to a direction and
//!    checks the desired count against the group's capacity bounds.
//! 3. **Aggregate**: [`readiness`] folds per-instance state into a single
//!    verdict, ready only when every reported instance is running.
//!
//! [`target::ElastigroupTarget`] wires these together behind the two
//! operations the orchestrator invokes, `scale` and `status`. Everything is
//! single-shot: no internal retries, no caching across invocations, and no
//! mutual exclusion; the orchestrator owns the schedule.
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use spotscale_core::{ClusterPool, ElastigroupTarget, ScalingAction, TargetConfig};
//!
//! /// Stand-in for the orchestrator's cluster-inventory utility.
//! struct AlwaysReady;
//!
//! #[async_trait::async_trait]
//! impl ClusterPool for AlwaysReady {
//!     async fn is_pool_ready(&self, _config: &TargetConfig) -> anyhow::Result<bool> {
//!         Ok(true)
//!     }
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HashMap::from([
//!     ("provider".to_string(), "aws".to_string()),
//!     ("group_id".to_string(), "sig-1234567".to_string()),
//!     ("token".to_string(), "spot-token".to_string()),
//!     ("account_id".to_string(), "act-1234".to_string()),
//! ]);
//!
//! let target = ElastigroupTarget::new(&config, Arc::new(AlwaysReady))?;
//!
//! target.scale(ScalingAction { count: 3, dry_run: false }).await?;
//!
//! let status = target.status().await?;
//! println!("ready={} count={}", status.ready, status.count);
//! # Ok(())
//! # }
//! ```
//!
//! # Credentials
//!
//! Spot API credentials are resolved from an ordered chain: credential file
//! (`$SPOTINST_CREDENTIALS_FILE`, falling back to `~/.spotinst/credentials`),
//! then `SPOTINST_TOKEN`/`SPOTINST_ACCOUNT` environment variables, then the
//! `token`/`account_id` config keys. The first complete pair wins.

pub mod client;
pub mod config;
pub mod error;
pub mod provider;
pub mod readiness;
pub mod scaling;
pub mod target;

pub use client::{ApiError, DEFAULT_API_URL, SpotClient};
pub use config::{ConfigError, SpotCredentials, TargetConfig};
pub use error::{Result, TargetError};
pub use provider::{
    CloudProvider, GroupCapacity, GroupHandle, GroupProvider, GroupState, NodeStatus, provider_for,
};
pub use readiness::ReadinessReport;
pub use scaling::{BoundsViolation, ScaleDirection, direction, validate_bounds};
pub use target::{
    ClusterPool, ElastigroupTarget, NODE_ID_ATTRIBUTE, ScalingAction, TargetStatus,
    node_instance_id,
};
