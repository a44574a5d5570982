//! Provider adapters for Spot elastigroups
//!
//! One elastigroup API, three cloud variants with distinct endpoint trees and
//! document shapes. Each adapter normalizes its variant into the canonical
//! types here: a capacity snapshot, a provider-tagged group handle, and a
//! flat per-instance state list. The adapter is selected exactly once, from
//! configuration, so a request can never be dispatched against the wrong
//! variant; the only cross-provider hazard left is a stale [`GroupHandle`],
//! and that is rejected explicitly by every update path.

pub mod aws;
pub mod azure;
pub mod gcp;

pub use aws::AwsProvider;
pub use azure::AzureProvider;
pub use gcp::GcpProvider;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::client::SpotClient;
use crate::error::{Result, TargetError};

use aws::AwsGroup;
use azure::AzureGroup;
use gcp::GcpGroup;

/// Supported cloud variants of the elastigroup API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloudProvider {
    Aws,
    Azure,
    Gcp,
}

impl CloudProvider {
    /// Parse a config-supplied provider tag.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "aws" => Ok(CloudProvider::Aws),
            "azure" => Ok(CloudProvider::Azure),
            "gcp" => Ok(CloudProvider::Gcp),
            other => Err(TargetError::UnknownProvider {
                tag: other.to_string(),
            }),
        }
    }

    /// The wire tag, also used in error messages.
    pub fn tag(self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Azure => "azure",
            CloudProvider::Gcp => "gcp",
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Canonical capacity snapshot of a scaling group.
///
/// Provider-reported; `min <= target <= max` is the provider's invariant to
/// hold, not ours to re-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupCapacity {
    pub target: i64,
    pub min: i64,
    pub max: i64,
}

/// Canonical per-instance state.
///
/// `raw_state` keeps the provider's native vocabulary; readiness
/// normalization happens at aggregation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStatus {
    pub id: String,
    pub raw_state: String,
}

/// Provider-tagged handle to the group document returned by the last read.
///
/// Only valid within the read-then-update of a single operation: remote state
/// may change between invocations, so handles are never cached or reused.
#[derive(Debug, Clone)]
pub enum GroupHandle {
    Aws(AwsGroup),
    Azure(AzureGroup),
    Gcp(GcpGroup),
}

impl GroupHandle {
    /// Which provider's update path this handle may be passed to.
    pub fn provider(&self) -> CloudProvider {
        match self {
            GroupHandle::Aws(_) => CloudProvider::Aws,
            GroupHandle::Azure(_) => CloudProvider::Azure,
            GroupHandle::Gcp(_) => CloudProvider::Gcp,
        }
    }
}

/// Capacity snapshot plus the handle needed for a follow-up update.
#[derive(Debug, Clone)]
pub struct GroupState {
    pub capacity: GroupCapacity,
    pub handle: GroupHandle,
}

/// Capability contract every cloud variant implements.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupProvider: Send + Sync {
    /// The variant this adapter serves.
    fn provider(&self) -> CloudProvider;

    /// Fetch the group's capacity snapshot and an update handle.
    async fn read_group(&self, group_id: &str) -> Result<GroupState>;

    /// Fetch per-instance state for every instance in the group.
    async fn group_status(&self, group_id: &str) -> Result<Vec<NodeStatus>>;

    /// Set the group's target capacity.
    ///
    /// Safe to repeat with the same target; each accepted call may still
    /// trigger a fresh convergence cycle on the provider side.
    async fn update_capacity(&self, handle: GroupHandle, target: i64) -> Result<()>;
}

/// Select the adapter for a configured provider tag.
///
/// Called once at controller construction; an unrecognized tag fails here,
/// before any operation path exists.
pub fn provider_for(tag: &str, client: Arc<SpotClient>) -> Result<Box<dyn GroupProvider>> {
    Ok(match CloudProvider::from_tag(tag)? {
        CloudProvider::Aws => Box::new(AwsProvider::new(client)),
        CloudProvider::Azure => Box::new(AzureProvider::new(client)),
        CloudProvider::Gcp => Box::new(GcpProvider::new(client)),
    })
}
