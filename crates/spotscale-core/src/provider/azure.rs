//! Azure elastigroup adapter

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::client::{ApiError, SpotClient};
use crate::error::{Result, TargetError};

use super::{CloudProvider, GroupCapacity, GroupHandle, GroupProvider, GroupState, NodeStatus};

/// Native Azure elastigroup document; untyped fields are carried through
/// updates verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureGroup {
    pub id: String,
    pub capacity: AzureCapacity,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureCapacity {
    pub target: i64,
    pub minimum: i64,
    pub maximum: i64,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Azure reports VMs as nodes, with the lifecycle value under `state`.
#[derive(Debug, Deserialize)]
struct AzureNode {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

pub struct AzureProvider {
    client: Arc<SpotClient>,
}

impl AzureProvider {
    pub fn new(client: Arc<SpotClient>) -> Self {
        Self { client }
    }

    fn group_path(group_id: &str) -> String {
        format!("/azure/compute/group/{group_id}")
    }
}

#[async_trait]
impl GroupProvider for AzureProvider {
    fn provider(&self) -> CloudProvider {
        CloudProvider::Azure
    }

    async fn read_group(&self, group_id: &str) -> Result<GroupState> {
        let groups: Vec<AzureGroup> = self
            .client
            .get_items(&Self::group_path(group_id))
            .await
            .map_err(|source| read_error(group_id, source))?;
        let group = groups
            .into_iter()
            .next()
            .ok_or_else(|| read_error(group_id, ApiError::EmptyResponse))?;

        let capacity = GroupCapacity {
            target: group.capacity.target,
            min: group.capacity.minimum,
            max: group.capacity.maximum,
        };
        Ok(GroupState {
            capacity,
            handle: GroupHandle::Azure(group),
        })
    }

    async fn group_status(&self, group_id: &str) -> Result<Vec<NodeStatus>> {
        let nodes: Vec<AzureNode> = self
            .client
            .get_items(&format!("{}/status", Self::group_path(group_id)))
            .await
            .map_err(|source| status_error(group_id, source))?;

        Ok(nodes
            .into_iter()
            .map(|vm| NodeStatus {
                id: vm.name.unwrap_or_default(),
                raw_state: vm.state.unwrap_or_default(),
            })
            .collect())
    }

    async fn update_capacity(&self, handle: GroupHandle, target: i64) -> Result<()> {
        let mut group = match handle {
            GroupHandle::Azure(group) => group,
            other => {
                return Err(TargetError::HandleMismatch {
                    expected: CloudProvider::Azure,
                    actual: other.provider(),
                });
            }
        };
        group.capacity.target = target;

        let group_id = group.id.clone();
        self.client
            .put(&Self::group_path(&group_id), &json!({ "group": group }))
            .await
            .map_err(|source| update_error(&group_id, source))
    }
}

fn read_error(group_id: &str, source: ApiError) -> TargetError {
    TargetError::GroupRead {
        provider: CloudProvider::Azure,
        group_id: group_id.to_string(),
        source,
    }
}

fn status_error(group_id: &str, source: ApiError) -> TargetError {
    TargetError::GroupStatus {
        provider: CloudProvider::Azure,
        group_id: group_id.to_string(),
        source,
    }
}

fn update_error(group_id: &str, source: ApiError) -> TargetError {
    TargetError::GroupUpdate {
        provider: CloudProvider::Azure,
        group_id: group_id.to_string(),
        source,
    }
}
