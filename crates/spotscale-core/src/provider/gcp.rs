//! GCP elastigroup adapter

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::client::{ApiError, SpotClient};
use crate::error::{Result, TargetError};

use super::{CloudProvider, GroupCapacity, GroupHandle, GroupProvider, GroupState, NodeStatus};

/// Native GCP elastigroup document; untyped fields are carried through
/// updates verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcpGroup {
    pub id: String,
    pub capacity: GcpCapacity,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcpCapacity {
    pub target: i64,
    pub minimum: i64,
    pub maximum: i64,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// GCP status entries name the lifecycle value `statusName`.
#[derive(Debug, Deserialize)]
struct GcpInstance {
    #[serde(rename = "instanceName", default)]
    instance_name: Option<String>,
    #[serde(rename = "statusName", default)]
    status_name: Option<String>,
}

pub struct GcpProvider {
    client: Arc<SpotClient>,
}

impl GcpProvider {
    pub fn new(client: Arc<SpotClient>) -> Self {
        Self { client }
    }

    fn group_path(group_id: &str) -> String {
        format!("/gcp/gce/group/{group_id}")
    }
}

#[async_trait]
impl GroupProvider for GcpProvider {
    fn provider(&self) -> CloudProvider {
        CloudProvider::Gcp
    }

    async fn read_group(&self, group_id: &str) -> Result<GroupState> {
        let groups: Vec<GcpGroup> = self
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
            handle: GroupHandle::Gcp(group),
        })
    }

    async fn group_status(&self, group_id: &str) -> Result<Vec<NodeStatus>> {
        let instances: Vec<GcpInstance> = self
            .client
            .get_items(&format!("{}/status", Self::group_path(group_id)))
            .await
            .map_err(|source| status_error(group_id, source))?;

        Ok(instances
            .into_iter()
            .map(|vm| NodeStatus {
                id: vm.instance_name.unwrap_or_default(),
                raw_state: vm.status_name.unwrap_or_default(),
            })
            .collect())
    }

    async fn update_capacity(&self, handle: GroupHandle, target: i64) -> Result<()> {
        let mut group = match handle {
            GroupHandle::Gcp(group) => group,
            other => {
                return Err(TargetError::HandleMismatch {
                    expected: CloudProvider::Gcp,
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
        provider: CloudProvider::Gcp,
        group_id: group_id.to_string(),
        source,
    }
}

fn status_error(group_id: &str, source: ApiError) -> TargetError {
    TargetError::GroupStatus {
        provider: CloudProvider::Gcp,
        group_id: group_id.to_string(),
        source,
    }
}

fn update_error(group_id: &str, source: ApiError) -> TargetError {
    TargetError::GroupUpdate {
        provider: CloudProvider::Gcp,
        group_id: group_id.to_string(),
        source,
    }
}
