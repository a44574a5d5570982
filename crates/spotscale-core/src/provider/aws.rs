//! AWS elastigroup adapter

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::client::{ApiError, SpotClient};
use crate::error::{Result, TargetError};

use super::{CloudProvider, GroupCapacity, GroupHandle, GroupProvider, GroupState, NodeStatus};

/// Native AWS elastigroup document.
///
/// Only identity and capacity are typed; the rest of the document rides
/// along in `other` so an update PUT sends it back unchanged apart from the
/// new target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsGroup {
    pub id: String,
    pub capacity: AwsCapacity,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsCapacity {
    pub target: i64,
    pub minimum: i64,
    pub maximum: i64,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Per-instance entry from the AWS status endpoint; the state lives in
/// `status` for this variant.
#[derive(Debug, Deserialize)]
struct AwsInstance {
    #[serde(rename = "instanceId", default)]
    instance_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

pub struct AwsProvider {
    client: Arc<SpotClient>,
}

impl AwsProvider {
    pub fn new(client: Arc<SpotClient>) -> Self {
        Self { client }
    }

    fn group_path(group_id: &str) -> String {
        format!("/aws/ec2/group/{group_id}")
    }
}

#[async_trait]
impl GroupProvider for AwsProvider {
    fn provider(&self) -> CloudProvider {
        CloudProvider::Aws
    }

    async fn read_group(&self, group_id: &str) -> Result<GroupState> {
        let groups: Vec<AwsGroup> = self
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
            handle: GroupHandle::Aws(group),
        })
    }

    async fn group_status(&self, group_id: &str) -> Result<Vec<NodeStatus>> {
        let instances: Vec<AwsInstance> = self
            .client
            .get_items(&format!("{}/status", Self::group_path(group_id)))
            .await
            .map_err(|source| status_error(group_id, source))?;

        Ok(instances
            .into_iter()
            .map(|vm| NodeStatus {
                id: vm.instance_id.unwrap_or_default(),
                raw_state: vm.status.unwrap_or_default(),
            })
            .collect())
    }

    async fn update_capacity(&self, handle: GroupHandle, target: i64) -> Result<()> {
        let mut group = match handle {
            GroupHandle::Aws(group) => group,
            other => {
                return Err(TargetError::HandleMismatch {
                    expected: CloudProvider::Aws,
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
        provider: CloudProvider::Aws,
        group_id: group_id.to_string(),
        source,
    }
}

fn status_error(group_id: &str, source: ApiError) -> TargetError {
    TargetError::GroupStatus {
        provider: CloudProvider::Aws,
        group_id: group_id.to_string(),
        source,
    }
}

fn update_error(group_id: &str, source: ApiError) -> TargetError {
    TargetError::GroupUpdate {
        provider: CloudProvider::Aws,
        group_id: group_id.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn group_document_preserves_unknown_fields() {
        let doc = json!({
            "id": "sig-abc",
            "name": "batch-workers",
            "region": "us-east-1",
            "capacity": { "target": 4, "minimum": 1, "maximum": 10, "unit": "instance" },
            "compute": { "product": "Linux/UNIX" }
        });

        let mut group: AwsGroup = serde_json::from_value(doc.clone()).unwrap();
        group.capacity.target = 7;

        let mut expected = doc;
        expected["capacity"]["target"] = json!(7);
        assert_eq!(serde_json::to_value(&group).unwrap(), expected);
    }

    #[test]
    fn instance_entries_tolerate_missing_fields() {
        let vm: AwsInstance = serde_json::from_value(json!({})).unwrap();
        assert!(vm.instance_id.is_none());
        assert!(vm.status.is_none());
    }
}
