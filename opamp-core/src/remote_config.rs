use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::group::AgentConfig;
use crate::hash::Hash;
use crate::time::Time;

/// Shared bookkeeping for standalone named resources (`AgentRemoteConfig`,
/// `AgentPackage`): a unique name, creation time, and soft-delete marker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceMeta {
    pub name: String,
    pub created_at: Time,
    pub deleted_at: Option<Time>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemoteConfigStatus {
    pub referenced_by_group_count: u64,
}

/// A named, reusable remote-config body that groups reference by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentRemoteConfig {
    pub metadata: ResourceMeta,
    pub spec: AgentConfig,
    pub status: RemoteConfigStatus,
    pub conditions: Vec<Condition>,
}

impl AgentRemoteConfig {
    /// Applies an administrator update, preserving `status` and
    /// `metadata.created_at` as a sanity filter against clients that submit
    /// a full round-tripped resource body with stale observed fields.
    pub fn apply_update(&mut self, mut incoming: AgentRemoteConfig) {
        incoming.status = self.status.clone();
        incoming.metadata.created_at = self.metadata.created_at;
        incoming.metadata.deleted_at = self.metadata.deleted_at;
        *self = incoming;
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PackageSpec {
    pub version: String,
    pub download_url: String,
    pub content_hash: Hash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackageStatus {
    pub referenced_by_group_count: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentPackage {
    pub metadata: ResourceMeta,
    pub spec: PackageSpec,
    pub status: PackageStatus,
    pub conditions: Vec<Condition>,
}

impl AgentPackage {
    pub fn apply_update(&mut self, mut incoming: AgentPackage) {
        incoming.status = self.status;
        incoming.metadata.created_at = self.metadata.created_at;
        incoming.metadata.deleted_at = self.metadata.deleted_at;
        *self = incoming;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn update_preserves_status_and_created_at() {
        let mut existing = AgentRemoteConfig {
            metadata: ResourceMeta {
                name: "base".into(),
                created_at: Time::now(),
                deleted_at: None,
            },
            status: RemoteConfigStatus {
                referenced_by_group_count: 3,
            },
            ..Default::default()
        };
        let created_at = existing.metadata.created_at;

        let incoming = AgentRemoteConfig {
            metadata: ResourceMeta {
                name: "base".into(),
                created_at: Time::zero(),
                deleted_at: None,
            },
            spec: AgentConfig {
                value: b"new body".to_vec(),
                content_type: "text/yaml".into(),
                connection_settings: None,
            },
            status: RemoteConfigStatus::default(),
            conditions: Vec::new(),
        };
        existing.apply_update(incoming);

        assert_eq!(existing.metadata.created_at, created_at);
        assert_eq!(existing.status.referenced_by_group_count, 3);
        assert_eq!(existing.spec.value, b"new body".to_vec());
    }
}
