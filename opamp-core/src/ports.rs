use async_trait::async_trait;

use crate::agent::Agent;
use crate::connection::ConnectionId;
use crate::error::OpampResult;
use crate::group::AgentGroup;
use crate::instance_uid::InstanceUid;
use crate::remote_config::{AgentPackage, AgentRemoteConfig};
use crate::time::Time;

/// A page of list results plus an opaque `continue` cursor. `next_continue`
/// is `None` once the final page has been returned.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_continue: Option<String>,
    pub remaining_item_count: Option<u64>,
}

/// Polymorphism here is deliberately limited to the handful of interface
/// abstractions called out in the design: `Repository`, `ConnectionRegistry`,
/// `Clock`, `ServerIdentity`. Every operation may block on I/O.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait Repository: Send + Sync {
    async fn get_agent(&self, instance_uid: InstanceUid) -> OpampResult<Option<Agent>>;
    async fn get_or_create_agent(&self, instance_uid: InstanceUid) -> OpampResult<Agent>;
    async fn save_agent(&self, agent: Agent) -> OpampResult<()>;
    async fn list_agents(&self, limit: usize, continue_token: Option<String>) -> OpampResult<Page<Agent>>;
    async fn soft_delete_agent(&self, instance_uid: InstanceUid) -> OpampResult<()>;

    async fn get_group(&self, name: String) -> OpampResult<Option<AgentGroup>>;
    async fn list_groups(&self) -> OpampResult<Vec<AgentGroup>>;
    async fn save_group(&self, group: AgentGroup) -> OpampResult<()>;
    async fn delete_group(&self, name: String) -> OpampResult<()>;

    async fn get_remote_config(&self, name: String) -> OpampResult<Option<AgentRemoteConfig>>;
    async fn list_remote_configs(&self, limit: usize, continue_token: Option<String>) -> OpampResult<Page<AgentRemoteConfig>>;
    async fn save_remote_config(&self, config: AgentRemoteConfig) -> OpampResult<()>;
    async fn delete_remote_config(&self, name: String) -> OpampResult<()>;

    async fn get_package(&self, name: String) -> OpampResult<Option<AgentPackage>>;
    async fn list_packages(&self, limit: usize, continue_token: Option<String>) -> OpampResult<Page<AgentPackage>>;
    async fn save_package(&self, package: AgentPackage) -> OpampResult<()>;
    async fn delete_package(&self, name: String) -> OpampResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    NotConnected,
    SendFailed,
}

/// The sending half of a connection's outbound channel; the receiving half
/// lives with the transport task that owns the actual socket write.
pub type OutboundSender = tokio::sync::mpsc::Sender<proto::opamp::ServerToAgent>;

/// The in-memory directory mapping instance UIDs to live WebSocket
/// connections. `send` must respect a caller-supplied deadline and never
/// tears the registry entry down on failure; only `unregister` removes
/// entries.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    fn register(&self, connection_id: ConnectionId, sender: OutboundSender);
    fn update_instance_uid(&self, connection_id: &ConnectionId, instance_uid: InstanceUid);
    fn unregister(&self, connection_id: &ConnectionId);
    async fn send(&self, instance_uid: InstanceUid, message: proto::opamp::ServerToAgent) -> Result<(), SendError>;
    fn list(&self) -> Vec<InstanceUid>;
    fn is_connected(&self, instance_uid: InstanceUid) -> bool;
}

/// Time source abstraction so the domain layer never calls `Utc::now()`
/// directly, keeping tests deterministic.
pub trait Clock: Send + Sync {
    fn now(&self) -> Time;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Time {
        Time::now()
    }
}

/// A process-wide identity snapshot, populated at boot and refreshed via a
/// heartbeat loop external to the core; read concurrently.
pub trait ServerIdentity: Send + Sync {
    fn current(&self) -> String;
}

pub struct StaticServerIdentity(pub String);

impl ServerIdentity for StaticServerIdentity {
    fn current(&self) -> String {
        self.0.clone()
    }
}
