use std::sync::Arc;
use std::time::Duration;

use opamp_core::connection::{ConnectionId, ConnectionType};
use opamp_core::instance_uid::InstanceUid;
use opamp_core::ports::{Clock, ConnectionRegistry, Repository, ServerIdentity};
use opamp_core::resolver::RemoteConfigPolicy;
use proto::opamp::{AgentToServer, ServerToAgent};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::mapping::{build_server_to_agent, fallback_server_to_agent, parse_agent_to_server};

/// How long the background close-drain loop waits for a single close job
/// before giving up on it and moving to the next.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// The server half of the OpAMP protocol: per-connection ingest, partial
/// state reconciliation, and `ServerToAgent` assembly. Holds no state of its
/// own between messages; everything durable lives behind `Repository` and
/// `ConnectionRegistry`.
pub struct OpampHandler {
    repository: Arc<dyn Repository>,
    registry: Arc<dyn ConnectionRegistry>,
    clock: Arc<dyn Clock>,
    identity: Arc<dyn ServerIdentity>,
    remote_config_policy: RemoteConfigPolicy,
    close_sender: mpsc::Sender<CloseJob>,
}

struct CloseJob {
    connection_id: ConnectionId,
    instance_uid: Option<InstanceUid>,
}

impl OpampHandler {
    pub fn new(
        repository: Arc<dyn Repository>,
        registry: Arc<dyn ConnectionRegistry>,
        clock: Arc<dyn Clock>,
        identity: Arc<dyn ServerIdentity>,
        remote_config_policy: RemoteConfigPolicy,
    ) -> Self {
        let (close_sender, close_receiver) = mpsc::channel(256);
        let handler = Self {
            repository,
            registry,
            clock,
            identity,
            remote_config_policy,
            close_sender,
        };
        handler.spawn_close_drain_loop(close_receiver);
        handler
    }

    /// One dedicated background task drains close jobs for the lifetime of
    /// the service, because `on_connection_close` is called from an I/O
    /// callback that must not block.
    fn spawn_close_drain_loop(&self, mut receiver: mpsc::Receiver<CloseJob>) {
        let repository = self.repository.clone();
        let registry = self.registry.clone();
        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                let outcome = tokio::time::timeout(CLOSE_TIMEOUT, close_connection(&repository, &registry, &job)).await;
                if outcome.is_err() {
                    warn!(connection_id = %job.connection_id.0, "connection close processing timed out");
                }
            }
        });
    }

    /// Registers a freshly accepted connection. The instance UID is bound
    /// later, once the first message reveals it.
    pub fn on_connected(&self, connection_id: ConnectionId, sender: mpsc::Sender<ServerToAgent>) {
        self.registry.register(connection_id, sender);
    }

    /// The hot path: must complete without blocking the caller beyond
    /// repository/registry I/O, and must always return a well-formed
    /// `ServerToAgent` so the socket is never closed because of an
    /// application-level error.
    pub async fn on_message(
        &self,
        connection_id: &ConnectionId,
        connection_type: ConnectionType,
        wire: &AgentToServer,
    ) -> ServerToAgent {
        let report = match parse_agent_to_server(wire) {
            Ok(report) => report,
            Err(err) => {
                error!(error = %err, "failed to parse AgentToServer, dropping message");
                return ServerToAgent::default();
            }
        };
        let instance_uid = report.instance_uid;
        self.registry.update_instance_uid(connection_id, instance_uid);

        let mut agent = match self.repository.get_or_create_agent(instance_uid).await {
            Ok(agent) => agent,
            Err(err) => {
                error!(instance_uid = %instance_uid, error = %err, "failed to load agent, returning fallback reply");
                return fallback_server_to_agent(&instance_uid);
            }
        };

        agent.report_description(report.description);
        agent.report_capabilities(report.capabilities);
        agent.report_custom_capabilities(report.custom_capabilities);
        agent.report_component_health(report.health);
        agent.report_effective_config(report.effective_config);
        agent.report_package_statuses(report.package_statuses);
        agent.report_available_components(report.available_components);

        let accepts_remote_config = agent
            .capabilities
            .is_some_and(|caps| caps.has(opamp_core::capabilities::Capabilities::REPORTS_REMOTE_CONFIG));
        if accepts_remote_config {
            if let Some((hash, status)) = report.remote_config_status {
                agent.report_remote_config_status(hash, status);
            }
        }

        agent.mark_as_communicated(&self.identity.current(), self.clock.now(), report.sequence_num);
        agent.status.connected = true;
        agent.status.last_connection_type = connection_type;

        let report_full_state = !agent.metadata_is_complete();
        let mut commands = agent.drain_commands();
        if agent.should_be_restarted() && !commands.contains(&opamp_core::agent::Command::Restart) {
            commands.push(opamp_core::agent::Command::Restart);
        }

        if let Err(err) = self.repository.save_agent(agent.clone()).await {
            error!(instance_uid = %instance_uid, error = %err, "failed to persist agent, will retry on next message");
        }

        let groups = self.repository.list_groups().await.unwrap_or_else(|err| {
            error!(error = %err, "failed to list groups while building remote config");
            Vec::new()
        });
        let remote_config = opamp_core::resolver::build_remote_config(&agent, &groups);
        let connection_settings = opamp_core::resolver::effective_connection_settings(&agent, &groups, self.remote_config_policy);

        build_server_to_agent(&agent, remote_config, connection_settings, commands, report_full_state)
    }

    pub fn on_connection_close(&self, connection_id: ConnectionId, instance_uid: Option<InstanceUid>) {
        let job = CloseJob { connection_id, instance_uid };
        if self.close_sender.try_send(job).is_err() {
            warn!("close drain channel saturated, dropping close job");
        }
    }
}

async fn close_connection(repository: &Arc<dyn Repository>, registry: &Arc<dyn ConnectionRegistry>, job: &CloseJob) {
    registry.unregister(&job.connection_id);
    let Some(instance_uid) = job.instance_uid else {
        return;
    };
    match repository.get_agent(instance_uid).await {
        Ok(Some(mut agent)) => {
            agent.status.connected = false;
            if let Err(err) = repository.save_agent(agent).await {
                error!(instance_uid = %instance_uid, error = %err, "failed to persist disconnect");
            }
        }
        Ok(None) => debug!(instance_uid = %instance_uid, "agent vanished before close could be processed"),
        Err(err) => error!(instance_uid = %instance_uid, error = %err, "failed to load agent for close processing"),
    }
}

/// Integration-style tests driving `on_message` end to end against a real
/// `InMemoryStore` and connection registry, covering the scenarios an
/// OpAMP server must get right: first contact, group priority, the
/// applied-hash dedupe, and out-of-order sequence numbers.
#[cfg(test)]
mod test {
    use std::sync::Arc;

    use opamp_core::capabilities::Capabilities;
    use opamp_core::group::{AgentConfig, AgentGroup};
    use opamp_core::hash::new_hash;
    use opamp_core::ports::{Repository, StaticServerIdentity, SystemClock};
    use opamp_store::InMemoryStore;
    use proto::anyvalue::any_value::Value;
    use proto::anyvalue::{AnyValue, KeyValue};
    use proto::opamp::{AgentDescription, AgentToServer, RemoteConfigStatus as WireRemoteConfigStatus, RemoteConfigStatuses};

    use super::*;
    use crate::registry::InMemoryConnectionRegistry;

    fn handler_with_store() -> (OpampHandler, Arc<InMemoryStore>) {
        let clock = Arc::new(SystemClock);
        let store = Arc::new(InMemoryStore::new(clock.clone()));
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let identity = Arc::new(StaticServerIdentity("test-server".to_string()));
        let handler = OpampHandler::new(store.clone(), registry, clock, identity, RemoteConfigPolicy::default());
        (handler, store)
    }

    fn string_kv(key: &str, value: &str) -> KeyValue {
        KeyValue {
            key: key.to_string(),
            value: Some(AnyValue {
                value: Some(Value::StringValue(value.to_string())),
            }),
        }
    }

    fn group(name: &str, priority: i64, value: &str) -> AgentGroup {
        AgentGroup {
            name: name.to_string(),
            priority,
            agent_config: Some(AgentConfig {
                value: value.as_bytes().to_vec(),
                content_type: "text/yaml".to_string(),
                connection_settings: None,
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn first_sight_agent_is_created_and_connected() {
        let (handler, store) = handler_with_store();
        let uid = opamp_core::instance_uid::InstanceUid::generate();
        let conn = ConnectionId::generate();

        let wire = AgentToServer {
            instance_uid: uid.as_bytes().to_vec(),
            sequence_num: 1,
            capabilities: Capabilities::REPORTS_STATUS,
            agent_description: Some(AgentDescription {
                identifying_attributes: vec![string_kv("service.name", "otel")],
                non_identifying_attributes: Vec::new(),
            }),
            ..Default::default()
        };

        let reply = handler.on_message(&conn, ConnectionType::WebSocket, &wire).await;

        assert_eq!(reply.instance_uid, uid.as_bytes().to_vec());
        assert!(reply.remote_config.is_none());

        let stored = store.get_agent(uid).await.unwrap().unwrap();
        assert!(stored.status.connected);
        assert_eq!(stored.status.last_connection_type, ConnectionType::WebSocket);
        assert_eq!(stored.status.last_reported_sequence_num, 1);
    }

    #[tokio::test]
    async fn group_priority_selects_the_higher_priority_config() {
        let (handler, store) = handler_with_store();
        store.save_group(group("g1", 10, "A")).await.unwrap();
        store.save_group(group("g2", 20, "B")).await.unwrap();

        let uid = opamp_core::instance_uid::InstanceUid::generate();
        let conn = ConnectionId::generate();
        let wire = AgentToServer {
            instance_uid: uid.as_bytes().to_vec(),
            sequence_num: 1,
            capabilities: Capabilities::ACCEPTS_REMOTE_CONFIG,
            ..Default::default()
        };

        let reply = handler.on_message(&conn, ConnectionType::WebSocket, &wire).await;

        let remote_config = reply.remote_config.expect("expected a remote config");
        assert_eq!(remote_config.config_hash, new_hash(b"B").as_bytes().to_vec());
        let config = remote_config.config.expect("expected a config body");
        assert_eq!(config.config_map.get("opampcommander").unwrap().body, b"B");
    }

    #[tokio::test]
    async fn applied_hash_yields_a_hash_only_reply_on_the_next_message() {
        let (handler, store) = handler_with_store();
        store.save_group(group("g1", 10, "B")).await.unwrap();

        let uid = opamp_core::instance_uid::InstanceUid::generate();
        let conn = ConnectionId::generate();
        let base_wire = AgentToServer {
            instance_uid: uid.as_bytes().to_vec(),
            capabilities: Capabilities::ACCEPTS_REMOTE_CONFIG | Capabilities::REPORTS_REMOTE_CONFIG,
            ..Default::default()
        };

        let first = AgentToServer {
            sequence_num: 1,
            ..base_wire.clone()
        };
        let first_reply = handler.on_message(&conn, ConnectionType::WebSocket, &first).await;
        assert!(first_reply.remote_config.unwrap().config.is_some());

        let second = AgentToServer {
            sequence_num: 2,
            remote_config_status: Some(WireRemoteConfigStatus {
                last_remote_config_hash: new_hash(b"B").as_bytes().to_vec(),
                status: RemoteConfigStatuses::Applied as i32,
                error_message: String::new(),
            }),
            ..base_wire
        };
        let second_reply = handler.on_message(&conn, ConnectionType::WebSocket, &second).await;

        let remote_config = second_reply.remote_config.expect("expected a hash-only reply");
        assert!(remote_config.config.is_none());
        assert_eq!(remote_config.config_hash, new_hash(b"B").as_bytes().to_vec());
    }

    #[tokio::test]
    async fn out_of_order_sequence_number_does_not_regress_the_high_water_mark() {
        let (handler, store) = handler_with_store();
        let uid = opamp_core::instance_uid::InstanceUid::generate();
        let conn = ConnectionId::generate();

        let first = AgentToServer {
            instance_uid: uid.as_bytes().to_vec(),
            sequence_num: 5,
            ..Default::default()
        };
        handler.on_message(&conn, ConnectionType::WebSocket, &first).await;

        let second = AgentToServer {
            instance_uid: uid.as_bytes().to_vec(),
            sequence_num: 3,
            ..Default::default()
        };
        let reply = handler.on_message(&conn, ConnectionType::WebSocket, &second).await;

        assert_eq!(reply.instance_uid, uid.as_bytes().to_vec());
        let stored = store.get_agent(uid).await.unwrap().unwrap();
        assert_eq!(stored.status.last_reported_sequence_num, 5);
    }

    #[tokio::test]
    async fn incomplete_metadata_forces_report_full_state() {
        let (handler, _store) = handler_with_store();
        let uid = opamp_core::instance_uid::InstanceUid::generate();
        let conn = ConnectionId::generate();

        let wire = AgentToServer {
            instance_uid: uid.as_bytes().to_vec(),
            sequence_num: 1,
            ..Default::default()
        };
        let reply = handler.on_message(&conn, ConnectionType::WebSocket, &wire).await;

        assert_eq!(reply.flags & proto::opamp::ServerToAgentFlags::ReportFullState as u64, proto::opamp::ServerToAgentFlags::ReportFullState as u64);
    }

    #[tokio::test]
    async fn malformed_instance_uid_is_dropped_with_an_empty_reply() {
        let (handler, _store) = handler_with_store();
        let conn = ConnectionId::generate();
        let wire = AgentToServer {
            instance_uid: vec![1, 2, 3],
            ..Default::default()
        };

        let reply = handler.on_message(&conn, ConnectionType::WebSocket, &wire).await;

        assert!(reply.instance_uid.is_empty());
        assert!(reply.remote_config.is_none());
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn malformed_instance_uid_logs_the_parse_failure() {
        let (handler, _store) = handler_with_store();
        let conn = ConnectionId::generate();
        let wire = AgentToServer {
            instance_uid: vec![1, 2, 3],
            ..Default::default()
        };

        handler.on_message(&conn, ConnectionType::WebSocket, &wire).await;

        assert!(tracing_test::logs_contain("failed to parse AgentToServer"));
    }

    #[tokio::test]
    async fn connection_close_disconnects_the_agent() {
        let (handler, store) = handler_with_store();
        let uid = opamp_core::instance_uid::InstanceUid::generate();
        let conn = ConnectionId::generate();
        let wire = AgentToServer {
            instance_uid: uid.as_bytes().to_vec(),
            sequence_num: 1,
            ..Default::default()
        };
        handler.on_message(&conn, ConnectionType::WebSocket, &wire).await;

        handler.on_connection_close(conn, Some(uid));
        tokio::time::sleep(Duration::from_millis(50)).await;

        let stored = store.get_agent(uid).await.unwrap().unwrap();
        assert!(!stored.status.connected);
    }
}
