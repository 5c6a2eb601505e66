use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::capabilities::Capabilities;
use crate::component_health::ComponentHealth;
use crate::condition::Condition;
use crate::connection::ConnectionType;
use crate::hash::Hash;
use crate::instance_uid::InstanceUid;
use crate::time::Time;

/// Identifying vs. non-identifying attribute maps the agent reports about
/// itself (e.g. `service.name`, `host.name`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentDescription {
    pub identifying_attributes: HashMap<String, String>,
    pub non_identifying_attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfigFile {
    pub body: Vec<u8>,
    pub content_type: String,
}

pub type EffectiveConfigMap = HashMap<String, AgentConfigFile>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteConfigStatusValue {
    Unset,
    Applying,
    Applied,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackageStatusValue {
    Installed,
    InstallPending,
    Installing,
    InstallFailed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageStatus {
    pub name: String,
    pub agent_has_version: String,
    pub agent_has_hash: Hash,
    pub server_offered_version: String,
    pub server_offered_hash: Hash,
    pub status: PackageStatusValue,
    pub error_message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentDetails {
    pub metadata: HashMap<String, String>,
    pub sub_component_map: HashMap<String, ComponentDetails>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AvailableComponents {
    pub hash: Hash,
    pub components: HashMap<String, ComponentDetails>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TlsMaterial {
    pub public_key: Vec<u8>,
    pub private_key: Vec<u8>,
    pub ca_public_key: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConnectionSettingsOffer {
    pub opamp_endpoint: Option<String>,
    pub metrics_endpoint: Option<String>,
    pub logs_endpoint: Option<String>,
    pub traces_endpoint: Option<String>,
    pub tls: Option<TlsMaterial>,
}

/// The config bytes the server last resolved as desired for this agent
/// (cached off the group resolver's output, for diagnostics; the resolver
/// recomputes it fresh on every report rather than trusting this cache).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfigDescriptor {
    pub config: Vec<u8>,
    pub hash: Hash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageAvailable {
    pub name: String,
    pub version: String,
    pub download_url: String,
    pub content_hash: Hash,
}

/// A pending server-to-agent directive, drained (never persisted) once
/// included in a `ServerToAgent` reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    RequestFullState,
    Restart,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentSpec {
    pub remote_config: Option<RemoteConfigDescriptor>,
    pub restart_required_at: Time,
    pub new_instance_uid: Option<InstanceUid>,
    pub connection_settings: Option<ConnectionSettingsOffer>,
    pub packages_available: Vec<PackageAvailable>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentStatus {
    pub effective_config: Option<EffectiveConfigMap>,
    pub package_statuses: HashMap<String, PackageStatus>,
    pub component_health: Option<ComponentHealth>,
    pub available_components: Option<AvailableComponents>,
    pub remote_config_statuses: HashMap<Hash, RemoteConfigStatusValue>,
    pub connected: bool,
    pub last_connection_type: ConnectionType,
    pub last_reported_sequence_num: u64,
    pub last_reported_at: Time,
    pub last_server: Option<String>,
    pub conditions: Vec<Condition>,
}

/// The aggregate root: an agent's metadata, administrator-desired spec, and
/// server-observed status, keyed by its 128-bit instance UID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub instance_uid: InstanceUid,
    pub description: Option<AgentDescription>,
    pub capabilities: Option<Capabilities>,
    pub custom_capabilities: Vec<String>,
    pub spec: AgentSpec,
    pub status: AgentStatus,
    #[serde(skip)]
    pub commands: Vec<Command>,
}

impl Agent {
    /// Creates a brand-new agent record. Called by `GetOrCreate` the first
    /// time an unseen instance UID is observed.
    pub fn new(instance_uid: InstanceUid) -> Self {
        Self {
            instance_uid,
            description: None,
            capabilities: None,
            custom_capabilities: Vec::new(),
            spec: AgentSpec::default(),
            status: AgentStatus::default(),
            commands: Vec::new(),
        }
    }

    /// Metadata is complete iff both description and capability bits have
    /// been reported at least once. Incompleteness forces the next reply to
    /// request full state.
    pub fn metadata_is_complete(&self) -> bool {
        self.description.is_some() && self.capabilities.is_some()
    }

    pub fn report_description(&mut self, desc: Option<AgentDescription>) {
        if let Some(desc) = desc {
            self.description = Some(desc);
        }
    }

    pub fn report_capabilities(&mut self, caps: Option<Capabilities>) {
        if let Some(caps) = caps {
            self.capabilities = Some(caps);
        }
    }

    pub fn report_custom_capabilities(&mut self, cc: Option<Vec<String>>) {
        if let Some(cc) = cc {
            self.custom_capabilities = cc;
        }
    }

    pub fn report_component_health(&mut self, health: Option<ComponentHealth>) {
        if let Some(health) = health {
            self.status.component_health = Some(health);
        }
    }

    pub fn report_effective_config(&mut self, config: Option<EffectiveConfigMap>) {
        if let Some(config) = config {
            self.status.effective_config = Some(config);
        }
    }

    pub fn report_package_statuses(&mut self, statuses: Option<HashMap<String, PackageStatus>>) {
        if let Some(statuses) = statuses {
            self.status.package_statuses = statuses;
        }
    }

    pub fn report_available_components(&mut self, components: Option<AvailableComponents>) {
        if let Some(components) = components {
            self.status.available_components = Some(components);
        }
    }

    /// Updates the `(hash -> status)` entry reported by the agent. Transitions
    /// are unconstrained; the agent is the authority on its own status.
    pub fn report_remote_config_status(&mut self, hash: Option<Hash>, status: RemoteConfigStatusValue) {
        if let Some(hash) = hash {
            if status == RemoteConfigStatusValue::Failed {
                debug!(instance_uid = %self.instance_uid, hash = ?hash, "agent reported a failed remote config");
            }
            self.status.remote_config_statuses.insert(hash, status);
        }
    }

    /// Records the reporting-server identity and timestamp, and advances the
    /// high-water-mark sequence number (never regresses, even when the
    /// incoming report is itself out of order).
    pub fn mark_as_communicated(&mut self, server: &str, now: Time, sequence_num: u64) {
        if sequence_num < self.status.last_reported_sequence_num {
            trace!(
                instance_uid = %self.instance_uid,
                last = self.status.last_reported_sequence_num,
                incoming = sequence_num,
                "ignoring out-of-order sequence number for the high-water mark"
            );
        }
        self.status.last_server = Some(server.to_string());
        self.status.last_reported_at = now;
        self.status.last_reported_sequence_num = self.status.last_reported_sequence_num.max(sequence_num);
    }

    /// True iff a restart has been requested and the agent has not yet
    /// reported a start time after that request.
    pub fn should_be_restarted(&self) -> bool {
        if self.spec.restart_required_at.is_zero() {
            return false;
        }
        let started_since_request = self
            .status
            .component_health
            .as_ref()
            .is_some_and(|health| health.start_time.is_after(&self.spec.restart_required_at));
        let pending = !started_since_request;
        if pending {
            debug!(instance_uid = %self.instance_uid, "agent restart still pending");
        }
        pending
    }

    pub fn queue_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Drains the pending command queue; commands are ephemeral and are
    /// never persisted across messages.
    pub fn drain_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn new_agent() -> Agent {
        Agent::new(InstanceUid::generate())
    }

    #[test]
    fn fresh_agent_has_incomplete_metadata() {
        let agent = new_agent();
        assert!(!agent.metadata_is_complete());
    }

    #[test]
    fn metadata_complete_requires_both_description_and_capabilities() {
        let mut agent = new_agent();
        agent.report_description(Some(AgentDescription::default()));
        assert!(!agent.metadata_is_complete());
        agent.report_capabilities(Some(Capabilities::new(Capabilities::REPORTS_STATUS)));
        assert!(agent.metadata_is_complete());
    }

    #[test]
    fn report_description_none_is_a_no_op() {
        let mut agent = new_agent();
        agent.report_description(Some(AgentDescription {
            identifying_attributes: HashMap::from([("service.name".into(), "otel".into())]),
            ..Default::default()
        }));
        agent.report_description(None);
        assert_eq!(
            agent.description.unwrap().identifying_attributes.get("service.name"),
            Some(&"otel".to_string())
        );
    }

    #[test]
    fn mark_as_communicated_tracks_high_water_mark_sequence_num() {
        let mut agent = new_agent();
        agent.mark_as_communicated("server-a", Time::now(), 5);
        agent.mark_as_communicated("server-a", Time::now(), 3);
        assert_eq!(agent.status.last_reported_sequence_num, 5);
    }

    #[test]
    fn should_be_restarted_is_false_without_a_request() {
        let agent = new_agent();
        assert!(!agent.should_be_restarted());
    }

    #[test]
    fn should_be_restarted_until_agent_reports_a_later_start_time() {
        let mut agent = new_agent();
        agent.spec.restart_required_at = Time::now();
        assert!(agent.should_be_restarted());

        agent.report_component_health(Some(ComponentHealth {
            healthy: true,
            start_time: Time::zero(),
            ..Default::default()
        }));
        assert!(agent.should_be_restarted());

        agent.report_component_health(Some(ComponentHealth {
            healthy: true,
            start_time: Time::now(),
            ..Default::default()
        }));
        assert!(!agent.should_be_restarted());
    }

    #[test]
    fn drain_commands_empties_the_queue() {
        let mut agent = new_agent();
        agent.queue_command(Command::RequestFullState);
        assert_eq!(agent.drain_commands(), vec![Command::RequestFullState]);
        assert!(agent.drain_commands().is_empty());
    }

    #[test]
    #[tracing_test::traced_test]
    fn reporting_a_failed_remote_config_status_is_logged() {
        let mut agent = new_agent();
        agent.report_remote_config_status(Some(Hash::from(vec![1, 2, 3])), RemoteConfigStatusValue::Failed);
        assert!(tracing_test::logs_contain("agent reported a failed remote config"));
    }
}
