use std::collections::HashMap;

use opamp_core::agent::{
    Agent, AgentConfigFile as DomainConfigFile, AgentDescription, AvailableComponents as DomainAvailableComponents,
    Command, ComponentDetails as DomainComponentDetails, ConnectionSettingsOffer, PackageStatus as DomainPackageStatus,
    PackageStatusValue, RemoteConfigStatusValue,
};
use opamp_core::capabilities::Capabilities;
use opamp_core::component_health::ComponentHealth as DomainComponentHealth;
use opamp_core::hash::Hash;
use opamp_core::instance_uid::{InstanceUid, InstanceUidError};
use opamp_core::resolver::BuiltRemoteConfig;
use opamp_core::time::Time;
use proto::opamp::{self, ServerToAgentFlags};

/// Every sub-report this message may carry. `None` for a field means "not
/// reported in this message", per the "nil protobuf submessage maps to nil
/// domain pointer" rule — never a zero-valued struct.
pub struct InboundReport {
    pub instance_uid: InstanceUid,
    pub sequence_num: u64,
    pub description: Option<AgentDescription>,
    pub capabilities: Option<Capabilities>,
    pub health: Option<DomainComponentHealth>,
    pub effective_config: Option<HashMap<String, DomainConfigFile>>,
    pub remote_config_status: Option<(Option<Hash>, RemoteConfigStatusValue)>,
    pub package_statuses: Option<HashMap<String, DomainPackageStatus>>,
    pub custom_capabilities: Option<Vec<String>>,
    pub available_components: Option<DomainAvailableComponents>,
}

pub fn parse_agent_to_server(wire: &opamp::AgentToServer) -> Result<InboundReport, InstanceUidError> {
    let instance_uid = InstanceUid::try_from(wire.instance_uid.as_slice())?;

    Ok(InboundReport {
        instance_uid,
        sequence_num: wire.sequence_num,
        description: wire.agent_description.as_ref().map(description_from_wire),
        capabilities: Some(Capabilities::new(wire.capabilities)),
        health: wire.health.as_ref().map(health_from_wire),
        effective_config: wire
            .effective_config
            .as_ref()
            .and_then(|cfg| cfg.config_map.as_ref())
            .map(config_map_from_wire),
        remote_config_status: wire.remote_config_status.as_ref().map(remote_config_status_from_wire),
        package_statuses: wire
            .package_statuses
            .as_ref()
            .map(|statuses| package_statuses_from_wire(&statuses.packages)),
        custom_capabilities: wire
            .custom_capabilities
            .as_ref()
            .map(|cc| cc.capabilities.clone()),
        available_components: wire.available_components.as_ref().map(available_components_from_wire),
    })
}

fn description_from_wire(desc: &opamp::AgentDescription) -> AgentDescription {
    AgentDescription {
        identifying_attributes: key_values_from_wire(&desc.identifying_attributes),
        non_identifying_attributes: key_values_from_wire(&desc.non_identifying_attributes),
    }
}

fn key_values_from_wire(values: &[proto::anyvalue::KeyValue]) -> HashMap<String, String> {
    values
        .iter()
        .map(|kv| (kv.key.clone(), any_value_to_string(kv.value.as_ref())))
        .collect()
}

fn any_value_to_string(value: Option<&proto::anyvalue::AnyValue>) -> String {
    use proto::anyvalue::any_value::Value;
    match value.and_then(|v| v.value.as_ref()) {
        Some(Value::StringValue(s)) => s.clone(),
        Some(Value::BytesValue(b)) => String::from_utf8_lossy(b).into_owned(),
        Some(Value::BoolValue(b)) => b.to_string(),
        Some(Value::IntValue(i)) => i.to_string(),
        Some(Value::DoubleValue(d)) => d.to_string(),
        _ => String::new(),
    }
}

fn health_from_wire(health: &opamp::ComponentHealth) -> DomainComponentHealth {
    DomainComponentHealth {
        healthy: health.healthy,
        start_time: nanos_to_time(health.start_time_unix_nano),
        last_error: health.last_error.clone(),
        status: health.status.clone(),
        status_time: nanos_to_time(health.status_time_unix_nano),
        component_health_map: health
            .component_health_map
            .iter()
            .map(|(name, sub)| (name.clone(), health_from_wire(sub)))
            .collect(),
    }
}

fn nanos_to_time(nanos: u64) -> Time {
    if nanos == 0 {
        return Time::zero();
    }
    let secs = (nanos / 1_000_000_000) as i64;
    let nsub = (nanos % 1_000_000_000) as u32;
    chrono::DateTime::from_timestamp(secs, nsub)
        .map(Time::from_datetime)
        .unwrap_or_else(Time::zero)
}

fn config_map_from_wire(map: &opamp::AgentConfigMap) -> HashMap<String, DomainConfigFile> {
    map.config_map
        .iter()
        .map(|(name, file)| {
            (
                name.clone(),
                DomainConfigFile {
                    body: file.body.clone(),
                    content_type: file.content_type.clone(),
                },
            )
        })
        .collect()
}

fn remote_config_status_from_wire(status: &opamp::RemoteConfigStatus) -> (Option<Hash>, RemoteConfigStatusValue) {
    let hash = (!status.last_remote_config_hash.is_empty()).then(|| Hash::from(status.last_remote_config_hash.clone()));
    let value = match opamp::RemoteConfigStatuses::try_from(status.status) {
        Ok(opamp::RemoteConfigStatuses::Applied) => RemoteConfigStatusValue::Applied,
        Ok(opamp::RemoteConfigStatuses::Applying) => RemoteConfigStatusValue::Applying,
        Ok(opamp::RemoteConfigStatuses::Failed) => RemoteConfigStatusValue::Failed,
        _ => RemoteConfigStatusValue::Unset,
    };
    (hash, value)
}

fn package_statuses_from_wire(packages: &HashMap<String, opamp::PackageStatus>) -> HashMap<String, DomainPackageStatus> {
    packages
        .iter()
        .map(|(name, status)| {
            let value = match opamp::PackageStatusEnum::try_from(status.status) {
                Ok(opamp::PackageStatusEnum::InstallPending) => PackageStatusValue::InstallPending,
                Ok(opamp::PackageStatusEnum::Installing) => PackageStatusValue::Installing,
                Ok(opamp::PackageStatusEnum::InstallFailed) => PackageStatusValue::InstallFailed,
                _ => PackageStatusValue::Installed,
            };
            (
                name.clone(),
                DomainPackageStatus {
                    name: status.name.clone(),
                    agent_has_version: status.agent_has_version.clone(),
                    agent_has_hash: Hash::from(status.agent_has_hash.clone()),
                    server_offered_version: status.server_offered_version.clone(),
                    server_offered_hash: Hash::from(status.server_offered_hash.clone()),
                    status: value,
                    error_message: status.error_message.clone(),
                },
            )
        })
        .collect()
}

fn available_components_from_wire(ac: &opamp::AvailableComponents) -> DomainAvailableComponents {
    DomainAvailableComponents {
        hash: Hash::from(ac.hash.clone()),
        components: ac
            .components
            .iter()
            .map(|(name, details)| (name.clone(), component_details_from_wire(details)))
            .collect(),
    }
}

fn component_details_from_wire(details: &opamp::ComponentDetails) -> DomainComponentDetails {
    DomainComponentDetails {
        metadata: details.metadata.clone(),
        sub_component_map: details
            .sub_component_map
            .iter()
            .map(|(name, sub)| (name.clone(), component_details_from_wire(sub)))
            .collect(),
    }
}

/// Maps a domain connection-settings offer onto the wire
/// `ConnectionSettingsOffers` message: each populated endpoint becomes its
/// own sub-message, sharing the offer's single TLS material across whichever
/// endpoints are actually present.
fn connection_settings_to_wire(offer: &ConnectionSettingsOffer) -> opamp::ConnectionSettingsOffers {
    let certificate = offer.tls.as_ref().map(|tls| opamp::TlsCertificate {
        public_key: tls.public_key.clone(),
        private_key: tls.private_key.clone(),
        ca_public_key: tls.ca_public_key.clone(),
    });

    opamp::ConnectionSettingsOffers {
        opamp: offer.opamp_endpoint.as_ref().map(|endpoint| opamp::OpampConnectionSettings {
            destination_endpoint: endpoint.clone(),
            headers: None,
            certificate: certificate.clone(),
        }),
        own_metrics: offer.metrics_endpoint.as_ref().map(|endpoint| opamp::TelemetryConnectionSettings {
            destination_endpoint: endpoint.clone(),
            headers: None,
            certificate: certificate.clone(),
        }),
        own_traces: offer.traces_endpoint.as_ref().map(|endpoint| opamp::TelemetryConnectionSettings {
            destination_endpoint: endpoint.clone(),
            headers: None,
            certificate: certificate.clone(),
        }),
        own_logs: offer.logs_endpoint.as_ref().map(|endpoint| opamp::TelemetryConnectionSettings {
            destination_endpoint: endpoint.clone(),
            headers: None,
            certificate,
        }),
        ..Default::default()
    }
}

/// Assembles the `ServerToAgent` reply. `remote_config` is `None` when the
/// group resolver found nothing to offer; `report_full_state` is set when
/// the agent's metadata is incomplete or a `RequestFullState` command is
/// pending, per spec.md §4.E step 6.
pub fn build_server_to_agent(
    agent: &Agent,
    remote_config: Option<BuiltRemoteConfig>,
    connection_settings: Option<ConnectionSettingsOffer>,
    commands: Vec<Command>,
    report_full_state: bool,
) -> opamp::ServerToAgent {
    let mut flags = 0u64;
    if report_full_state || commands.contains(&Command::RequestFullState) {
        flags |= ServerToAgentFlags::ReportFullState as u64;
    }

    let command = commands.iter().find_map(|c| match c {
        Command::Restart => Some(opamp::ServerToAgentCommand {
            r#type: opamp::CommandType::Restart as i32,
        }),
        Command::RequestFullState => None,
    });

    opamp::ServerToAgent {
        instance_uid: agent.instance_uid.as_bytes().to_vec(),
        flags,
        remote_config: remote_config.map(|built| opamp::AgentRemoteConfig {
            config: built.config.map(|map| opamp::AgentConfigMap {
                config_map: map
                    .into_iter()
                    .map(|(name, file)| {
                        (
                            name,
                            opamp::AgentConfigFile {
                                body: file.body,
                                content_type: file.content_type,
                            },
                        )
                    })
                    .collect(),
            }),
            config_hash: built.hash.as_bytes().to_vec(),
        }),
        connection_settings: connection_settings.as_ref().map(connection_settings_to_wire),
        agent_identification: agent.spec.new_instance_uid.map(|new_uid| opamp::AgentIdentification {
            new_instance_uid: new_uid.as_bytes().to_vec(),
        }),
        command,
        ..Default::default()
    }
}

pub fn fallback_server_to_agent(instance_uid: &InstanceUid) -> opamp::ServerToAgent {
    opamp::ServerToAgent {
        instance_uid: instance_uid.as_bytes().to_vec(),
        ..Default::default()
    }
}
