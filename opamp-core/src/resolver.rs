use std::collections::HashMap;

use crate::agent::{Agent, AgentConfigFile, ConnectionSettingsOffer, RemoteConfigStatusValue};
use crate::capabilities::Capabilities;
use crate::group::AgentGroup;
use crate::hash::{new_hash, Hash};

/// The well-known config-map key used when assembling `AgentConfigMap` for
/// the server's own remote-config namespace.
const CONFIG_MAP_KEY: &str = "opampcommander";

/// Policy for the open question the reference source leaves ambiguous:
/// whether a group's config and its connection-settings offer can both
/// appear in the same reply. The spec assumes config-takes-precedence as
/// the default but requires this be a configurable policy, not hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemoteConfigPolicy {
    #[default]
    ConfigTakesPrecedence,
    Merge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRemoteConfig {
    pub config: Option<HashMap<String, AgentConfigFile>>,
    pub hash: Hash,
}

/// Returns every group whose selector matches the agent: for each key in
/// `selector.identifying_attributes` the agent's identifying attribute must
/// equal the selector value (subset match); same for non-identifying. An
/// empty selector matches every agent. Order is not meaningful.
pub fn groups_for_agent<'a>(agent: &Agent, groups: &'a [AgentGroup]) -> Vec<&'a AgentGroup> {
    groups.iter().filter(|group| selector_matches(agent, group)).collect()
}

fn selector_matches(agent: &Agent, group: &AgentGroup) -> bool {
    let description = agent.description.as_ref();
    let identifying_match = group.selector.identifying_attributes.iter().all(|(key, value)| {
        description
            .map(|desc| desc.identifying_attributes.get(key) == Some(value))
            .unwrap_or(false)
    });
    let non_identifying_match = group.selector.non_identifying_attributes.iter().all(|(key, value)| {
        description
            .map(|desc| desc.non_identifying_attributes.get(key) == Some(value))
            .unwrap_or(false)
    });
    identifying_match && non_identifying_match
}

/// Selects the single group that should drive this agent's config: filters
/// to groups carrying a non-empty `AgentConfig.value`, sorts descending by
/// priority (ties broken by name, ascending, for determinism), and returns
/// the head.
fn select_group<'a>(agent: &Agent, groups: &'a [AgentGroup]) -> Option<&'a AgentGroup> {
    let mut candidates: Vec<&AgentGroup> = groups_for_agent(agent, groups)
        .into_iter()
        .filter(|group| group.agent_config.as_ref().is_some_and(|cfg| cfg.has_value()))
        .collect();
    candidates.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.name.cmp(&b.name)));
    candidates.into_iter().next()
}

/// Builds the `RemoteConfig` field of a `ServerToAgent` reply. Returns
/// `None` if the agent lacks `AcceptsRemoteConfig` or no group offers it a
/// config. When the agent has already reported the winning hash as
/// `Applied`, the config body is omitted (hash-only reply) per OpAMP's
/// "config unchanged" convention.
pub fn build_remote_config(agent: &Agent, groups: &[AgentGroup]) -> Option<BuiltRemoteConfig> {
    let has_capability = agent
        .capabilities
        .is_some_and(|caps| caps.has(Capabilities::ACCEPTS_REMOTE_CONFIG));
    if !has_capability {
        return None;
    }

    let group = select_group(agent, groups)?;
    let value = &group.agent_config.as_ref()?.value;
    let content_type = group.agent_config.as_ref()?.content_type.clone();
    let hash = new_hash(value);

    let already_applied = agent.status.remote_config_statuses.get(&hash) == Some(&RemoteConfigStatusValue::Applied);
    let config = if already_applied {
        None
    } else {
        let mut map = HashMap::new();
        map.insert(
            CONFIG_MAP_KEY.to_string(),
            AgentConfigFile {
                body: value.clone(),
                content_type,
            },
        );
        Some(map)
    };

    Some(BuiltRemoteConfig { config, hash })
}

/// Resolves the connection-settings offer for the selected group, honoring
/// the config-vs-connection-settings precedence policy.
pub fn resolve_connection_settings(
    agent: &Agent,
    groups: &[AgentGroup],
    policy: RemoteConfigPolicy,
) -> Option<ConnectionSettingsOffer> {
    let group = select_group(agent, groups)?;
    let agent_config = group.agent_config.as_ref()?;
    if policy == RemoteConfigPolicy::ConfigTakesPrecedence && agent_config.has_value() {
        return None;
    }
    agent_config.connection_settings.clone()
}

/// The connection-settings offer a `ServerToAgent` reply should actually
/// carry: an administrator's direct per-agent override
/// (`Agent.Spec.ConnectionSettings`, set via the control-plane usecases)
/// always wins over whatever the matching group would otherwise offer.
pub fn effective_connection_settings(agent: &Agent, groups: &[AgentGroup], policy: RemoteConfigPolicy) -> Option<ConnectionSettingsOffer> {
    agent
        .spec
        .connection_settings
        .clone()
        .or_else(|| resolve_connection_settings(agent, groups, policy))
}
