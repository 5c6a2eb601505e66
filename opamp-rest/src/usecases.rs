//! Control-plane usecases (spec.md §4.F): administrator-initiated
//! mutations issued from the REST side. Every usecase follows the same
//! shape: load (404 if absent), validate against the agent's advertised
//! capabilities (400 `UnsupportedOperation` otherwise), mutate and
//! persist, then push an out-of-band `ServerToAgent` if the target has a
//! live connection — `NotConnected` still returns success, since the
//! protocol is convergent and the agent will pick the change up on its
//! next poll.

use opamp_core::agent::{Agent, AgentSpec, Command, ConnectionSettingsOffer};
use opamp_core::capabilities::Capabilities;
use opamp_core::condition::{Condition, ConditionStatus};
use opamp_core::error::{OpampError, OpampResult};
use opamp_core::group::AgentGroup;
use opamp_core::instance_uid::InstanceUid;
use opamp_core::ports::SendError;
use opamp_server::mapping::build_server_to_agent;
use tracing::warn;

use crate::state::AppState;

async fn load_agent(state: &AppState, instance_uid: InstanceUid) -> OpampResult<Agent> {
    state
        .repository
        .get_agent(instance_uid)
        .await?
        .ok_or_else(|| OpampError::NotFound(format!("agent {instance_uid}")))
}

fn require_capability(agent: &Agent, cap: u64, operation: &str) -> OpampResult<()> {
    let has = agent.capabilities.is_some_and(|caps| caps.has(cap));
    if has {
        Ok(())
    } else {
        Err(OpampError::UnsupportedOperation(format!(
            "agent does not advertise the capability required for {operation}"
        )))
    }
}

/// Pushes a fresh `ServerToAgent` built from the agent's current state if a
/// live connection exists. `NotConnected` converges on the agent's next
/// poll; `SendFailed` is recorded as an audit condition rather than
/// surfaced as an error, per spec.md §4.F step 5.
async fn push_out_of_band(state: &AppState, agent: &mut Agent, commands: Vec<Command>) -> OpampResult<()> {
    let groups: Vec<AgentGroup> = state.repository.list_groups().await?;
    let remote_config = opamp_core::resolver::build_remote_config(agent, &groups);
    let connection_settings = opamp_core::resolver::effective_connection_settings(agent, &groups, state.remote_config_policy);
    let report_full_state = !agent.metadata_is_complete();
    let message = build_server_to_agent(agent, remote_config, connection_settings, commands, report_full_state);

    match state.registry.send(agent.instance_uid, message).await {
        Ok(()) => Ok(()),
        Err(SendError::NotConnected) => Ok(()),
        Err(SendError::SendFailed) => {
            warn!(instance_uid = %agent.instance_uid, "out-of-band push failed, recording audit condition");
            agent.status.conditions.push(Condition {
                kind: "PushFailed".to_string(),
                status: ConditionStatus::True,
                last_transition_time: state.clock.now(),
                reason: "SendFailed".to_string(),
                message: "out-of-band server-to-agent push failed; change will apply on next poll".to_string(),
            });
            state.repository.save_agent(agent.clone()).await?;
            Ok(())
        }
    }
}

/// Overwrites an agent's administrator-controlled spec (the generic
/// `UpdateAgent` usecase: connection-settings offers, packages-available,
/// etc., are all plain spec fields an administrator may set directly).
pub async fn update_agent(state: &AppState, instance_uid: InstanceUid, incoming_spec: AgentSpec) -> OpampResult<Agent> {
    let mut agent = load_agent(state, instance_uid).await?;
    agent.spec = incoming_spec;
    state.repository.save_agent(agent.clone()).await?;
    push_out_of_band(state, &mut agent, Vec::new()).await?;
    Ok(agent)
}

/// Assigns a new instance UID; requires the agent to be currently
/// connected (the server cannot hand an offline agent a new identity it
/// has no way of acknowledging).
pub async fn set_new_instance_uid(state: &AppState, instance_uid: InstanceUid, new_instance_uid: InstanceUid) -> OpampResult<Agent> {
    let mut agent = load_agent(state, instance_uid).await?;
    if !state.registry.is_connected(instance_uid) {
        return Err(OpampError::UnsupportedOperation(
            "agent must be connected to receive a new instance uid".to_string(),
        ));
    }
    agent.spec.new_instance_uid = Some(new_instance_uid);
    state.repository.save_agent(agent.clone()).await?;
    push_out_of_band(state, &mut agent, Vec::new()).await?;
    Ok(agent)
}

pub async fn set_connection_settings(state: &AppState, instance_uid: InstanceUid, offer: ConnectionSettingsOffer) -> OpampResult<Agent> {
    let mut agent = load_agent(state, instance_uid).await?;
    let accepts = agent.capabilities.is_some_and(|caps| {
        caps.has(Capabilities::ACCEPTS_OPAMP_CONNECTION_SETTINGS) || caps.has(Capabilities::ACCEPTS_OTHER_CONNECTION_SETTINGS)
    });
    if !accepts {
        return Err(OpampError::UnsupportedOperation(
            "agent does not accept any connection-settings offer".to_string(),
        ));
    }
    agent.spec.connection_settings = Some(offer);
    state.repository.save_agent(agent.clone()).await?;
    push_out_of_band(state, &mut agent, Vec::new()).await?;
    Ok(agent)
}

pub async fn restart_agent(state: &AppState, instance_uid: InstanceUid) -> OpampResult<Agent> {
    let mut agent = load_agent(state, instance_uid).await?;
    require_capability(&agent, Capabilities::ACCEPTS_RESTART_COMMAND, "restart")?;
    agent.spec.restart_required_at = state.clock.now();
    state.repository.save_agent(agent.clone()).await?;
    push_out_of_band(state, &mut agent, vec![Command::Restart]).await?;
    Ok(agent)
}

pub async fn request_full_state(state: &AppState, instance_uid: InstanceUid) -> OpampResult<Agent> {
    let mut agent = load_agent(state, instance_uid).await?;
    push_out_of_band(state, &mut agent, vec![Command::RequestFullState]).await?;
    Ok(agent)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::state::AppState;
    use opamp_core::ports::{MockConnectionRegistry, MockRepository, StaticServerIdentity, SystemClock};
    use std::sync::Arc;

    fn agent_with_capabilities(caps: u64) -> Agent {
        let mut agent = Agent::new(InstanceUid::generate());
        agent.capabilities = Some(Capabilities::new(caps));
        agent
    }

    fn state_with(repository: MockRepository, registry: MockConnectionRegistry) -> AppState {
        AppState::new(
            Arc::new(repository),
            Arc::new(registry),
            Arc::new(SystemClock),
            Arc::new(StaticServerIdentity("test-server".to_string())),
        )
    }

    #[tokio::test]
    async fn restart_requires_the_capability() {
        let agent = agent_with_capabilities(0);
        let uid = agent.instance_uid;
        let mut repository = MockRepository::new();
        repository.expect_get_agent().returning(move |_| Ok(Some(agent.clone())));
        let registry = MockConnectionRegistry::new();

        let state = state_with(repository, registry);
        let err = restart_agent(&state, uid).await.unwrap_err();
        assert_matches::assert_matches!(err, OpampError::UnsupportedOperation(_));
    }

    #[tokio::test]
    async fn restart_pushes_out_of_band_when_connected() {
        let agent = agent_with_capabilities(Capabilities::ACCEPTS_RESTART_COMMAND);
        let uid = agent.instance_uid;
        let mut repository = MockRepository::new();
        repository.expect_get_agent().returning(move |_| Ok(Some(agent.clone())));
        repository.expect_save_agent().returning(|_| Ok(()));
        repository.expect_list_groups().returning(|| Ok(Vec::new()));

        let mut registry = MockConnectionRegistry::new();
        registry.expect_send().returning(|_, _| Ok(()));

        let state = state_with(repository, registry);
        let updated = restart_agent(&state, uid).await.unwrap();
        assert!(!updated.spec.restart_required_at.is_zero());
    }

    #[tokio::test]
    async fn restart_not_connected_is_not_an_error() {
        let agent = agent_with_capabilities(Capabilities::ACCEPTS_RESTART_COMMAND);
        let uid = agent.instance_uid;
        let mut repository = MockRepository::new();
        repository.expect_get_agent().returning(move |_| Ok(Some(agent.clone())));
        repository.expect_save_agent().returning(|_| Ok(()));
        repository.expect_list_groups().returning(|| Ok(Vec::new()));

        let mut registry = MockConnectionRegistry::new();
        registry.expect_send().returning(|_, _| Err(SendError::NotConnected));

        let state = state_with(repository, registry);
        assert!(restart_agent(&state, uid).await.is_ok());
    }

    #[tokio::test]
    async fn set_new_instance_uid_requires_live_connection() {
        let agent = Agent::new(InstanceUid::generate());
        let uid = agent.instance_uid;
        let mut repository = MockRepository::new();
        repository.expect_get_agent().returning(move |_| Ok(Some(agent.clone())));
        let mut registry = MockConnectionRegistry::new();
        registry.expect_is_connected().returning(|_| false);

        let state = state_with(repository, registry);
        let err = set_new_instance_uid(&state, uid, InstanceUid::generate()).await.unwrap_err();
        assert_matches::assert_matches!(err, OpampError::UnsupportedOperation(_));
    }

    #[tokio::test]
    async fn request_full_state_sets_the_flag_on_the_pushed_reply() {
        let agent = agent_with_capabilities(Capabilities::REPORTS_STATUS);
        let uid = agent.instance_uid;
        let mut repository = MockRepository::new();
        repository.expect_get_agent().returning(move |_| Ok(Some(agent.clone())));
        repository.expect_list_groups().returning(|| Ok(Vec::new()));

        let mut registry = MockConnectionRegistry::new();
        registry
            .expect_send()
            .withf(|_, message| message.flags & proto::opamp::ServerToAgentFlags::ReportFullState as u64 != 0)
            .returning(|_, _| Ok(()));

        let state = state_with(repository, registry);
        assert!(request_full_state(&state, uid).await.is_ok());
    }

    #[tokio::test]
    async fn set_connection_settings_delivers_the_offer_on_the_pushed_reply() {
        let agent = agent_with_capabilities(Capabilities::ACCEPTS_OPAMP_CONNECTION_SETTINGS);
        let uid = agent.instance_uid;
        let mut repository = MockRepository::new();
        repository.expect_get_agent().returning(move |_| Ok(Some(agent.clone())));
        repository.expect_save_agent().returning(|_| Ok(()));
        repository.expect_list_groups().returning(|| Ok(Vec::new()));

        let mut registry = MockConnectionRegistry::new();
        registry
            .expect_send()
            .withf(|_, message| {
                message
                    .connection_settings
                    .as_ref()
                    .and_then(|settings| settings.opamp.as_ref())
                    .map(|opamp| opamp.destination_endpoint == "wss://example/v1/opamp")
                    .unwrap_or(false)
            })
            .returning(|_, _| Ok(()));

        let state = state_with(repository, registry);
        let offer = ConnectionSettingsOffer {
            opamp_endpoint: Some("wss://example/v1/opamp".to_string()),
            metrics_endpoint: None,
            logs_endpoint: None,
            traces_endpoint: None,
            tls: None,
        };
        assert!(set_connection_settings(&state, uid, offer).await.is_ok());
    }

    #[tokio::test]
    async fn missing_agent_is_not_found() {
        let mut repository = MockRepository::new();
        repository.expect_get_agent().returning(|_| Ok(None));
        let registry = MockConnectionRegistry::new();

        let state = state_with(repository, registry);
        let err = restart_agent(&state, InstanceUid::generate()).await.unwrap_err();
        assert_matches::assert_matches!(err, OpampError::NotFound(_));
    }
}
