use axum::extract::{Path, Query, State};
use axum::Json;
use opamp_core::agent::{Agent, AgentSpec, ConnectionSettingsOffer};
use opamp_core::instance_uid::InstanceUid;

use crate::error::ApiError;
use crate::principal::Principal;
use crate::resources::{List, ListParams};
use crate::state::AppState;
use crate::usecases;

fn parse_instance_uid(raw: &str) -> Result<InstanceUid, ApiError> {
    InstanceUid::try_from(raw).map_err(|err| opamp_core::error::OpampError::InvalidArgument(err.to_string()).into())
}

pub async fn list(State(state): State<AppState>, Query(params): Query<ListParams>, _principal: Principal) -> Result<Json<List<Agent>>, ApiError> {
    let page = state.repository.list_agents(params.limit, params.continue_token).await?;
    Ok(Json(List::new("AgentList", page)))
}

pub async fn get(State(state): State<AppState>, Path(instance_uid): Path<String>, _principal: Principal) -> Result<Json<Agent>, ApiError> {
    let instance_uid = parse_instance_uid(&instance_uid)?;
    let agent = state
        .repository
        .get_agent(instance_uid)
        .await?
        .ok_or_else(|| opamp_core::error::OpampError::NotFound(format!("agent {instance_uid}")))?;
    Ok(Json(agent))
}

pub async fn update(
    State(state): State<AppState>,
    Path(instance_uid): Path<String>,
    _principal: Principal,
    Json(spec): Json<AgentSpec>,
) -> Result<Json<Agent>, ApiError> {
    let instance_uid = parse_instance_uid(&instance_uid)?;
    let agent = usecases::update_agent(&state, instance_uid, spec).await?;
    Ok(Json(agent))
}

pub async fn delete(State(state): State<AppState>, Path(instance_uid): Path<String>, _principal: Principal) -> Result<(), ApiError> {
    let instance_uid = parse_instance_uid(&instance_uid)?;
    state.repository.soft_delete_agent(instance_uid).await?;
    Ok(())
}

pub async fn restart(State(state): State<AppState>, Path(instance_uid): Path<String>, _principal: Principal) -> Result<Json<Agent>, ApiError> {
    let instance_uid = parse_instance_uid(&instance_uid)?;
    let agent = usecases::restart_agent(&state, instance_uid).await?;
    Ok(Json(agent))
}

pub async fn request_full_state(State(state): State<AppState>, Path(instance_uid): Path<String>, _principal: Principal) -> Result<Json<Agent>, ApiError> {
    let instance_uid = parse_instance_uid(&instance_uid)?;
    let agent = usecases::request_full_state(&state, instance_uid).await?;
    Ok(Json(agent))
}

#[derive(serde::Deserialize)]
pub struct SetNewInstanceUidBody {
    pub new_instance_uid: String,
}

pub async fn set_new_instance_uid(
    State(state): State<AppState>,
    Path(instance_uid): Path<String>,
    _principal: Principal,
    Json(body): Json<SetNewInstanceUidBody>,
) -> Result<Json<Agent>, ApiError> {
    let instance_uid = parse_instance_uid(&instance_uid)?;
    let new_instance_uid = parse_instance_uid(&body.new_instance_uid)?;
    let agent = usecases::set_new_instance_uid(&state, instance_uid, new_instance_uid).await?;
    Ok(Json(agent))
}

pub async fn set_connection_settings(
    State(state): State<AppState>,
    Path(instance_uid): Path<String>,
    _principal: Principal,
    Json(offer): Json<ConnectionSettingsOffer>,
) -> Result<Json<Agent>, ApiError> {
    let instance_uid = parse_instance_uid(&instance_uid)?;
    let agent = usecases::set_connection_settings(&state, instance_uid, offer).await?;
    Ok(Json(agent))
}
