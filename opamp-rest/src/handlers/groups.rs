use axum::extract::{Path, State};
use axum::Json;
use opamp_core::group::AgentGroup;

use crate::error::ApiError;
use crate::principal::Principal;
use crate::resources::List;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>, _principal: Principal) -> Result<Json<List<AgentGroup>>, ApiError> {
    let groups = state.repository.list_groups().await?;
    Ok(Json(List::unpaginated("AgentGroupList", groups)))
}

pub async fn get(State(state): State<AppState>, Path(name): Path<String>, _principal: Principal) -> Result<Json<AgentGroup>, ApiError> {
    let group = state
        .repository
        .get_group(name.clone())
        .await?
        .ok_or_else(|| opamp_core::error::OpampError::NotFound(format!("agent group {name}")))?;
    Ok(Json(group))
}

pub async fn save(
    State(state): State<AppState>,
    Path(name): Path<String>,
    _principal: Principal,
    Json(mut group): Json<AgentGroup>,
) -> Result<Json<AgentGroup>, ApiError> {
    group.name = name;
    state.repository.save_group(group.clone()).await?;
    Ok(Json(group))
}

pub async fn delete(State(state): State<AppState>, Path(name): Path<String>, _principal: Principal) -> Result<(), ApiError> {
    state.repository.delete_group(name).await?;
    Ok(())
}
