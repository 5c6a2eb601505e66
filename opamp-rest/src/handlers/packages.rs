use axum::extract::{Path, Query, State};
use axum::Json;
use opamp_core::remote_config::AgentPackage;

use crate::error::ApiError;
use crate::principal::Principal;
use crate::resources::{List, ListParams};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>, Query(params): Query<ListParams>, _principal: Principal) -> Result<Json<List<AgentPackage>>, ApiError> {
    let page = state.repository.list_packages(params.limit, params.continue_token).await?;
    Ok(Json(List::new("AgentPackageList", page)))
}

pub async fn get(State(state): State<AppState>, Path(name): Path<String>, _principal: Principal) -> Result<Json<AgentPackage>, ApiError> {
    let package = state
        .repository
        .get_package(name.clone())
        .await?
        .ok_or_else(|| opamp_core::error::OpampError::NotFound(format!("agent package {name}")))?;
    Ok(Json(package))
}

pub async fn save(
    State(state): State<AppState>,
    Path(name): Path<String>,
    _principal: Principal,
    Json(mut package): Json<AgentPackage>,
) -> Result<Json<AgentPackage>, ApiError> {
    package.metadata.name = name;
    state.repository.save_package(package.clone()).await?;
    Ok(Json(package))
}

pub async fn delete(State(state): State<AppState>, Path(name): Path<String>, _principal: Principal) -> Result<(), ApiError> {
    state.repository.delete_package(name).await?;
    Ok(())
}
