use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::Json;
use opamp_core::group::AgentConfig;
use opamp_core::remote_config::{AgentRemoteConfig, ResourceMeta};
use opamp_core::time::Time;

use crate::codec::normalize_content_type;
use crate::error::ApiError;
use crate::principal::Principal;
use crate::resources::{List, ListParams};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>, Query(params): Query<ListParams>, _principal: Principal) -> Result<Json<List<AgentRemoteConfig>>, ApiError> {
    let page = state.repository.list_remote_configs(params.limit, params.continue_token).await?;
    Ok(Json(List::new("AgentRemoteConfigList", page)))
}

pub async fn get(State(state): State<AppState>, Path(name): Path<String>, _principal: Principal) -> Result<Json<AgentRemoteConfig>, ApiError> {
    let config = state
        .repository
        .get_remote_config(name.clone())
        .await?
        .ok_or_else(|| opamp_core::error::OpampError::NotFound(format!("agent remote config {name}")))?;
    Ok(Json(config))
}

/// The request body is the raw config content itself (not a JSON-wrapped
/// resource): `Content-Type: text/json`, `text/yaml`, or empty (legacy,
/// treated as YAML) all accepted, per spec.md §6.
pub async fn save(
    State(state): State<AppState>,
    Path(name): Path<String>,
    _principal: Principal,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AgentRemoteConfig>, ApiError> {
    let content_type = normalize_content_type(headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()))?;
    let config = AgentRemoteConfig {
        metadata: ResourceMeta {
            name: name.clone(),
            created_at: Time::now(),
            deleted_at: None,
        },
        spec: AgentConfig {
            value: body.to_vec(),
            content_type,
            connection_settings: None,
        },
        ..Default::default()
    };
    state.repository.save_remote_config(config.clone()).await?;
    let stored = state.repository.get_remote_config(name).await?.unwrap_or(config);
    Ok(Json(stored))
}

pub async fn delete(State(state): State<AppState>, Path(name): Path<String>, _principal: Principal) -> Result<(), ApiError> {
    state.repository.delete_remote_config(name).await?;
    Ok(())
}
