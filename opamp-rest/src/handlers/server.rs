use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::principal::Principal;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub id: String,
}

pub async fn get(State(state): State<AppState>, _principal: Principal) -> Json<ServerInfo> {
    Json(ServerInfo {
        id: state.identity.current(),
    })
}
