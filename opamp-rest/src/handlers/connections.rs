use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::principal::Principal;
use crate::resources::List;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionInfo {
    #[serde(rename = "instanceUid")]
    pub instance_uid: String,
}

pub async fn list(State(state): State<AppState>, _principal: Principal) -> Json<List<ConnectionInfo>> {
    let items = state
        .registry
        .list()
        .into_iter()
        .map(|instance_uid| ConnectionInfo {
            instance_uid: instance_uid.to_string(),
        })
        .collect();
    Json(List::unpaginated("ConnectionList", items))
}
