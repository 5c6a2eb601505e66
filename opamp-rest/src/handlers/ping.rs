use axum::Json;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Pong {
    pub status: &'static str,
}

/// Unauthenticated liveness probe; does not extract `Principal`.
pub async fn get() -> Json<Pong> {
    Json(Pong { status: "ok" })
}
