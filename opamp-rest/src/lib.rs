//! The administrator-facing REST API: Kubernetes-style JSON/YAML resources
//! under `/api/v1`, plus the control-plane usecases (spec.md §4.F) that
//! schedule out-of-band pushes through `opamp-server`'s connection
//! registry.

pub mod codec;
pub mod error;
pub mod handlers;
pub mod principal;
pub mod resources;
pub mod state;
pub mod usecases;

use axum::routing::{get, put};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Builds the `/api/v1` router. Merge with `opamp_server::transport::router`
/// in the binary crate to serve both surfaces from one Axum app.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/ping", get(handlers::ping::get))
        .route("/api/v1/server", get(handlers::server::get))
        .route("/api/v1/connections", get(handlers::connections::list))
        .route("/api/v1/agents", get(handlers::agents::list))
        .route(
            "/api/v1/agents/:instance_uid",
            get(handlers::agents::get).put(handlers::agents::update).delete(handlers::agents::delete),
        )
        .route("/api/v1/agents/:instance_uid/restart", put(handlers::agents::restart))
        .route("/api/v1/agents/:instance_uid/request-full-state", put(handlers::agents::request_full_state))
        .route("/api/v1/agents/:instance_uid/instance-uid", put(handlers::agents::set_new_instance_uid))
        .route(
            "/api/v1/agents/:instance_uid/connection-settings",
            put(handlers::agents::set_connection_settings),
        )
        .route("/api/v1/agentgroups", get(handlers::groups::list))
        .route(
            "/api/v1/agentgroups/:name",
            get(handlers::groups::get).put(handlers::groups::save).delete(handlers::groups::delete),
        )
        .route("/api/v1/agentremoteconfigs", get(handlers::remoteconfigs::list))
        .route(
            "/api/v1/agentremoteconfigs/:name",
            get(handlers::remoteconfigs::get)
                .put(handlers::remoteconfigs::save)
                .delete(handlers::remoteconfigs::delete),
        )
        .route("/api/v1/agentpackages", get(handlers::packages::list))
        .route(
            "/api/v1/agentpackages/:name",
            get(handlers::packages::get).put(handlers::packages::save).delete(handlers::packages::delete),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use opamp_core::ports::{MockConnectionRegistry, MockRepository, StaticServerIdentity, SystemClock};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let mut repository = MockRepository::new();
        repository.expect_list_agents().returning(|_, _| {
            Ok(opamp_core::ports::Page {
                items: Vec::new(),
                next_continue: None,
                remaining_item_count: Some(0),
            })
        });
        let registry = MockConnectionRegistry::new();
        AppState::new(
            Arc::new(repository),
            Arc::new(registry),
            Arc::new(SystemClock),
            Arc::new(StaticServerIdentity("test-server".to_string())),
        )
    }

    #[tokio::test]
    async fn ping_requires_no_principal() {
        let app = router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/api/v1/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn agents_list_requires_a_principal() {
        let app = router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/api/v1/agents").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn agents_list_succeeds_with_a_principal() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/agents")
                    .header("x-opampd-principal", "alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_agent_returns_404() {
        let mut repository = MockRepository::new();
        repository.expect_get_agent().returning(|_| Ok(None));
        let registry = MockConnectionRegistry::new();
        let state = AppState::new(
            Arc::new(repository),
            Arc::new(registry),
            Arc::new(SystemClock),
            Arc::new(StaticServerIdentity("test-server".to_string())),
        );
        let app = router(state);
        let uid = opamp_core::instance_uid::InstanceUid::generate();
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/agents/{uid}"))
                    .header("x-opampd-principal", "alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
