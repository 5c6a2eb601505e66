use std::sync::Arc;

use opamp_core::ports::{Clock, ConnectionRegistry, Repository, ServerIdentity};
use opamp_core::resolver::RemoteConfigPolicy;

/// Shared handle every REST handler extracts via Axum's `State`. Cheap to
/// clone: every field is already an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn Repository>,
    pub registry: Arc<dyn ConnectionRegistry>,
    pub clock: Arc<dyn Clock>,
    pub identity: Arc<dyn ServerIdentity>,
    pub remote_config_policy: RemoteConfigPolicy,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn Repository>,
        registry: Arc<dyn ConnectionRegistry>,
        clock: Arc<dyn Clock>,
        identity: Arc<dyn ServerIdentity>,
    ) -> Self {
        Self {
            repository,
            registry,
            clock,
            identity,
            remote_config_policy: RemoteConfigPolicy::default(),
        }
    }
}
