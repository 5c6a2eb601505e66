use serde::{Deserialize, Serialize};

use crate::instance_uid::InstanceUid;
use crate::time::Time;

/// How a connection reached the server. An `Http` connection is ephemeral
/// (one request/response); a `WebSocket` connection is kept in the registry
/// across messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionType {
    #[default]
    Unknown,
    WebSocket,
    Http,
}

/// Opaque connection identity. The instance UID is nil until the first
/// message on the connection reveals it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub String);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().as_simple().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub instance_uid: Option<InstanceUid>,
    pub connection_type: ConnectionType,
    pub last_communication: Time,
    pub live: bool,
}

impl Connection {
    pub fn new(id: ConnectionId, connection_type: ConnectionType) -> Self {
        Self {
            id,
            instance_uid: None,
            connection_type,
            last_communication: Time::now(),
            live: true,
        }
    }

    pub fn bind_instance_uid(&mut self, instance_uid: InstanceUid) {
        self.instance_uid = Some(instance_uid);
    }

    pub fn touch(&mut self, now: Time) {
        self.last_communication = now;
    }
}
