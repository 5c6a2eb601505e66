use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use opamp_core::connection::ConnectionId;
use opamp_core::instance_uid::InstanceUid;
use opamp_core::ports::{ConnectionRegistry, OutboundSender, SendError};
use proto::opamp::ServerToAgent;
use tokio::sync::mpsc;

/// An outbound handle for a live WebSocket connection: a channel into the
/// connection's write task. Copied out of the lock before sending, so the
/// critical section stays free of I/O.
#[derive(Clone)]
struct Handle {
    sender: mpsc::Sender<ServerToAgent>,
}

#[derive(Default)]
struct Index {
    by_connection: HashMap<ConnectionId, Handle>,
    by_instance_uid: HashMap<InstanceUid, ConnectionId>,
    /// Reverse index so `unregister` is O(indexes-per-connection) rather
    /// than a full scan of `by_instance_uid`.
    instance_uids_by_connection: HashMap<ConnectionId, InstanceUid>,
}

/// The in-memory directory mapping instance UIDs to live WebSocket
/// connections, behind a single read-write lock over a two-map index plus
/// a connection-id reverse index.
pub struct InMemoryConnectionRegistry {
    index: RwLock<Index>,
}

impl Default for InMemoryConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self {
            index: RwLock::new(Index::default()),
        }
    }

}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    fn register(&self, connection_id: ConnectionId, sender: OutboundSender) {
        let mut index = self.index.write().expect("registry lock poisoned");
        index.by_connection.insert(connection_id, Handle { sender });
    }

    fn update_instance_uid(&self, connection_id: &ConnectionId, instance_uid: InstanceUid) {
        let mut index = self.index.write().expect("registry lock poisoned");
        if let Some(previous) = index.instance_uids_by_connection.insert(connection_id.clone(), instance_uid) {
            index.by_instance_uid.remove(&previous);
        }
        index.by_instance_uid.insert(instance_uid, connection_id.clone());
    }

    fn unregister(&self, connection_id: &ConnectionId) {
        let mut index = self.index.write().expect("registry lock poisoned");
        index.by_connection.remove(connection_id);
        if let Some(instance_uid) = index.instance_uids_by_connection.remove(connection_id) {
            index.by_instance_uid.remove(&instance_uid);
        }
    }

    async fn send(&self, instance_uid: InstanceUid, message: ServerToAgent) -> Result<(), SendError> {
        let handle = {
            let index = self.index.read().expect("registry lock poisoned");
            let connection_id = index.by_instance_uid.get(&instance_uid).ok_or(SendError::NotConnected)?;
            index
                .by_connection
                .get(connection_id)
                .cloned()
                .ok_or(SendError::NotConnected)?
        };
        handle.sender.send(message).await.map_err(|_| SendError::SendFailed)
    }

    fn list(&self) -> Vec<InstanceUid> {
        let index = self.index.read().expect("registry lock poisoned");
        index.by_instance_uid.keys().copied().collect()
    }

    fn is_connected(&self, instance_uid: InstanceUid) -> bool {
        let index = self.index.read().expect("registry lock poisoned");
        index.by_instance_uid.contains_key(&instance_uid)
    }
}

impl Clone for Handle {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn send_to_unregistered_instance_uid_returns_not_connected() {
        let registry = InMemoryConnectionRegistry::new();
        let err = registry.send(InstanceUid::generate(), ServerToAgent::default()).await;
        assert_matches::assert_matches!(err, Err(SendError::NotConnected));
    }

    #[tokio::test]
    async fn send_delivers_to_the_bound_connection() {
        let registry = InMemoryConnectionRegistry::new();
        let connection_id = ConnectionId::generate();
        let (tx, mut rx) = mpsc::channel(4);
        registry.register(connection_id.clone(), tx);
        let instance_uid = InstanceUid::generate();
        registry.update_instance_uid(&connection_id, instance_uid);

        registry.send(instance_uid, ServerToAgent::default()).await.unwrap();
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn unregister_removes_both_indexes() {
        let registry = InMemoryConnectionRegistry::new();
        let connection_id = ConnectionId::generate();
        let (tx, _rx) = mpsc::channel(4);
        registry.register(connection_id.clone(), tx);
        let instance_uid = InstanceUid::generate();
        registry.update_instance_uid(&connection_id, instance_uid);
        assert!(registry.is_connected(instance_uid));

        registry.unregister(&connection_id);
        assert!(!registry.is_connected(instance_uid));
        let err = registry.send(instance_uid, ServerToAgent::default()).await;
        assert_matches::assert_matches!(err, Err(SendError::NotConnected));
    }

    #[tokio::test]
    async fn rebinding_instance_uid_to_a_new_connection_drops_the_old_mapping() {
        let registry = InMemoryConnectionRegistry::new();
        let conn_a = ConnectionId::generate();
        let conn_b = ConnectionId::generate();
        let (tx_a, _rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        registry.register(conn_a.clone(), tx_a);
        registry.register(conn_b.clone(), tx_b);

        let instance_uid = InstanceUid::generate();
        registry.update_instance_uid(&conn_a, instance_uid);
        registry.update_instance_uid(&conn_b, instance_uid);

        registry.send(instance_uid, ServerToAgent::default()).await.unwrap();
        assert!(rx_b.recv().await.is_some());
    }

    #[test]
    fn list_enumerates_connected_instance_uids() {
        let registry = InMemoryConnectionRegistry::new();
        let connection_id = ConnectionId::generate();
        let (tx, _rx) = mpsc::channel(4);
        registry.register(connection_id.clone(), tx);
        let instance_uid = InstanceUid::generate();
        registry.update_instance_uid(&connection_id, instance_uid);

        assert_eq!(registry.list(), vec![instance_uid]);
    }
}
