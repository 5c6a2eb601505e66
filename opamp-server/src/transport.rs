use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use bytes::Bytes;
use opamp_core::connection::{ConnectionId, ConnectionType};
use prost::Message as _;
use proto::opamp::{AgentToServer, ServerToAgent};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::handler::OpampHandler;

/// Builds the Axum router exposing the OpAMP endpoint: a WebSocket upgrade
/// and an HTTP POST fallback on the same path, per the OpAMP transport spec.
pub fn router(handler: Arc<OpampHandler>) -> Router {
    Router::new()
        .route("/v1/opamp", axum::routing::get(ws_upgrade).post(http_fallback))
        .with_state(handler)
}

async fn ws_upgrade(State(handler): State<Arc<OpampHandler>>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, handler))
}

async fn handle_socket(socket: WebSocket, handler: Arc<OpampHandler>) {
    let connection_id = ConnectionId::generate();
    let (mut sink, mut stream) = futures::StreamExt::split(socket);
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<ServerToAgent>(32);
    let reply_tx = outbound_tx.clone();

    handler.on_connected(connection_id.clone(), outbound_tx);

    let writer = tokio::spawn(async move {
        use futures::SinkExt;
        while let Some(message) = outbound_rx.recv().await {
            let encoded = message.encode_to_vec();
            if sink.send(Message::Binary(encoded)).await.is_err() {
                break;
            }
        }
    });

    let mut bound_instance_uid = None;
    while let Some(Ok(message)) = futures::StreamExt::next(&mut stream).await {
        let Message::Binary(data) = message else {
            continue;
        };
        let Ok(wire) = AgentToServer::decode(data.as_ref()) else {
            warn!("failed to decode AgentToServer frame, ignoring");
            continue;
        };
        let reply = handler
            .on_message(&connection_id, ConnectionType::WebSocket, &wire)
            .await;
        bound_instance_uid = opamp_core::instance_uid::InstanceUid::try_from(wire.instance_uid.as_slice()).ok();

        if reply_tx.send(reply).await.is_err() {
            debug!("failed to queue reply for websocket writer");
        }
    }

    handler.on_connection_close(connection_id, bound_instance_uid);
    writer.abort();
}

async fn http_fallback(State(handler): State<Arc<OpampHandler>>, body: Bytes) -> impl IntoResponse {
    let connection_id = ConnectionId::generate();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<ServerToAgent>(1);
    handler.on_connected(connection_id.clone(), outbound_tx);

    let response_bytes = match AgentToServer::decode(body.as_ref()) {
        Ok(wire) => {
            let reply = handler.on_message(&connection_id, ConnectionType::Http, &wire).await;
            reply.encode_to_vec()
        }
        Err(_) => ServerToAgent::default().encode_to_vec(),
    };
    outbound_rx.close();

    let bound_instance_uid = None;
    handler.on_connection_close(connection_id, bound_instance_uid);

    ([(axum::http::header::CONTENT_TYPE, "application/x-protobuf")], response_bytes)
}
