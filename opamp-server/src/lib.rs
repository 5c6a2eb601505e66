//! The server half of the OpAMP protocol: per-connection state handling,
//! the in-memory connection registry, and the Axum WebSocket/HTTP
//! transport that wires them to a socket.

pub mod handler;
pub mod mapping;
pub mod registry;
pub mod transport;

pub use handler::OpampHandler;
pub use registry::InMemoryConnectionRegistry;
