pub mod agents;
pub mod connections;
pub mod groups;
pub mod packages;
pub mod ping;
pub mod remoteconfigs;
pub mod server;
