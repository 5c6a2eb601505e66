use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::agent::ConnectionSettingsOffer;

/// A selector over agent attributes. An empty selector (both maps empty)
/// matches every agent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Selector {
    pub identifying_attributes: HashMap<String, String>,
    pub non_identifying_attributes: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    pub value: Vec<u8>,
    pub content_type: String,
    pub connection_settings: Option<ConnectionSettingsOffer>,
}

impl AgentConfig {
    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupStatusCounters {
    pub total: u64,
    pub connected: u64,
    pub healthy: u64,
    pub unhealthy: u64,
    pub not_connected: u64,
}

/// A named selector over agent attributes, paired with a priority and a
/// desired remote config / connection-settings offer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AgentGroup {
    pub name: String,
    pub priority: i64,
    pub attributes: HashMap<String, String>,
    pub selector: Selector,
    pub agent_config: Option<AgentConfig>,
    pub status: GroupStatusCounters,
}
