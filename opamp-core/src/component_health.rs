use std::collections::HashMap;

use crate::time::Time;

/// Bound on `component_health_map` recursion depth when comparing or
/// otherwise walking health trees. The OpAMP wire message is acyclic, but a
/// malicious or buggy agent could still nest arbitrarily deep.
pub const MAX_HEALTH_DEPTH: usize = 32;

/// Domain mirror of `proto::opamp::ComponentHealth`, healthy flag plus a
/// bounded-depth recursive map of subcomponent health.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ComponentHealth {
    pub healthy: bool,
    pub start_time: Time,
    pub last_error: String,
    pub status: String,
    pub status_time: Time,
    pub component_health_map: HashMap<String, ComponentHealth>,
}

impl ComponentHealth {
    /// Compares two health reports ignoring their timestamps, since those
    /// change on every heartbeat even when the health itself is unchanged.
    pub fn is_same_as(&self, other: &ComponentHealth) -> bool {
        self.is_same_as_at_depth(other, 0)
    }

    fn is_same_as_at_depth(&self, other: &ComponentHealth, depth: usize) -> bool {
        if self.healthy != other.healthy || self.last_error != other.last_error || self.status != other.status {
            return false;
        }
        if depth >= MAX_HEALTH_DEPTH {
            return self.component_health_map.len() == other.component_health_map.len();
        }
        self.component_health_map.len() == other.component_health_map.len()
            && self.component_health_map.iter().all(|(name, health)| {
                other
                    .component_health_map
                    .get(name)
                    .is_some_and(|other_health| health.is_same_as_at_depth(other_health, depth + 1))
            })
    }
}
