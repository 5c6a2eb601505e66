use serde::{Deserialize, Serialize};

use crate::time::Time;

/// A timestamped, typed status record attached to a resource for
/// auditability (soft-deletes, conflict records, restart requests, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: String,
    pub status: ConditionStatus,
    #[serde(rename = "lastTransitionTime")]
    pub last_transition_time: Time,
    pub reason: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

impl Condition {
    pub fn new(kind: impl Into<String>, status: ConditionStatus, reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            status,
            last_transition_time: Time::now(),
            reason: reason.into(),
            message: message.into(),
        }
    }
}
