use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// A 128-bit identifier the agent generates and persists, stable across
/// restarts unless the server issues a new one via `AgentIdentification`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct InstanceUid(Uuid);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstanceUidError {
    #[error("invalid instance uid format: {0}")]
    InvalidFormat(String),
}

impl InstanceUid {
    /// Generates a fresh v7 (time-ordered) instance UID, used when the
    /// server assigns a new identity to an agent.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_bytes(&self) -> [u8; 16] {
        *self.0.as_bytes()
    }
}

impl fmt::Display for InstanceUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_simple())
    }
}

impl fmt::Debug for InstanceUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceUid({self})")
    }
}

impl TryFrom<&[u8]> for InstanceUid {
    type Error = InstanceUidError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(InstanceUidError::InvalidFormat("empty instance uid".to_string()));
        }
        let bytes: [u8; 16] = value
            .try_into()
            .map_err(|_| InstanceUidError::InvalidFormat(format!("{} bytes, want 16", value.len())))?;
        Ok(Self(Uuid::from_bytes(bytes)))
    }
}

impl TryFrom<Vec<u8>> for InstanceUid {
    type Error = InstanceUidError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(value.as_slice())
    }
}

impl TryFrom<&str> for InstanceUid {
    type Error = InstanceUidError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|err| InstanceUidError::InvalidFormat(err.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn generates_distinct_uids() {
        assert_ne!(InstanceUid::generate(), InstanceUid::generate());
    }

    #[test]
    fn round_trips_through_bytes() {
        let uid = InstanceUid::generate();
        let bytes = uid.as_bytes();
        let parsed = InstanceUid::try_from(bytes.as_slice()).unwrap();
        assert_eq!(uid, parsed);
    }

    #[test]
    fn rejects_empty_bytes() {
        assert_matches::assert_matches!(
            InstanceUid::try_from(Vec::new()),
            Err(InstanceUidError::InvalidFormat(_))
        );
    }

    #[test]
    fn rejects_wrong_length() {
        assert_matches::assert_matches!(
            InstanceUid::try_from(vec![1, 2, 3]),
            Err(InstanceUidError::InvalidFormat(_))
        );
    }

    #[test]
    fn parses_hyphenated_string() {
        let uid = InstanceUid::generate();
        let text = uuid::Uuid::from_bytes(uid.as_bytes()).to_string();
        let parsed = InstanceUid::try_from(text.as_str()).unwrap();
        assert_eq!(uid, parsed);
    }
}
