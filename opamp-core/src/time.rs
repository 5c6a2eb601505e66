use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A timestamp that serializes as RFC-3339 at the REST boundary, with the
/// zero value serializing as JSON `null` and round-tripping back to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Time(Option<DateTime<Utc>>);

impl Time {
    pub fn zero() -> Self {
        Self(None)
    }

    pub fn now() -> Self {
        Self(Some(Utc::now()))
    }

    pub fn from_datetime(value: DateTime<Utc>) -> Self {
        Self(Some(value))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        self.0
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::zero()
    }
}

/// `lhs` is strictly after `rhs`; zero is never after anything, matching
/// `ShouldBeRestarted`'s "non-zero and strictly after" rule.
impl Time {
    pub fn is_after(&self, other: &Time) -> bool {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a > b,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

impl Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Some(value) => serializer.serialize_some(&value.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(Self::zero()),
            Some(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| Self(Some(dt.with_timezone(&Utc))))
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_round_trips_through_null() {
        let zero = Time::zero();
        let json = serde_json::to_string(&zero).unwrap();
        assert_eq!(json, "null");
        let parsed: Time = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, zero);
        assert!(parsed.is_zero());
    }

    #[test]
    fn non_zero_round_trips() {
        let t = Time::now();
        let json = serde_json::to_string(&t).unwrap();
        let parsed: Time = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, t);
    }

    #[test]
    fn after_ignores_zero_values() {
        let zero = Time::zero();
        let now = Time::now();
        assert!(now.is_after(&zero));
        assert!(!zero.is_after(&now));
        assert!(!zero.is_after(&zero));
    }
}
