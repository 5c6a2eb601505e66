/// OpAMP-defined capability bits an agent can advertise. Values mirror
/// `proto::opamp::AgentCapabilities` but are exposed here as a single
/// bitmask type so the domain layer never depends on the wire enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Capabilities(pub u64);

#[rustfmt::skip]
impl Capabilities {
    pub const REPORTS_STATUS:                       u64 = 1;
    pub const ACCEPTS_REMOTE_CONFIG:                u64 = 2;
    pub const REPORTS_EFFECTIVE_CONFIG:             u64 = 4;
    pub const ACCEPTS_PACKAGES:                     u64 = 8;
    pub const REPORTS_PACKAGE_STATUSES:             u64 = 16;
    pub const REPORTS_OWN_TRACES:                   u64 = 32;
    pub const REPORTS_OWN_METRICS:                  u64 = 64;
    pub const REPORTS_OWN_LOGS:                     u64 = 128;
    pub const ACCEPTS_OPAMP_CONNECTION_SETTINGS:    u64 = 256;
    pub const ACCEPTS_OTHER_CONNECTION_SETTINGS:    u64 = 512;
    pub const ACCEPTS_RESTART_COMMAND:              u64 = 1024;
    pub const REPORTS_HEALTH:                       u64 = 2048;
    pub const REPORTS_REMOTE_CONFIG:                u64 = 4096;
    pub const REPORTS_HEARTBEAT:                    u64 = 8192;
    pub const REPORTS_AVAILABLE_COMPONENTS:         u64 = 16384;
}

impl Capabilities {
    pub fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// The bitwise subset test: `self` has `cap` iff every bit set in `cap`
    /// is also set in `self`.
    pub fn has(&self, cap: u64) -> bool {
        self.0 & cap == cap
    }
}

impl From<u64> for Capabilities {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Capabilities> for u64 {
    fn from(value: Capabilities) -> Self {
        value.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn has_single_capability() {
        let caps = Capabilities::new(Capabilities::REPORTS_STATUS);
        assert!(caps.has(Capabilities::REPORTS_STATUS));
        assert!(!caps.has(Capabilities::ACCEPTS_REMOTE_CONFIG));
    }

    #[test]
    fn has_many_capabilities() {
        let caps = Capabilities::new(
            Capabilities::REPORTS_STATUS | Capabilities::ACCEPTS_REMOTE_CONFIG | Capabilities::REPORTS_HEARTBEAT,
        );
        assert!(caps.has(Capabilities::REPORTS_STATUS));
        assert!(caps.has(Capabilities::ACCEPTS_REMOTE_CONFIG));
        assert!(caps.has(Capabilities::REPORTS_HEARTBEAT));
        assert!(!caps.has(Capabilities::REPORTS_AVAILABLE_COMPONENTS));
    }

    #[test]
    fn no_capabilities() {
        let caps = Capabilities::default();
        assert!(!caps.has(Capabilities::REPORTS_STATUS));
    }

    #[test]
    fn has_is_a_subset_test_not_an_intersection_test() {
        let caps = Capabilities::new(Capabilities::REPORTS_STATUS);
        let combo = Capabilities::REPORTS_STATUS | Capabilities::ACCEPTS_REMOTE_CONFIG;
        assert!(!caps.has(combo));
    }
}
