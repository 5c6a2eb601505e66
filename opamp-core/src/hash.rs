use fnv::FnvHasher;
use std::hash::Hasher;

/// An opaque content hash. Equality is byte-wise; produced by a fast
/// non-cryptographic hash (FNV-64) over exact config bytes, never copied
/// from the wire.
#[derive(Clone, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Hash(Vec<u8>);

impl Hash {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash({})", hex(&self.0))
    }
}

impl From<Vec<u8>> for Hash {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// `new_hash` is total and deterministic: equal inputs always produce equal
/// hashes, and hash equality is used by the caller as a stand-in for byte
/// equality on the (much larger) config body.
pub fn new_hash(data: &[u8]) -> Hash {
    let mut hasher = FnvHasher::default();
    hasher.write(data);
    Hash(hasher.finish().to_be_bytes().to_vec())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(new_hash(b"hello"), new_hash(b"hello"));
    }

    #[test]
    fn distinguishes_different_inputs() {
        assert_ne!(new_hash(b"hello"), new_hash(b"world"));
    }

    #[test]
    fn empty_input_hashes_to_a_stable_value() {
        assert_eq!(new_hash(b""), new_hash(b""));
        assert_ne!(new_hash(b""), new_hash(b"x"));
    }
}
