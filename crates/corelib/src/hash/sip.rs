//! SipHash-1-3 hasher.

use crate::hash::traits::KeyHasher;
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// SipHash-1-3 folded to 32 bits.
///
/// With a secret key, clients cannot choose keys that pile onto one node.
#[derive(Clone, Copy, Debug, Default)]
pub struct SipHasher {
    k0: u64,
    k1: u64,
}

impl SipHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keys(k0: u64, k1: u64) -> Self {
        Self { k0, k1 }
    }
}

impl KeyHasher for SipHasher {
    fn hash(&self, key: &[u8]) -> u32 {
        let mut hasher = SipHasher13::new_with_keys(self.k0, self.k1);
        hasher.write(key);
        let h = hasher.finish();
        (h ^ (h >> 32)) as u32
    }

    fn name(&self) -> &'static str {
        "SipHash13"
    }
}
