//! xxh3 hasher.

use crate::hash::traits::KeyHasher;
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// xxh3-64 folded to 32 bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3Hasher {
    seed: u64,
}

impl Xxh3Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl KeyHasher for Xxh3Hasher {
    #[inline]
    fn hash(&self, key: &[u8]) -> u32 {
        let h = xxh3_64_with_seed(key, self.seed);
        (h ^ (h >> 32)) as u32
    }

    fn name(&self) -> &'static str {
        "Xxh3"
    }
}
