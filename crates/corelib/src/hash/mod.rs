//! Key hashers for the ring.
//!
//! A hasher maps bytes (node replica labels and lookup keys alike) to a
//! 32-bit position. The ring is polymorphic over [`KeyHasher`]; pick one of
//! the implementations here or wrap a function with [`HashFn`].

pub mod fnv;
pub mod sip;
pub mod traits;
pub mod xxh3;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub use fnv::{Fnv1_32, Fnv1a32};
pub use sip::SipHasher;
pub use traits::{HashFn, KeyHasher};
pub use xxh3::Xxh3Hasher;

/// Named built-in hashers, selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Fnv1a,
    Fnv1,
    Xxh3,
    Sip13,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 4] = [
        HashAlgorithm::Fnv1a,
        HashAlgorithm::Fnv1,
        HashAlgorithm::Xxh3,
        HashAlgorithm::Sip13,
    ];

    /// Instantiates the hasher with default seed/keys.
    pub fn hasher(self) -> Arc<dyn KeyHasher> {
        match self {
            HashAlgorithm::Fnv1a => Arc::new(Fnv1a32),
            HashAlgorithm::Fnv1 => Arc::new(Fnv1_32),
            HashAlgorithm::Xxh3 => Arc::new(Xxh3Hasher::new()),
            HashAlgorithm::Sip13 => Arc::new(SipHasher::new()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Fnv1a => "fnv1a",
            HashAlgorithm::Fnv1 => "fnv1",
            HashAlgorithm::Xxh3 => "xxh3",
            HashAlgorithm::Sip13 => "sip13",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HashAlgorithm::ALL
            .into_iter()
            .find(|algo| algo.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "unknown hash algorithm {s:?} (expected fnv1a, fnv1, xxh3 or sip13)"
                ))
            })
    }
}
