//! Ring configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::HashAlgorithm;

/// Virtual nodes per member when nothing else is configured.
pub const DEFAULT_REPLICAS: usize = 20;

/// Construction-time settings for a [`HashRing`](crate::ring::HashRing).
///
/// Missing fields fall back to their defaults, so `{}` is a valid config:
///
/// ```rust
/// use corelib::{HashAlgorithm, RingConfig};
///
/// let config: RingConfig = serde_json::from_str(r#"{ "replicas": 64 }"#).unwrap();
/// assert_eq!(config.replicas, 64);
/// assert_eq!(config.hash, HashAlgorithm::Fnv1a);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingConfig {
    /// Virtual nodes per member.
    pub replicas: usize,
    /// Hasher used for both replica placement and key lookup.
    pub hash: HashAlgorithm,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            hash: HashAlgorithm::default(),
        }
    }
}

impl RingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.replicas == 0 {
            return Err(Error::InvalidReplicas(self.replicas));
        }
        Ok(())
    }
}
