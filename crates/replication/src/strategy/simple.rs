//! Simple replication strategy.
//!
//! Places N replicas on consecutive distinct nodes clockwise from the key.
//!
//! # Algorithm
//!
//! 1. Find the key's nearest successor position (its owner)
//! 2. Continue clockwise, skipping positions of nodes already chosen
//! 3. Stop after N distinct nodes or one full turn of the ring
//!
//! # Limitations
//!
//! - Doesn't consider data center/rack placement
//! - A membership change can shift every entry after the changed node

use tracing::trace;

use crate::error::{ReplicationError, Result};
use crate::strategy::ReplicationStrategy;
use corelib::HashRing;

/// Simple replication strategy: N replicas placed sequentially around the ring.
///
/// # Example
///
/// ```rust
/// use corelib::RingBuilder;
/// use replication::{ReplicationStrategy, SimpleStrategy};
///
/// let ring = RingBuilder::new().add_nodes(["a", "b", "c"]).build().unwrap();
/// let strategy = SimpleStrategy::new(2).unwrap();
///
/// let replicas = strategy.replicas_for_key(&ring, "my-key").unwrap();
/// assert_eq!(replicas.len(), 2);
/// assert_eq!(replicas[0], ring.get("my-key").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct SimpleStrategy {
    /// Number of replicas to create (including the owner).
    replication_factor: usize,
}

impl SimpleStrategy {
    /// # Errors
    ///
    /// [`ReplicationError::ZeroReplicationFactor`] for a factor of 0.
    pub fn new(replication_factor: usize) -> Result<Self> {
        if replication_factor == 0 {
            return Err(ReplicationError::ZeroReplicationFactor);
        }
        Ok(Self { replication_factor })
    }
}

impl Default for SimpleStrategy {
    /// Owner plus two replicas.
    fn default() -> Self {
        Self {
            replication_factor: 3,
        }
    }
}

impl ReplicationStrategy for SimpleStrategy {
    fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    fn replicas_for_key(&self, ring: &HashRing, key: &str) -> Result<Vec<String>> {
        let replicas = ring.get_n(key, self.replication_factor)?;
        trace!(key, ?replicas, strategy = self.name(), "placed replicas");
        Ok(replicas)
    }

    fn name(&self) -> &'static str {
        "SimpleStrategy"
    }
}
