//! Replication strategy abstractions.
//!
//! - **SimpleStrategy**: N replicas placed on consecutive distinct nodes
//!   clockwise from the key

pub mod simple;

pub use simple::SimpleStrategy;

use crate::error::Result;
use corelib::HashRing;

/// Trait for replication strategies.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync) as they may be
/// shared across threads alongside the ring.
pub trait ReplicationStrategy: Send + Sync + 'static {
    /// Number of copies this strategy asks for, owner included.
    fn replication_factor(&self) -> usize;

    /// Nodes that should hold `key`, owner first.
    ///
    /// Returns fewer than `replication_factor` nodes when the ring is smaller.
    ///
    /// # Performance
    /// O(log n + p) where n = ring positions, p = positions walked
    fn replicas_for_key(&self, ring: &HashRing, key: &str) -> Result<Vec<String>>;

    /// Strategy name (for logging/debugging).
    fn name(&self) -> &'static str;
}
