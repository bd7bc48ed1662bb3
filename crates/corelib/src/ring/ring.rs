//! Hash ring data structure.
//!
//! `HashRing` is the shared, thread-safe ring: a single `parking_lot::RwLock`
//! guards the whole [`RingState`] record. Membership changes take the write
//! lock for the complete transition; lookups share the read lock.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::config::{RingConfig, DEFAULT_REPLICAS};
use crate::error::{Error, Result};
use crate::hash::{Fnv1a32, HashAlgorithm, KeyHasher};
use crate::ring::state::RingState;
use crate::vnode::VirtualNode;

/// Consistent hash ring mapping string keys to member nodes.
///
/// Every member is placed at `replicas` positions. A key belongs to the member
/// owning the first position at or after the key's hash, wrapping past the
/// top of the 32-bit space.
///
/// # Example
///
/// ```rust
/// use corelib::HashRing;
///
/// let ring = HashRing::new();
/// ring.add("192.168.0.1");
/// ring.add("192.168.0.2");
///
/// let owner = ring.get("/hello.txt").unwrap();
/// assert!(owner == "192.168.0.1" || owner == "192.168.0.2");
/// ```
pub struct HashRing {
    replicas: usize,
    hasher: Arc<dyn KeyHasher>,
    state: RwLock<RingState>,
}

impl HashRing {
    /// Empty ring with 20 replicas per node and FNV-1a hashing.
    pub fn new() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            hasher: Arc::new(Fnv1a32),
            state: RwLock::new(RingState::default()),
        }
    }

    /// Empty ring with a custom replica count and the default hasher.
    pub fn with_replicas(replicas: usize) -> Result<Self> {
        Self::with_hasher(replicas, Fnv1a32)
    }

    /// Empty ring with a custom replica count and hasher.
    pub fn with_hasher<H: KeyHasher>(replicas: usize, hasher: H) -> Result<Self> {
        Self::from_parts(replicas, Arc::new(hasher))
    }

    pub fn from_config(config: &RingConfig) -> Result<Self> {
        config.validate()?;
        Self::from_parts(config.replicas, config.hash.hasher())
    }

    pub fn builder() -> RingBuilder {
        RingBuilder::new()
    }

    fn from_parts(replicas: usize, hasher: Arc<dyn KeyHasher>) -> Result<Self> {
        if replicas == 0 {
            return Err(Error::InvalidReplicas(replicas));
        }
        Ok(Self {
            replicas,
            hasher,
            state: RwLock::new(RingState::default()),
        })
    }

    /// Adds `node` to the ring. Re-adding a member is a no-op.
    pub fn add(&self, node: impl AsRef<str>) {
        self.add_all([node]);
    }

    /// Adds several nodes under one write lock, sorting the index once.
    pub fn add_all<I, S>(&self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // Hash outside the lock: a panicking hasher leaves the ring untouched.
        let batch: Vec<(String, Vec<VirtualNode>)> = nodes
            .into_iter()
            .map(|node| {
                let node = node.as_ref();
                (node.to_string(), self.vnodes_of(node))
            })
            .collect();
        if batch.is_empty() {
            return;
        }

        let mut state = self.state.write();
        state.insert_all(&batch);
        debug!(
            nodes = ?batch.iter().map(|(node, _)| node.as_str()).collect::<Vec<_>>(),
            members = state.members().len(),
            positions = state.position_count(),
            "added nodes to ring"
        );
    }

    /// Removes `node` from the ring. Returns `true` if it was a member;
    /// removing a non-member is a no-op.
    pub fn remove(&self, node: impl AsRef<str>) -> bool {
        let node = node.as_ref();
        let vnodes = self.vnodes_of(node);

        let mut state = self.state.write();
        let removed = state.remove(node, &vnodes);
        if removed {
            debug!(
                node,
                members = state.members().len(),
                positions = state.position_count(),
                "removed node from ring"
            );
        }
        removed
    }

    /// Returns the node owning `key`.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRing`] when the ring has no members.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<String> {
        let hash = self.hasher.hash(key.as_ref());
        let state = self.state.read();
        let owner = state.lookup(hash).ok_or(Error::EmptyRing)?;
        trace!(hash, owner, "resolved key");
        Ok(owner.to_string())
    }

    /// Returns up to `n` distinct nodes walking clockwise from `key`, the
    /// owner first. Fewer than `n` are returned when the ring has fewer members.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRing`] when the ring has no members.
    pub fn get_n(&self, key: impl AsRef<[u8]>, n: usize) -> Result<Vec<String>> {
        let hash = self.hasher.hash(key.as_ref());
        let state = self.state.read();
        if state.position_count() == 0 {
            return Err(Error::EmptyRing);
        }
        Ok(state
            .successors(hash, n)
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Snapshot of the current members, sorted.
    pub fn members(&self) -> Vec<String> {
        self.state.read().members().iter().cloned().collect()
    }

    pub fn contains(&self, node: impl AsRef<str>) -> bool {
        self.state.read().contains(node.as_ref())
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.state.read().members().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().members().is_empty()
    }

    /// Number of occupied ring positions (`replicas × members` barring collisions).
    pub fn position_count(&self) -> usize {
        self.state.read().position_count()
    }

    /// Snapshot of `(position, node)` pairs in ring order (for debugging).
    pub fn positions(&self) -> Vec<(u32, String)> {
        self.state.read().positions()
    }

    /// Fraction of the position space owned by each member, sorted by node.
    pub fn ownership(&self) -> Vec<(String, f64)> {
        self.state.read().ownership().into_iter().collect()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    pub fn hasher_name(&self) -> &'static str {
        self.hasher.name()
    }

    fn vnodes_of(&self, node: &str) -> Vec<VirtualNode> {
        VirtualNode::replicas_of(self.hasher.as_ref(), node, self.replicas)
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.state.read().assert_invariants();
    }
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("hasher", &self.hasher.name())
            .field("members", state.members())
            .field("positions", &state.position_count())
            .finish()
    }
}

/// Builder for a pre-seeded [`HashRing`].
///
/// ```rust
/// use corelib::RingBuilder;
/// use corelib::hash::Xxh3Hasher;
///
/// let ring = RingBuilder::new()
///     .with_replicas(8)
///     .with_hasher(Xxh3Hasher::new())
///     .add_node("node1")
///     .add_node("node2")
///     .build()
///     .unwrap();
/// assert_eq!(ring.position_count(), 16);
/// ```
pub struct RingBuilder {
    replicas: usize,
    hasher: Arc<dyn KeyHasher>,
    nodes: Vec<String>,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            hasher: Arc::new(Fnv1a32),
            nodes: Vec::new(),
        }
    }

    /// Starts from a config's replica count and hash algorithm.
    pub fn from_config(config: &RingConfig) -> Self {
        Self::new()
            .with_replicas(config.replicas)
            .with_algorithm(config.hash)
    }

    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    pub fn with_hasher<H: KeyHasher>(mut self, hasher: H) -> Self {
        self.hasher = Arc::new(hasher);
        self
    }

    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hasher = algorithm.hasher();
        self
    }

    pub fn add_node(mut self, node: impl Into<String>) -> Self {
        self.nodes.push(node.into());
        self
    }

    pub fn add_nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// # Errors
    ///
    /// [`Error::InvalidReplicas`] when the replica count is zero.
    pub fn build(self) -> Result<HashRing> {
        let ring = HashRing::from_parts(self.replicas, self.hasher)?;
        ring.add_all(&self.nodes);
        Ok(ring)
    }
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}
