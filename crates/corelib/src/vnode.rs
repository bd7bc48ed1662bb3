//! Virtual node abstractions.
//!
//! # Virtual Nodes (Replicas) Concept
//!
//! A single hash point per member leaves large, uneven gaps on the ring: one
//! unlucky member can own half of the key space. Each member is therefore
//! placed at several positions (its virtual nodes, or replicas). The more
//! replicas, the closer every member's share gets to `1 / members`.
//!
//! # Placement
//!
//! Replica `i` of node `n` sits at `hash(decimal(i) ++ n)`. The label depends
//! only on the index and the node name, so the positions of a node are fully
//! reproducible: removing a node recomputes them instead of storing them.
//!
//! # Performance Characteristics
//!
//! - **Memory**: O(R) positions per member (R = replicas)
//! - **Lookup**: O(log(R × members)), binary search over all positions
//! - **Rebalancing**: roughly `keys / members` keys move when a member joins or leaves
//!
//! # Typical Configuration
//!
//! - **Default**: 20 replicas per node
//! - **Few nodes, even load wanted**: 100-200 replicas per node
//!
//! More replicas = smoother distribution but more memory and slower mutation.

use std::fmt::Write as _;

use crate::hash::KeyHasher;

/// A virtual node on the hash ring.
///
/// Represents one position owned by a member. The owning node name is kept by
/// the ring, not here, so a `VirtualNode` is a small `Copy` value.
///
/// # Memory Layout
///
/// ```text
/// VirtualNode {
///     position: u32,
///     replica: usize,
/// }
/// Total: 16 bytes on 64-bit targets (4 bytes of padding)
/// ```
///
/// # Example
///
/// ```rust
/// use corelib::hash::Fnv1a32;
/// use corelib::VirtualNode;
///
/// let vnode = VirtualNode::from_index(&Fnv1a32, "192.168.0.1", 0);
/// assert_eq!(vnode.replica(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// Position on the ring. Ordering of virtual nodes follows this field.
    pub position: u32,

    /// Replica index in `0..replicas`.
    pub replica: usize,
}

impl VirtualNode {
    #[inline]
    pub fn new(position: u32, replica: usize) -> Self {
        Self { position, replica }
    }

    /// Create replica `replica` of `node`.
    ///
    /// # Algorithm
    ///
    /// 1. Format the label: decimal replica index followed by the node name
    /// 2. Hash the label to get the position
    ///
    /// # Performance
    /// - **Time**: O(k) where k = label length
    /// - **Space**: O(k) temporary for the label
    pub fn from_index(hasher: &dyn KeyHasher, node: &str, replica: usize) -> Self {
        let mut label = String::with_capacity(node.len() + 4);
        Self::place(hasher, node, replica, &mut label)
    }

    /// All `replicas` virtual nodes of `node`, in replica order.
    ///
    /// Reuses one label buffer for the whole node.
    pub fn replicas_of(hasher: &dyn KeyHasher, node: &str, replicas: usize) -> Vec<Self> {
        let mut label = String::with_capacity(node.len() + 4);
        (0..replicas)
            .map(|replica| Self::place(hasher, node, replica, &mut label))
            .collect()
    }

    fn place(hasher: &dyn KeyHasher, node: &str, replica: usize, label: &mut String) -> Self {
        label.clear();
        // Writing into a String cannot fail.
        let _ = write!(label, "{replica}{node}");
        Self::new(hasher.hash(label.as_bytes()), replica)
    }

    #[inline]
    pub fn position(&self) -> u32 {
        self.position
    }

    #[inline]
    pub fn replica(&self) -> usize {
        self.replica
    }
}

impl std::fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VNode(position={:08x}, replica={})", self.position, self.replica)
    }
}
