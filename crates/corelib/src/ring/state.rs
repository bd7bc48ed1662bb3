//! The ring state record guarded by the ring's lock.
//!
//! `RingState` holds the three structures that must change together: the
//! member set, the position claims, and the sorted position index. It
//! has no locking of its own; `HashRing` wraps the whole record in one
//! `RwLock` so no reader ever sees them out of step.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use tracing::warn;

use crate::vnode::VirtualNode;

/// Size of the 32-bit position space.
const RING_SIZE: u64 = 1 << 32;

#[derive(Debug, Default, Clone)]
pub(crate) struct RingState {
    members: BTreeSet<String>,
    /// Position -> nodes claiming it, in insertion order. The last claimant
    /// owns the position; earlier ones take over when it leaves.
    claims: HashMap<u32, Vec<Arc<str>>>,
    /// Occupied positions, ascending, no duplicates. Same key set as `claims`.
    positions: Vec<u32>,
}

impl RingState {
    pub(crate) fn members(&self) -> &BTreeSet<String> {
        &self.members
    }

    pub(crate) fn contains(&self, node: &str) -> bool {
        self.members.contains(node)
    }

    pub(crate) fn position_count(&self) -> usize {
        self.positions.len()
    }

    fn owner(&self, position: u32) -> Option<&str> {
        self.claims
            .get(&position)
            .and_then(|claimants| claimants.last())
            .map(|owner| &**owner)
    }

    /// Adds every `(node, vnodes)` pair, resorting the index once at the end.
    ///
    /// Positions depend only on the node name, so a node that is already a
    /// member is skipped: re-adding leaves the ring exactly as it was.
    pub(crate) fn insert_all(&mut self, batch: &[(String, Vec<VirtualNode>)]) {
        let mut inserted = false;
        for (node, vnodes) in batch {
            if self.contains(node) {
                continue;
            }

            let name: Arc<str> = Arc::from(node.as_str());
            for vnode in vnodes {
                let claimants = self.claims.entry(vnode.position).or_default();
                if let Some(prev) = claimants.last() {
                    if **prev != **node {
                        warn!(
                            position = vnode.position,
                            previous = %prev,
                            node = %node,
                            "ring position collision, last writer takes ownership"
                        );
                    }
                }
                claimants.push(Arc::clone(&name));
            }
            self.positions.extend(vnodes.iter().map(|vnode| vnode.position));
            self.members.insert(node.clone());
            inserted = true;
        }

        if inserted {
            self.positions.sort_unstable();
            self.positions.dedup();
        }
    }

    /// Removes `node` and its claims. A position shared with another node
    /// passes to the most recent remaining claimant. Returns `false` when
    /// `node` was not a member.
    pub(crate) fn remove(&mut self, node: &str, vnodes: &[VirtualNode]) -> bool {
        if !self.members.remove(node) {
            return false;
        }

        let mut vacated: HashSet<u32> = HashSet::new();
        for vnode in vnodes {
            if let Some(claimants) = self.claims.get_mut(&vnode.position) {
                claimants.retain(|claimant| &**claimant != node);
                if claimants.is_empty() {
                    self.claims.remove(&vnode.position);
                    vacated.insert(vnode.position);
                }
            }
        }
        self.positions.retain(|position| !vacated.contains(position));
        true
    }

    /// Index of the nearest successor of `hash`: the first position `>= hash`,
    /// wrapping to 0 past the largest position.
    fn successor_index(&self, hash: u32) -> Option<usize> {
        if self.positions.is_empty() {
            return None;
        }
        let idx = self.positions.partition_point(|&position| position < hash);
        Some(if idx == self.positions.len() { 0 } else { idx })
    }

    /// Owner of the nearest successor of `hash`.
    pub(crate) fn lookup(&self, hash: u32) -> Option<&str> {
        let idx = self.successor_index(hash)?;
        self.owner(self.positions[idx])
    }

    /// Up to `n` distinct owners met walking clockwise from `hash`.
    pub(crate) fn successors(&self, hash: u32, n: usize) -> Vec<&str> {
        let Some(start) = self.successor_index(hash) else {
            return Vec::new();
        };
        let want = n.min(self.members.len());
        let len = self.positions.len();
        let mut found: Vec<&str> = Vec::with_capacity(want);

        for step in 0..len {
            if found.len() >= want {
                break;
            }
            let position = self.positions[(start + step) % len];
            if let Some(owner) = self.owner(position) {
                if !found.contains(&owner) {
                    found.push(owner);
                }
            }
        }
        found
    }

    /// `(position, owner)` pairs in ring order.
    pub(crate) fn positions(&self) -> Vec<(u32, String)> {
        self.positions
            .iter()
            .filter_map(|&position| {
                self.owner(position)
                    .map(|owner| (position, owner.to_string()))
            })
            .collect()
    }

    /// Fraction of the position space each member owns.
    ///
    /// A position owns the arc from its predecessor (exclusive) up to itself
    /// (inclusive), which is exactly the set of hashes `lookup` resolves to it.
    pub(crate) fn ownership(&self) -> BTreeMap<String, f64> {
        let mut arcs: BTreeMap<String, u64> = self
            .members
            .iter()
            .map(|member| (member.clone(), 0))
            .collect();

        let len = self.positions.len();
        for (idx, &position) in self.positions.iter().enumerate() {
            let prev = self.positions[(idx + len - 1) % len];
            let arc = if len == 1 {
                RING_SIZE
            } else {
                u64::from(position.wrapping_sub(prev))
            };
            if let Some(owner) = self.owner(position) {
                if let Some(total) = arcs.get_mut(owner) {
                    *total += arc;
                }
            }
        }

        arcs.into_iter()
            .map(|(member, arc)| (member, arc as f64 / RING_SIZE as f64))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert!(
            self.positions.windows(2).all(|w| w[0] < w[1]),
            "positions must be strictly ascending"
        );
        assert_eq!(self.positions.len(), self.claims.len());
        for position in &self.positions {
            assert!(self.claims.get(position).is_some_and(|c| !c.is_empty()));
        }
        for claimant in self.claims.values().flatten() {
            assert!(self.members.contains(&**claimant), "claimant {claimant} is not a member");
        }
        for member in &self.members {
            assert!(
                self.claims.values().flatten().any(|claimant| **claimant == **member),
                "member {member} holds no position"
            );
        }
    }
}
