//! Comprehensive tests for the hash ring implementation.
//!
//! # Test Strategy
//!
//! 1. **Basic functionality**: Empty ring, add/lookup, remove
//! 2. **Multiple nodes**: Distribution, consistency
//! 3. **Membership changes**: Minimal disruption on add and remove
//! 4. **Edge cases**: Re-add, non-member remove, draining the ring
//! 5. **Thread safety**: Concurrent readers with a writer

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use corelib::hash::{Fnv1_32, Fnv1a32, HashFn, KeyHasher, Xxh3Hasher};
use corelib::{Error, HashRing, RingBuilder};

const IPS: [&str; 4] = ["192.168.0.1", "192.168.0.2", "192.168.0.3", "192.168.0.4"];

fn ring_of(nodes: &[&str]) -> HashRing {
    RingBuilder::new().add_nodes(nodes.iter().copied()).build().unwrap()
}

fn keys(count: usize) -> impl Iterator<Item = String> {
    (0..count).map(|i| format!("key-{i}"))
}

// ============================================================================
// Basic Functionality Tests
// ============================================================================

#[test]
fn test_empty_ring_lookup() {
    // An empty ring signals EmptyRing instead of inventing an owner
    let ring = HashRing::new();
    assert_eq!(ring.get("key1"), Err(Error::EmptyRing));
    assert_eq!(ring.get_n("key1", 3), Err(Error::EmptyRing));
    assert!(ring.is_empty());
    assert_eq!(ring.len(), 0);
    assert_eq!(ring.position_count(), 0);
    assert!(ring.members().is_empty());
}

#[test]
fn test_add_node_and_lookup() {
    let ring = HashRing::with_replicas(4).unwrap();
    ring.add("node1");

    assert_eq!(ring.len(), 1);
    assert_eq!(ring.position_count(), 4);
    assert!(ring.contains("node1"));
    assert_eq!(ring.get("test-key").unwrap(), "node1");
}

#[test]
fn test_remove_node() {
    let ring = HashRing::with_replicas(4).unwrap();
    ring.add("node1");
    ring.add("node2");
    assert_eq!(ring.position_count(), 8);

    assert!(ring.remove("node1"), "Should successfully remove node");
    assert_eq!(ring.len(), 1);
    assert_eq!(ring.position_count(), 4);
    assert!(!ring.contains("node1"));

    // Only node2 remains
    for key in keys(100) {
        assert_eq!(ring.get(&key).unwrap(), "node2");
    }

    // Removing a non-member is a no-op
    assert!(!ring.remove("node999"));
    assert_eq!(ring.len(), 1);
}

#[test]
fn test_membership_consistency() {
    let ring = HashRing::new();
    ring.add("a");
    assert!(ring.members().contains(&"a".to_string()));
    ring.remove("a");
    assert!(!ring.members().contains(&"a".to_string()));
}

// ============================================================================
// Multiple Nodes Tests
// ============================================================================

#[test]
fn test_hello_txt_scenario() {
    let ring = ring_of(&IPS);
    assert_eq!(ring.replicas(), 20);

    let owner = ring.get("/hello.txt").unwrap();
    assert!(IPS.contains(&owner.as_str()));
    for _ in 0..10 {
        assert_eq!(ring.get("/hello.txt").unwrap(), owner);
    }
}

#[test]
fn test_load_distribution() {
    // 10,000 keys over four nodes: nobody should get more than 3x the mean
    let ring = ring_of(&IPS);
    let mut stats: HashMap<String, usize> = HashMap::new();
    for i in 0..10_000u64 {
        // Spread keys like a random generator would, deterministically
        let a = i.wrapping_mul(6_364_136_223_846_793_005) % (i + 1);
        let b = i.wrapping_mul(1_442_695_040_888_963_407) % (i + 1);
        *stats.entry(ring.get(format!("{a}-{b}")).unwrap()).or_default() += 1;
    }

    let mean = 10_000 / IPS.len();
    for (node, count) in &stats {
        assert!(
            *count <= mean * 3,
            "{node} received {count} keys, mean is {mean}: {stats:?}"
        );
    }
}

#[test]
fn test_ownership_covers_whole_ring() {
    let ring = ring_of(&IPS);
    let shares = ring.ownership();
    assert_eq!(shares.len(), 4);
    let total: f64 = shares.iter().map(|(_, share)| share).sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn test_consistent_lookup_across_hashers() {
    for ring in [
        RingBuilder::new().with_hasher(Fnv1_32).add_nodes(IPS).build().unwrap(),
        RingBuilder::new().with_hasher(Xxh3Hasher::new()).add_nodes(IPS).build().unwrap(),
    ] {
        for key in keys(200) {
            let first = ring.get(&key).unwrap();
            assert_eq!(ring.get(&key).unwrap(), first);
            assert!(IPS.contains(&first.as_str()));
        }
    }
}

#[test]
fn test_get_n_preference_list() {
    let ring = ring_of(&IPS);
    for key in keys(200) {
        let owners = ring.get_n(&key, 3).unwrap();
        assert_eq!(owners.len(), 3);
        assert_eq!(owners[0], ring.get(&key).unwrap(), "owner comes first");
        let mut sorted = owners.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 3, "owners must be distinct");
    }
    // Capped at the member count
    assert_eq!(ring.get_n("k", 10).unwrap().len(), 4);
}

// ============================================================================
// Membership Change Tests
// ============================================================================

#[test]
fn test_minimal_disruption_on_remove() {
    let r1 = ring_of(&["A", "B", "C"]);
    let r2 = ring_of(&["A", "B", "C"]);
    r2.remove("C");

    for key in keys(5_000) {
        let before = r1.get(&key).unwrap();
        let after = r2.get(&key).unwrap();
        if before != "C" {
            assert_eq!(before, after, "key {key} moved off a surviving node");
        } else {
            assert!(after == "A" || after == "B", "key {key} moved to {after}");
        }
    }
}

#[test]
fn test_minimal_disruption_on_add() {
    let ring = ring_of(&["A", "B", "C"]);
    let before: Vec<String> = keys(5_000).map(|k| ring.get(&k).unwrap()).collect();

    ring.add("D");
    let mut moved = 0;
    for (key, old) in keys(5_000).zip(&before) {
        let new = ring.get(&key).unwrap();
        if new != *old {
            assert_eq!(new, "D", "key {key} moved between existing nodes");
            moved += 1;
        }
    }
    assert!(moved > 0, "the new node should take over some keys");
}

#[test]
fn test_add_remove_add() {
    let ring = ring_of(&IPS);
    let before: Vec<String> = keys(1_000).map(|k| ring.get(&k).unwrap()).collect();

    assert!(ring.remove(IPS[2]));
    ring.add(IPS[2]);

    let after: Vec<String> = keys(1_000).map(|k| ring.get(&k).unwrap()).collect();
    assert_eq!(before, after, "removing and re-adding restores the ring");
}

// ============================================================================
// Edge Cases
// ============================================================================

#[test]
fn test_idempotent_add() {
    let once = ring_of(&["A", "B"]);
    let twice = ring_of(&["A", "B"]);
    twice.add("A");

    assert_eq!(twice.position_count(), once.position_count());
    assert_eq!(twice.members(), once.members());
    assert_eq!(twice.positions(), once.positions());
    for key in keys(1_000) {
        assert_eq!(twice.get(&key), once.get(&key));
    }
}

#[test]
fn test_empty_string_node_is_a_real_member() {
    // A node named "" is distinguishable from "no node"
    let ring = HashRing::new();
    ring.add("");
    assert_eq!(ring.get("key").unwrap(), "");
    ring.remove("");
    assert_eq!(ring.get("key"), Err(Error::EmptyRing));
}

#[test]
fn test_drain_ring() {
    let ring = ring_of(&IPS);
    let mut remaining: Vec<&str> = IPS.to_vec();

    while let Some(node) = remaining.pop() {
        ring.remove(node);
        for key in keys(200) {
            match ring.get(&key) {
                Ok(owner) => assert!(remaining.contains(&owner.as_str())),
                Err(err) => {
                    assert!(remaining.is_empty());
                    assert_eq!(err, Error::EmptyRing);
                }
            }
        }
    }
    assert!(ring.is_empty());
    assert_eq!(ring.position_count(), 0);
}

#[test]
fn test_collision_loser_keeps_position_after_winner_leaves() {
    // Every label lands on the same position
    let ring = HashRing::with_hasher(1, HashFn::new(|_: &[u8]| 7)).unwrap();
    ring.add("A");
    ring.add("B");
    assert_eq!(ring.get("key").unwrap(), "B");
    assert_eq!(ring.position_count(), 1);

    ring.remove("B");
    assert_eq!(ring.members(), vec!["A"]);
    assert_eq!(ring.get("key").unwrap(), "A");
    assert_eq!(ring.position_count(), 1);

    ring.remove("A");
    assert_eq!(ring.get("key"), Err(Error::EmptyRing));
    assert_eq!(ring.position_count(), 0);
}

#[test]
fn test_re_add_after_collision_is_noop() {
    let ring = HashRing::with_hasher(1, HashFn::new(|_: &[u8]| 7)).unwrap();
    ring.add("A");
    ring.add("B");
    let before = ring.get("key");

    ring.add("A");
    assert_eq!(ring.get("key"), before);
    assert_eq!(ring.members(), vec!["A", "B"]);
}

#[test]
fn test_panicking_hasher_leaves_ring_intact() {
    let hasher = HashFn::new(|key: &[u8]| {
        if key.ends_with(b"poison") {
            panic!("hasher refused key");
        }
        Fnv1a32.hash(key)
    });
    let ring = HashRing::with_hasher(20, hasher).unwrap();
    ring.add_all(["A", "B"]);

    let members = ring.members();
    let positions = ring.positions();
    let owners: Vec<String> = keys(500).map(|k| ring.get(&k).unwrap()).collect();

    let result = catch_unwind(AssertUnwindSafe(|| ring.add("poison")));
    assert!(result.is_err(), "the hasher panic should reach the caller");

    assert_eq!(ring.members(), members);
    assert_eq!(ring.positions(), positions);
    assert_eq!(ring.position_count(), 40);
    let after: Vec<String> = keys(500).map(|k| ring.get(&k).unwrap()).collect();
    assert_eq!(after, owners);

    // The lock is still usable afterwards
    ring.add("C");
    assert!(ring.contains("C"));
}

// ============================================================================
// Thread Safety
// ============================================================================

#[test]
fn test_concurrent_readers_and_writer() {
    let ring = Arc::new(ring_of(&["stable-1", "stable-2"]));

    let writer = {
        let ring = Arc::clone(&ring);
        thread::spawn(move || {
            for round in 0..50 {
                let node = format!("churn-{}", round % 5);
                ring.add(&node);
                ring.remove(&node);
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let ring = Arc::clone(&ring);
            thread::spawn(move || {
                for key in keys(2_000) {
                    let owner = ring.get(&key).unwrap();
                    assert!(owner.starts_with("stable-") || owner.starts_with("churn-"));
                    let members = ring.members();
                    assert!(members.len() == 2 || members.len() == 3);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(ring.members(), vec!["stable-1", "stable-2"]);
    assert_eq!(ring.position_count(), 40);
}
