//! Replication strategies for consistent hashing.
//!
//! A strategy turns one key into a preference list: the owner from the ring
//! followed by the next distinct nodes clockwise. Acting on the list (copying
//! data, routing writes) is up to the caller.

pub mod error;
pub mod strategy;

pub use error::{ReplicationError, Result};
pub use strategy::{ReplicationStrategy, SimpleStrategy};
