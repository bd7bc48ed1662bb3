//! Core library for consistent hashing.
//!
//! This crate provides the consistent hash ring and its building blocks:
//! - Pluggable key hashers (FNV-1a by default)
//! - Virtual node placement
//! - The thread-safe ring with add/remove/lookup
//! - Ring configuration

pub mod config;
pub mod error;
pub mod hash;
pub mod ring;
pub mod vnode;

pub use config::RingConfig;
pub use error::{Error, Result};
pub use hash::{HashAlgorithm, KeyHasher};
pub use ring::{HashRing, RingBuilder};
pub use vnode::VirtualNode;
