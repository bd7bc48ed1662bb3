//! Consistent hash ring implementation.
//!
//! The ring manages virtual node positions and provides the nearest-successor
//! lookup that maps keys to member nodes.

#[allow(clippy::module_inception)]
pub mod ring;
mod state;

pub use ring::{HashRing, RingBuilder};
