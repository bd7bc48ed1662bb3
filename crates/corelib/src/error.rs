//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A ring must place at least one virtual node per member.
    #[error("invalid replica count {0}: must be at least 1")]
    InvalidReplicas(usize),
    /// Lookup against a ring with no members.
    #[error("no nodes available: the ring is empty")]
    EmptyRing,
    /// Configuration value could not be understood.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
