//! Replication error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReplicationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplicationError {
    #[error("replication factor must be at least 1")]
    ZeroReplicationFactor,
    #[error(transparent)]
    Ring(#[from] corelib::Error),
}
