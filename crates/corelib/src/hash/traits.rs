//! Core key hasher trait definitions.

use std::fmt;

/// A key hasher converts bytes into a 32-bit position on the ring.
///
/// Hashers are stateless and thread-safe: the ring calls them from many
/// readers at once without synchronization. The same input must always
/// produce the same position for the lifetime of the ring, otherwise lookups
/// and removals stop agreeing with earlier insertions.
pub trait KeyHasher: Send + Sync + 'static {
    /// Hashes `key` to a ring position.
    fn hash(&self, key: &[u8]) -> u32;

    /// Returns the name of this hasher (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Adapter turning a plain function or closure into a [`KeyHasher`].
///
/// ```rust
/// use corelib::hash::{HashFn, KeyHasher};
///
/// let hasher = HashFn::new(|key: &[u8]| key.len() as u32);
/// assert_eq!(hasher.hash(b"abc"), 3);
/// ```
#[derive(Clone)]
pub struct HashFn<F> {
    f: F,
    name: &'static str,
}

impl<F> HashFn<F>
where
    F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f, name: "HashFn" }
    }

    /// Same as [`HashFn::new`] but reports `name` from [`KeyHasher::name`].
    pub fn named(name: &'static str, f: F) -> Self {
        Self { f, name }
    }
}

impl<F> KeyHasher for HashFn<F>
where
    F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
{
    #[inline]
    fn hash(&self, key: &[u8]) -> u32 {
        (self.f)(key)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl<F> fmt::Debug for HashFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashFn").field("name", &self.name).finish()
    }
}
