//! 32-bit FNV hashers.
//!
//! FNV is fast and order-sensitive, which is all the ring needs. It is not
//! collision resistant; use [`super::SipHasher`] with a secret key when keys
//! come from untrusted clients.

use crate::hash::traits::KeyHasher;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// FNV-1a, 32-bit. The ring's default hasher.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fnv1a32;

impl KeyHasher for Fnv1a32 {
    #[inline]
    fn hash(&self, key: &[u8]) -> u32 {
        key.iter().fold(FNV_OFFSET_BASIS, |h, &b| {
            (h ^ u32::from(b)).wrapping_mul(FNV_PRIME)
        })
    }

    fn name(&self) -> &'static str {
        "Fnv1a32"
    }
}

/// FNV-1, 32-bit: multiply before xor.
///
/// Keys that differ only in their last byte land close together under FNV-1,
/// so it disperses short sequential keys worse than [`Fnv1a32`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Fnv1_32;

impl KeyHasher for Fnv1_32 {
    #[inline]
    fn hash(&self, key: &[u8]) -> u32 {
        key.iter().fold(FNV_OFFSET_BASIS, |h, &b| {
            h.wrapping_mul(FNV_PRIME) ^ u32::from(b)
        })
    }

    fn name(&self) -> &'static str {
        "Fnv1_32"
    }
}
