//! Bucket-selection functions and the key-digest collaborator.

/// `(key digest, bucket count) -> bucket index`. Implementations must
/// return a value strictly less than the modulus; the table aborts
/// otherwise.
pub type HashFn = fn(u64, usize) -> usize;

cfg_if::cfg_if! {
    if #[cfg(target_pointer_width = "64")] {
        #[inline]
        fn fold(h: u64) -> usize {
            h as usize
        }
    } else {
        // On 32-bit targets a plain truncating cast would throw away the
        // digest's high bits entirely; xor-fold them back in first.
        #[inline]
        fn fold(h: u64) -> usize {
            (h ^ (h >> 32)) as usize
        }
    }
}

/// `k mod m`.
pub fn div_hash(k: u64, m: usize) -> usize {
    fold(k) % m
}

const PHI: f64 = 1.618034;

/// Knuth's multiplicative hash: `frac(phi * k) * m`.
pub fn mul_hash(k: u64, m: usize) -> usize {
    let scaled = PHI * (fold(k) as f64);
    ((scaled - scaled.floor()) * m as f64) as usize
}

/// Digests a key down to a `u64` for bucket selection. Blanket-implemented
/// over any `Hash` type via a fast non-cryptographic mix, standing in for
/// the fixed-width CRC digest of the reference design.
pub trait KeyHash {
    fn key_hash(&self) -> u64;
}

impl<T: std::hash::Hash + ?Sized> KeyHash for T {
    fn key_hash(&self) -> u64 {
        fxhash::hash64(self)
    }
}
