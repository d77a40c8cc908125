//! Hash primitives used to fold tree levels.
//!
//! The tree never hashes anything itself: leaf hashes come from
//! [`Payload::digest`](crate::Payload::digest) and every internal node is
//! `hash(left || right)` through the [`HashFunction`] injected at
//! construction time.

use sha2::{Digest, Sha256};

use crate::Result;

/// A one-way function from bytes to a digest.
///
/// Implementations must be deterministic. The output length is defined by
/// the algorithm and must not vary between calls.
pub trait HashFunction: Clone {
    /// Hash `bytes` and return the digest.
    fn calculate(&self, bytes: &[u8]) -> Result<Vec<u8>>;

    /// Short algorithm name, used in logs.
    fn name(&self) -> &'static str;
}

/// SHA-256 from the `sha2` crate.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Sha256Hash;

impl HashFunction for Sha256Hash {
    fn calculate(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        Ok(Sha256::digest(bytes).to_vec())
    }

    fn name(&self) -> &'static str {
        "sha256"
    }
}

/// BLAKE3 with 32 bytes of output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Blake3Hash;

impl HashFunction for Blake3Hash {
    fn calculate(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        Ok(blake3::hash(bytes).as_bytes().to_vec())
    }

    fn name(&self) -> &'static str {
        "blake3"
    }
}

/// Compute the parent hash of two siblings: `hash(left || right)`.
///
/// Left always comes first. Swapping the operands yields a different tree.
pub fn combine_hashes<H: HashFunction>(hasher: &H, left: &[u8], right: &[u8]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(left.len() + right.len());
    buf.extend_from_slice(left);
    buf.extend_from_slice(right);
    hasher.calculate(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        let digest = Sha256Hash.calculate(b"a").expect("sha256 is infallible");
        assert_eq!(
            hex::encode(digest),
            "ca978112ca1bbdcafac231b39a23dc4da786eff8147c4e72b9807785afee48bb"
        );
    }

    #[test]
    fn blake3_matches_crate_output() {
        let digest = Blake3Hash.calculate(b"a").expect("blake3 is infallible");
        assert_eq!(digest.as_slice(), blake3::hash(b"a").as_bytes());
        assert_eq!(digest.len(), 32);
    }

    #[test]
    fn combine_is_order_sensitive() {
        let left = Sha256Hash.calculate(b"left").expect("hash left");
        let right = Sha256Hash.calculate(b"right").expect("hash right");

        let lr = combine_hashes(&Sha256Hash, &left, &right).expect("combine l||r");
        let rl = combine_hashes(&Sha256Hash, &right, &left).expect("combine r||l");
        assert_ne!(lr, rl);

        let concatenated = [left.as_slice(), right.as_slice()].concat();
        assert_eq!(
            lr,
            Sha256Hash.calculate(&concatenated).expect("hash concat")
        );
    }
}
