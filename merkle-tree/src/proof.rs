//! Merkle paths: the sibling hashes and directions from a leaf to the root.
//!
//! A path is replayed by starting from the payload digest and, for each step,
//! computing `hash(running || sibling)` when the sibling is on the right or
//! `hash(sibling || running)` when it is on the left. The path is valid when
//! the final value equals the committed root hash.

use bincode::{Decode, Encode};

use crate::{Error, HashFunction, Payload, Result, hash::combine_hashes};

/// Which side of the parent the sibling sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
#[repr(u8)]
pub enum Direction {
    /// Sibling is the left child; the running hash goes on the right.
    Left = 0,
    /// Sibling is the right child; the running hash goes on the left.
    Right = 1,
}

impl Direction {
    /// Numeric form: `Left = 0`, `Right = 1`.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Direction {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Direction::Left),
            1 => Ok(Direction::Right),
            other => Err(Error::InvalidProof(format!(
                "unknown path direction {}",
                other
            ))),
        }
    }
}

/// Inclusion path for one payload, ordered from the leaf up to the root.
///
/// An empty path is what [`MerkleTree::merkle_path`](crate::MerkleTree::merkle_path)
/// returns for a payload that is not in the tree. It never verifies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct MerklePath {
    siblings: Vec<Vec<u8>>,
    directions: Vec<Direction>,
}

impl MerklePath {
    /// Create a path from parallel sibling and direction lists.
    ///
    /// Index 0 is the step nearest the leaf.
    pub fn new(siblings: Vec<Vec<u8>>, directions: Vec<Direction>) -> Result<Self> {
        if siblings.len() != directions.len() {
            return Err(Error::InvalidProof(format!(
                "{} sibling hashes but {} directions",
                siblings.len(),
                directions.len()
            )));
        }
        Ok(MerklePath {
            siblings,
            directions,
        })
    }

    /// Sibling hashes, leaf-most first.
    pub fn siblings(&self) -> &[Vec<u8>] {
        &self.siblings
    }

    /// Sibling sides, leaf-most first.
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Number of steps from the leaf to the root.
    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    /// `true` for the "not found" path.
    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// `(sibling, direction)` pairs, leaf-most first.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], Direction)> {
        self.siblings
            .iter()
            .map(Vec::as_slice)
            .zip(self.directions.iter().copied())
    }

    /// Replay the path starting from `leaf_hash` and return the root it
    /// leads to.
    pub fn calculate_root<H: HashFunction>(&self, leaf_hash: &[u8], hasher: &H) -> Result<Vec<u8>> {
        let mut running = leaf_hash.to_vec();
        for (sibling, direction) in self.iter() {
            running = match direction {
                Direction::Right => combine_hashes(hasher, &running, sibling)?,
                Direction::Left => combine_hashes(hasher, sibling, &running)?,
            };
        }
        Ok(running)
    }

    /// Check that `candidate` is committed to by `expected_root`.
    ///
    /// Digest failures of the candidate are errors; a path that leads
    /// elsewhere is `Ok(false)`.
    pub fn verify<P: Payload, H: HashFunction>(
        &self,
        candidate: &P,
        expected_root: &[u8],
        hasher: &H,
    ) -> Result<bool> {
        if self.is_empty() {
            return Ok(false);
        }
        let leaf_hash = candidate.digest()?;
        Ok(self.calculate_root(&leaf_hash, hasher)? == expected_root)
    }

    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| Error::InvalidProof(format!("encode error: {}", e)))
    }

    /// Decode from bytes using bincode.
    ///
    /// Rejects paths whose sibling and direction counts differ.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 16 * 1024 * 1024 }>();
        let (path, _): (Self, _) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| Error::InvalidProof(format!("decode error: {}", e)))?;
        MerklePath::new(path.siblings, path.directions)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::{RawPayload, Sha256Hash};

    #[test]
    fn direction_numeric_form() {
        assert_eq!(Direction::Left.as_u8(), 0);
        assert_eq!(Direction::Right.as_u8(), 1);
        assert_eq!(Direction::try_from(1).expect("valid"), Direction::Right);
        assert_matches!(Direction::try_from(2), Err(Error::InvalidProof(_)));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let result = MerklePath::new(vec![vec![0u8; 32]], vec![]);
        assert_matches!(result, Err(Error::InvalidProof(_)));
    }

    #[test]
    fn replay_respects_direction() {
        let leaf = RawPayload::from("leaf");
        let leaf_hash = leaf.digest().expect("digest");
        let sibling = RawPayload::from("sibling").digest().expect("digest");

        let right = MerklePath::new(vec![sibling.clone()], vec![Direction::Right])
            .expect("valid path");
        let left =
            MerklePath::new(vec![sibling.clone()], vec![Direction::Left]).expect("valid path");

        let leaf_left_of_sibling =
            combine_hashes(&Sha256Hash, &leaf_hash, &sibling).expect("combine");
        let leaf_right_of_sibling =
            combine_hashes(&Sha256Hash, &sibling, &leaf_hash).expect("combine");

        assert_eq!(
            right
                .calculate_root(&leaf_hash, &Sha256Hash)
                .expect("replay"),
            leaf_left_of_sibling
        );
        assert_eq!(
            left.calculate_root(&leaf_hash, &Sha256Hash)
                .expect("replay"),
            leaf_right_of_sibling
        );
        assert!(
            right
                .verify(&leaf, &leaf_left_of_sibling, &Sha256Hash)
                .expect("verify")
        );
        assert!(
            !left
                .verify(&leaf, &leaf_left_of_sibling, &Sha256Hash)
                .expect("verify")
        );
    }

    #[test]
    fn empty_path_never_verifies() {
        let leaf = RawPayload::from("leaf");
        let root = leaf.digest().expect("digest");
        assert!(
            !MerklePath::default()
                .verify(&leaf, &root, &Sha256Hash)
                .expect("verify")
        );
    }

    #[test]
    fn encoding_preserves_path() {
        let path = MerklePath::new(
            vec![vec![1u8; 32], vec![2u8; 32]],
            vec![Direction::Left, Direction::Right],
        )
        .expect("valid path");
        let bytes = path.encode_to_vec().expect("encode");
        assert_eq!(MerklePath::decode_from_slice(&bytes).expect("decode"), path);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert_matches!(
            MerklePath::decode_from_slice(&[0xff, 0xff, 0xff]),
            Err(Error::InvalidProof(_))
        );
    }

    #[test]
    fn decode_rejects_unbalanced_path() {
        #[derive(Encode)]
        struct Unbalanced {
            siblings: Vec<Vec<u8>>,
            directions: Vec<Direction>,
        }

        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        let bytes = bincode::encode_to_vec(
            Unbalanced {
                siblings: vec![vec![7u8; 32]],
                directions: vec![Direction::Left, Direction::Left],
            },
            config,
        )
        .expect("encode");
        assert_matches!(
            MerklePath::decode_from_slice(&bytes),
            Err(Error::InvalidProof(_))
        );
    }
}
