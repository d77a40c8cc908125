use tracing::debug;

use crate::{
    Error, HashFunction, MerklePath, Payload, Result, Sha256Hash,
    builder::{self, BuiltTree},
    hash::combine_hashes,
    node::{Node, NodeIndex, NodeKind},
    proof::Direction,
};

/// A binary Merkle tree committing to an ordered list of payloads.
///
/// Leaves keep the order of the input payloads. An odd number of payloads is
/// evened out with a duplicate of the last one, so a tree over `n` payloads
/// has `n` or `n + 1` leaves.
///
/// The root hash computed at (re)build time is cached. Whole-tree
/// verification re-derives the root from the leaf payloads and compares it
/// with this cached value and with every stored node hash on the way up.
///
/// The only mutation is a full rebuild. Rebuilds take `&mut self`, so shared
/// readers are excluded by the borrow checker; wrap the tree in a lock to
/// share it across threads.
#[derive(Debug, Clone)]
pub struct MerkleTree<P, H = Sha256Hash> {
    nodes: Vec<Node<P>>,
    leaf_count: usize,
    root: NodeIndex,
    root_hash: Vec<u8>,
    depth: usize,
    hasher: H,
}

impl<P: Payload, H: HashFunction> MerkleTree<P, H> {
    /// Build a tree over `payloads`, folded with `hasher`.
    ///
    /// Fails with [`Error::EmptyInput`](crate::Error::EmptyInput) if there
    /// are no payloads.
    pub fn new(payloads: Vec<P>, hasher: H) -> Result<Self> {
        let built = builder::build(payloads, &hasher)?;
        let root_hash = built.root_hash().to_vec();
        let tree = MerkleTree {
            nodes: built.nodes,
            leaf_count: built.leaf_count,
            root: built.root,
            root_hash,
            depth: built.depth,
            hasher,
        };
        debug!(
            payloads = tree.payload_count(),
            leaves = tree.leaf_count,
            depth = tree.depth,
            hasher = tree.hasher.name(),
            root = %hex::encode(&tree.root_hash),
            "built merkle tree"
        );
        Ok(tree)
    }

    /// Rebuild the tree from its own payloads.
    ///
    /// The duplicate leaf is not fed back in; the builder adds it again if
    /// the payload count is odd.
    pub fn rebuild(&mut self) -> Result<()> {
        let payloads = self
            .leaves()
            .iter()
            .filter(|leaf| !leaf.is_duplicate())
            .filter_map(|leaf| leaf.payload().cloned())
            .collect();
        self.rebuild_with(payloads)
    }

    /// Replace all payloads and rebuild the tree in place.
    ///
    /// The new structure is built completely before it replaces the current
    /// one, so on error the tree is left unchanged.
    pub fn rebuild_with(&mut self, payloads: Vec<P>) -> Result<()> {
        let built = builder::build(payloads, &self.hasher)?;
        self.install(built);
        debug!(
            payloads = self.payload_count(),
            leaves = self.leaf_count,
            depth = self.depth,
            root = %hex::encode(&self.root_hash),
            "rebuilt merkle tree"
        );
        Ok(())
    }

    fn install(&mut self, built: BuiltTree<P>) {
        self.root_hash = built.root_hash().to_vec();
        self.nodes = built.nodes;
        self.leaf_count = built.leaf_count;
        self.root = built.root;
        self.depth = built.depth;
    }

    /// Re-derive the root from the leaf payloads and compare it with the
    /// cached root hash.
    ///
    /// Stored hashes are never used as inputs: leaves contribute
    /// `payload.digest()` and every internal node is recombined from its
    /// freshly derived children. Each derived hash is then checked against
    /// the hash stored on its node. Any payload or stored hash changed since
    /// the last build makes this return `false`, as does a changed cached
    /// root.
    pub fn verify(&self) -> Result<bool> {
        let Some(derived) = self.derive_hash(self.root)? else {
            return Ok(false);
        };
        let valid = derived == self.root_hash;
        if !valid {
            debug!(
                expected = %hex::encode(&self.root_hash),
                derived = %hex::encode(&derived),
                "merkle root mismatch"
            );
        }
        Ok(valid)
    }

    /// Derived hash of the subtree at `index`, or `None` as soon as a node's
    /// stored hash disagrees with it.
    fn derive_hash(&self, index: NodeIndex) -> Result<Option<Vec<u8>>> {
        let node = &self.nodes[index];
        let derived = match &node.kind {
            NodeKind::Leaf { payload, .. } => payload.digest()?,
            NodeKind::Internal { left, right } => {
                let Some(left_hash) = self.derive_hash(*left)? else {
                    return Ok(None);
                };
                let right_hash = if left == right {
                    left_hash.clone()
                } else {
                    let Some(right_hash) = self.derive_hash(*right)? else {
                        return Ok(None);
                    };
                    right_hash
                };
                combine_hashes(&self.hasher, &left_hash, &right_hash)?
            }
        };
        if derived != node.hash {
            debug!(node = index, "stored hash does not match derived hash");
            return Ok(None);
        }
        Ok(Some(derived))
    }

    /// Position of the first leaf whose payload equals `candidate`.
    pub fn leaf_index(&self, candidate: &P) -> Result<Option<usize>> {
        for (index, leaf) in self.leaves().iter().enumerate() {
            if let Some(payload) = leaf.payload() {
                if payload.equals(candidate)? {
                    return Ok(Some(index));
                }
            }
        }
        Ok(None)
    }

    /// Check that `candidate` is a leaf and that every ancestor's stored hash
    /// matches `hash(left || right)` of its children's stored hashes.
    ///
    /// This is weaker than [`verify`](Self::verify): it trusts stored child
    /// hashes at each hop and does not compare the root against the cached
    /// root hash, so a consistently re-hashed chain passes. Nor does it
    /// re-digest the payload. Returns `false` when the payload is absent.
    pub fn verify_payload(&self, candidate: &P) -> Result<bool> {
        let Some(leaf) = self.leaf_index(candidate)? else {
            return Ok(false);
        };

        let mut current = self.nodes[leaf].parent;
        while let Some(index) = current {
            let node = &self.nodes[index];
            let Some((left, right)) = node.children() else {
                debug!(node = index, leaf, "parent link points at a leaf");
                return Ok(false);
            };
            let expected = combine_hashes(
                &self.hasher,
                &self.nodes[left].hash,
                &self.nodes[right].hash,
            )?;
            if expected != node.hash {
                debug!(node = index, leaf, "stored hash does not match children");
                return Ok(false);
            }
            current = node.parent;
        }
        Ok(true)
    }

    /// Sibling hashes and directions from the leaf holding `candidate` up to
    /// the root.
    ///
    /// Returns an empty path if no leaf holds `candidate`, and
    /// [`Error::InvalidProof`] if a parent link on the way up points at a
    /// leaf.
    pub fn merkle_path(&self, candidate: &P) -> Result<MerklePath> {
        let Some(leaf) = self.leaf_index(candidate)? else {
            return Ok(MerklePath::default());
        };

        let mut siblings = Vec::with_capacity(self.depth);
        let mut directions = Vec::with_capacity(self.depth);
        let mut current = leaf;
        while let Some(parent) = self.nodes[current].parent {
            let Some((left, right)) = self.nodes[parent].children() else {
                return Err(Error::InvalidProof(format!(
                    "node {} is recorded as the parent of {} but is a leaf",
                    parent, current
                )));
            };
            if self.nodes[current].hash == self.nodes[left].hash {
                siblings.push(self.nodes[right].hash.clone());
                directions.push(Direction::Right);
            } else {
                siblings.push(self.nodes[left].hash.clone());
                directions.push(Direction::Left);
            }
            current = parent;
        }
        MerklePath::new(siblings, directions)
    }
}

impl<P, H> MerkleTree<P, H> {
    /// The root node.
    pub fn root(&self) -> &Node<P> {
        &self.nodes[self.root]
    }

    /// Root hash cached at the last (re)build.
    pub fn root_hash(&self) -> &[u8] {
        &self.root_hash
    }

    /// Leaves in payload order, duplicate last if present.
    pub fn leaves(&self) -> &[Node<P>] {
        &self.nodes[..self.leaf_count]
    }

    /// Node at `index` in the arena.
    pub fn node(&self, index: NodeIndex) -> Option<&Node<P>> {
        self.nodes.get(index)
    }

    /// Number of leaves, including the duplicate.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of payloads the tree was built from.
    pub fn payload_count(&self) -> usize {
        self.leaves().iter().filter(|leaf| !leaf.is_duplicate()).count()
    }

    /// Number of edges from a leaf to the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The hash function folding internal nodes.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    #[cfg(test)]
    pub(crate) fn nodes_mut(&mut self) -> &mut [Node<P>] {
        &mut self.nodes
    }

    #[cfg(test)]
    pub(crate) fn root_hash_mut(&mut self) -> &mut Vec<u8> {
        &mut self.root_hash
    }
}
