//! Bottom-up construction of the tree arena from ordered payloads.
//!
//! Two different odd-count policies apply:
//! - An odd leaf layer gets a new duplicate leaf cloned from the last
//!   payload, so the leaf layer is always even.
//! - An odd level above the leaves folds its last node with itself: the same
//!   index is both left and right of its parent, and no sibling is created.

use tracing::trace;

use crate::{
    Error, HashFunction, Payload, Result,
    hash::combine_hashes,
    node::{Node, NodeIndex},
};

/// A freshly built arena, ready to be swapped into a tree.
#[derive(Debug)]
pub(crate) struct BuiltTree<P> {
    pub(crate) nodes: Vec<Node<P>>,
    pub(crate) leaf_count: usize,
    pub(crate) root: NodeIndex,
    pub(crate) depth: usize,
}

impl<P> BuiltTree<P> {
    pub(crate) fn root_hash(&self) -> &[u8] {
        &self.nodes[self.root].hash
    }
}

/// Build the full arena for `payloads`.
///
/// Fails with [`Error::EmptyInput`] for no payloads and stops at the first
/// digest or hash error. Nothing is returned on failure.
pub(crate) fn build<P: Payload, H: HashFunction>(
    payloads: Vec<P>,
    hasher: &H,
) -> Result<BuiltTree<P>> {
    if payloads.is_empty() {
        return Err(Error::EmptyInput);
    }

    // A complete binary fold over n leaves creates n - 1 internal nodes, plus
    // at most one extra per odd internal level.
    let mut nodes: Vec<Node<P>> = Vec::with_capacity(2 * payloads.len() + 2);

    for payload in payloads {
        let hash = payload.digest()?;
        nodes.push(Node::leaf(hash, payload, false));
    }

    if nodes.len() % 2 == 1 {
        let duplicate = nodes.last().and_then(|last| {
            last.payload()
                .map(|payload| Node::leaf(last.hash.clone(), payload.clone(), true))
        });
        nodes.extend(duplicate);
    }

    let leaf_count = nodes.len();
    let mut level: Vec<NodeIndex> = (0..leaf_count).collect();
    let mut depth = 0;

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            let left = pair[0];
            let right = pair.get(1).copied().unwrap_or(left);

            let hash = combine_hashes(hasher, &nodes[left].hash, &nodes[right].hash)?;
            let parent = nodes.len();
            nodes.push(Node::internal(hash, left, right));
            nodes[left].parent = Some(parent);
            nodes[right].parent = Some(parent);
            next.push(parent);
        }

        depth += 1;
        trace!(
            depth,
            width = next.len(),
            self_paired = level.len() % 2 == 1,
            "folded tree level"
        );
        level = next;
    }

    Ok(BuiltTree {
        nodes,
        leaf_count,
        root: level[0],
        depth,
    })
}
