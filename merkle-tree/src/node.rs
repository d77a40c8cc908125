//! Arena-allocated tree vertices.
//!
//! All nodes of a tree live in one `Vec`. Children and the parent are
//! referenced by [`NodeIndex`], so the parent edge is a plain index and never
//! a second owner. Leaves occupy the first slots of the arena, in payload
//! order, followed by each folded level bottom-up; the root is last.

/// Position of a node in its tree's arena.
pub type NodeIndex = usize;

/// What a node holds besides its hash.
#[derive(Debug, Clone)]
pub enum NodeKind<P> {
    /// A leaf wrapping one payload.
    Leaf {
        /// The committed payload.
        payload: P,
        /// Synthetic copy of the last real leaf, added to even out the layer.
        duplicate: bool,
    },
    /// An internal node folding two children.
    ///
    /// `left == right` when an odd level folded its last node with itself.
    Internal {
        /// Left operand of the fold.
        left: NodeIndex,
        /// Right operand of the fold.
        right: NodeIndex,
    },
}

/// A tree vertex.
#[derive(Debug, Clone)]
pub struct Node<P> {
    pub(crate) hash: Vec<u8>,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) kind: NodeKind<P>,
}

impl<P> Node<P> {
    pub(crate) fn leaf(hash: Vec<u8>, payload: P, duplicate: bool) -> Self {
        Node {
            hash,
            parent: None,
            kind: NodeKind::Leaf { payload, duplicate },
        }
    }

    pub(crate) fn internal(hash: Vec<u8>, left: NodeIndex, right: NodeIndex) -> Self {
        Node {
            hash,
            parent: None,
            kind: NodeKind::Internal { left, right },
        }
    }

    /// The stored hash: the payload digest for leaves, `hash(left || right)`
    /// for internal nodes, as computed at build time.
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    /// Leaf or internal contents.
    pub fn kind(&self) -> &NodeKind<P> {
        &self.kind
    }

    /// The node this one was folded into; `None` for the root.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Whether this node wraps a payload.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Whether this is the synthetic leaf evening out an odd leaf layer.
    pub fn is_duplicate(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { duplicate: true, .. })
    }

    /// The payload of a leaf; `None` for internal nodes.
    pub fn payload(&self) -> Option<&P> {
        match &self.kind {
            NodeKind::Leaf { payload, .. } => Some(payload),
            NodeKind::Internal { .. } => None,
        }
    }

    /// `(left, right)` child indexes of an internal node.
    pub fn children(&self) -> Option<(NodeIndex, NodeIndex)> {
        match self.kind {
            NodeKind::Internal { left, right } => Some((left, right)),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// Left child index.
    pub fn left(&self) -> Option<NodeIndex> {
        self.children().map(|(left, _)| left)
    }

    /// Right child index.
    pub fn right(&self) -> Option<NodeIndex> {
        self.children().map(|(_, right)| right)
    }
}
