//! Binary Merkle tree over an ordered list of payloads.
//!
//! Leaves hold the payloads in input order and hash to the payload's own
//! digest. Internal nodes hash to `H(left || right)` with the injected hash
//! function. Odd counts are handled in two distinct ways:
//!
//! - an odd leaf layer is evened out with a duplicate of the last leaf;
//! - an odd level above the leaves folds its last node with itself.
//!
//! # Core types
//!
//! - [`MerkleTree`]: build, rebuild, verify, membership checks and paths.
//! - [`MerklePath`]: sibling hashes and [`Direction`]s from a leaf to the
//!   root, replayable without the tree.
//! - [`Node`]: arena vertex exposed for inspection.
//!
//! # Collaborators
//!
//! - [`HashFunction`]: the hash primitive; [`Sha256Hash`] and
//!   [`Blake3Hash`] are bundled.
//! - [`Payload`]: digest and equality of committed data; [`RawPayload`] and
//!   (feature `serde`) [`PaymentTransactionPayload`] are bundled.

#![warn(missing_docs)]

mod builder;
mod error;
pub(crate) mod hash;
mod node;
mod payload;
pub(crate) mod proof;
mod tree;


pub use error::{Error, Result};
pub use hash::{Blake3Hash, HashFunction, Sha256Hash, combine_hashes};
pub use node::{Node, NodeIndex, NodeKind};
#[cfg(feature = "serde")]
pub use payload::PaymentTransactionPayload;
pub use payload::{Payload, RawPayload};
pub use proof::{Direction, MerklePath};
pub use tree::MerkleTree;
