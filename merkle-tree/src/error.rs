use thiserror::Error;

/// Alias for `core::result::Result<T, Error>`.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors from Merkle tree operations.
///
/// A payload that is not in the tree, or a tree that fails verification, is
/// not an error: those are reported through the `Ok` value of the operation.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// Construction was attempted with zero payloads.
    #[error("cannot construct tree with no payload")]
    EmptyInput,
    /// Computing a payload digest or an internal node hash failed.
    #[error("hash error: {0}")]
    Hash(String),
    /// A payload equality check failed for reasons internal to the payload.
    #[error("payload comparison error: {0}")]
    PayloadComparison(String),
    /// A Merkle path is malformed and cannot be replayed or decoded.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
}
