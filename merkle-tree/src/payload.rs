//! Payloads stored in tree leaves.

use crate::{HashFunction, Result, Sha256Hash};

/// Data that can be committed to by a [`MerkleTree`](crate::MerkleTree).
///
/// Implementors define their own digest and equality explicitly. `Clone`
/// is needed because an odd leaf layer is evened out with a copy of the last
/// payload.
pub trait Payload: Clone {
    /// Deterministic digest of this payload. This becomes the leaf hash.
    ///
    /// Serialization or hashing failures are reported as
    /// [`Error::Hash`](crate::Error::Hash).
    fn digest(&self) -> Result<Vec<u8>>;

    /// Whether `other` is the same payload.
    ///
    /// Only fails when the comparison itself cannot be carried out, with
    /// [`Error::PayloadComparison`](crate::Error::PayloadComparison).
    fn equals(&self, other: &Self) -> Result<bool>;
}

/// An opaque byte string. Its digest is the SHA-256 of the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawPayload(pub Vec<u8>);

impl RawPayload {
    /// Wrap `bytes` as a payload.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        RawPayload(bytes.into())
    }

    /// The wrapped bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for RawPayload {
    fn from(bytes: &[u8]) -> Self {
        RawPayload(bytes.to_vec())
    }
}

impl From<&str> for RawPayload {
    fn from(s: &str) -> Self {
        RawPayload(s.as_bytes().to_vec())
    }
}

impl Payload for RawPayload {
    fn digest(&self) -> Result<Vec<u8>> {
        Sha256Hash.calculate(&self.0)
    }

    fn equals(&self, other: &Self) -> Result<bool> {
        Ok(self.0 == other.0)
    }
}

#[cfg(feature = "serde")]
pub use payment::PaymentTransactionPayload;

#[cfg(feature = "serde")]
mod payment {
    use serde::{Deserialize, Serialize, Serializer, ser::Error as _};
    use serde_json::value::RawValue;

    use crate::{Error, HashFunction, Payload, Result, Sha256Hash};

    /// A payment transaction between two addresses.
    ///
    /// The digest is SHA-256 over the compact JSON encoding, with fields in
    /// declaration order:
    /// `{"sender_address":"..","receiver_address":"..","amount":..}`.
    ///
    /// The amount is written in the shortest form that round-trips, without a
    /// fraction for whole values and in exponent form below `1e-6` or from
    /// `1e21` up (`1`, `0.1234`, `1e+21`, `1.5e-7`). Non-finite amounts cannot
    /// be encoded, so their digest fails.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct PaymentTransactionPayload {
        /// Address funds are sent from.
        pub sender_address: String,
        /// Address funds are sent to.
        pub receiver_address: String,
        /// Transferred amount.
        #[serde(serialize_with = "serialize_amount")]
        pub amount: f64,
    }

    /// JSON number text for `value`, `None` if it is not finite.
    pub(super) fn amount_text(value: f64) -> Option<String> {
        if !value.is_finite() {
            return None;
        }
        let abs = value.abs();
        if abs != 0.0 && !(1e-6..1e21).contains(&abs) {
            let text = format!("{:e}", value);
            if let Some((mantissa, exponent)) = text.split_once('e')
                && !exponent.starts_with('-')
            {
                return Some(format!("{}e+{}", mantissa, exponent));
            }
            return Some(text);
        }
        Some(format!("{}", value))
    }

    fn serialize_amount<S: Serializer>(
        value: &f64,
        serializer: S,
    ) -> core::result::Result<S::Ok, S::Error> {
        let text = amount_text(*value)
            .ok_or_else(|| S::Error::custom(format!("unsupported amount {}", value)))?;
        RawValue::from_string(text)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }

    impl PaymentTransactionPayload {
        /// Create a payment record.
        pub fn new(
            sender_address: impl Into<String>,
            receiver_address: impl Into<String>,
            amount: f64,
        ) -> Self {
            PaymentTransactionPayload {
                sender_address: sender_address.into(),
                receiver_address: receiver_address.into(),
                amount,
            }
        }
    }

    impl Payload for PaymentTransactionPayload {
        fn digest(&self) -> Result<Vec<u8>> {
            let json = serde_json::to_vec(self)
                .map_err(|e| Error::Hash(format!("failed to encode payment as json: {}", e)))?;
            Sha256Hash.calculate(&json)
        }

        fn equals(&self, other: &Self) -> Result<bool> {
            if self.amount.is_nan() || other.amount.is_nan() {
                return Err(Error::PayloadComparison(format!(
                    "cannot compare payment amounts {} and {}",
                    self.amount, other.amount
                )));
            }
            Ok(self.sender_address == other.sender_address
                && self.receiver_address == other.receiver_address
                && self.amount == other.amount)
        }
    }
}
