//! Error types for the Schnorr signature scheme.

use thiserror::Error;

/// Errors that can occur during key handling, signing and verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchnorrError {
    /// A point that must be a non-neutral member of the prime-order subgroup
    /// is not.
    ///
    /// This covers verifying keys or commitment points that are off the
    /// curve, carry a small-order component, or are the identity.
    #[error("point is not a valid prime-subgroup element")]
    InvalidPoint,

    /// An explicitly supplied nonce is zero after reduction by the subgroup order.
    #[error("nonce reduces to zero modulo the subgroup order")]
    ZeroNonce,

    /// A secret scalar of zero was supplied.
    #[error("secret scalar must be non-zero")]
    ZeroSecret,

    /// The randomness source failed.
    #[error("entropy source failed: {0}")]
    Entropy(String),
}
