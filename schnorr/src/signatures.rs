//! Signature types and challenge hashing for the Schnorr signature scheme.

use curve::{
    Affine, BaseField, FieldEncoding, ScalarField, double_scalar_mul_basepoint, identity,
    is_identity, is_in_prime_subgroup, mimc_hash, scalar_from_base,
};
use serde::{Deserialize, Serialize};

use crate::constants::{CHALLENGE_INPUTS, FIELD_SIZE, SIG_SIZE};

/// A Schnorr signature consisting of a curve point and a scalar.
///
/// The signature is a pair `(R, s)` where:
/// - `R` is a point of the prime-order subgroup (the commitment)
/// - `s` is a scalar modulo the subgroup order (the response)
///
/// # Structure
///
/// The signature satisfies the verification equation: `G * s == R + pk * e`
/// where `e = H(R.x, R.y, pk.x, pk.y, msg)` is the Fiat-Shamir challenge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// The commitment point R = G * k, where k is the signing nonce
    #[serde(with = "curve::serde_ark")]
    pub r: Affine,
    /// The response scalar s = k + e * sk, where sk is the signing key
    #[serde(with = "curve::serde_ark")]
    pub s: ScalarField,
}

impl Signature {
    /// Placeholder carried by slots that do not sign: `R = (0, 1)`, `s = 1`.
    ///
    /// `1 · G = O + e · A` would need `e · A = G`, so it verifies against no
    /// key. It only exists so every slot of a fixed-size batch holds
    /// well-formed values.
    pub fn dummy() -> Self {
        Signature {
            r: identity(),
            s: ScalarField::from(1u64),
        }
    }

    /// Big-endian `R.x || R.y || s`.
    pub fn to_bytes(&self) -> [u8; SIG_SIZE] {
        let mut out = [0u8; SIG_SIZE];
        out[..FIELD_SIZE].copy_from_slice(&self.r.x.to_be_bytes());
        out[FIELD_SIZE..2 * FIELD_SIZE].copy_from_slice(&self.r.y.to_be_bytes());
        out[2 * FIELD_SIZE..].copy_from_slice(&self.s.to_be_bytes());
        out
    }
}

/// Computes the Fiat-Shamir challenge as a base field element.
///
/// `e = H(R.x, R.y, pk.x, pk.y, msg)` with the MiMC hash. This is the exact
/// value the constraint system recomputes, before any reduction.
pub fn challenge(r: &Affine, pk: &Affine, msg: BaseField) -> BaseField {
    let input: [BaseField; CHALLENGE_INPUTS] = [r.x, r.y, pk.x, pk.y, msg];
    mimc_hash(&input)
}

/// The challenge reduced modulo the subgroup order.
pub(crate) fn hash_challenge(r: &Affine, pk: &Affine, msg: BaseField) -> ScalarField {
    scalar_from_base(&challenge(r, pk, msg))
}

/// The verification relation the multi-signature circuit enforces per slot.
///
/// Holds when the public key is a non-identity member of the prime-order
/// subgroup, `R` is a member of the subgroup (the identity included), and
/// `G * s == R + pk * e`. Anything else, malformed points included, is
/// simply `false`.
pub fn verify_signature(public_key: &Affine, msg: BaseField, sig: &Signature) -> bool {
    if is_identity(public_key) || !is_in_prime_subgroup(public_key) {
        return false;
    }
    if !is_in_prime_subgroup(&sig.r) {
        return false;
    }

    let e = hash_challenge(&sig.r, public_key, msg);
    double_scalar_mul_basepoint(&sig.s, &-e, public_key) == sig.r
}
