//! Signing and verifying keys for the Schnorr signature scheme.

use ark_ff::Zero;
use curve::{
    Affine, BaseField, FieldEncoding, RandomField, ScalarField, is_identity, is_in_prime_subgroup,
    mul_generator,
};
use num_bigint::BigUint;
use rand::{RngCore, TryRngCore};
use serde::{Deserialize, Serialize};

use crate::constants::{FIELD_SIZE, PK_SIZE};
use crate::errors::SchnorrError;
use crate::signatures::{Signature, hash_challenge, verify_signature};

/// A secret signing key for creating Schnorr signatures.
///
/// The signing key is a non-zero scalar modulo the order of the curve's
/// prime subgroup. It must be kept secret and protected from unauthorized
/// access.
///
/// # Example
///
/// ```
/// use schnorr::SigningKey;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let signing_key = SigningKey::random(&mut rng);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningKey {
    #[serde(with = "curve::serde_ark")]
    scalar: ScalarField,
}

/// A public verifying key for verifying Schnorr signatures.
///
/// The verifying key is a point of the prime-order subgroup, derived from
/// the signing key by multiplying the curve generator by the secret scalar.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyingKey {
    #[serde(with = "curve::serde_ark")]
    point: Affine,
}

impl SigningKey {
    /// Generates a random signing key, uniform over `[1, l - 1]`.
    ///
    /// # Arguments
    ///
    /// * `rng` - A cryptographically secure random number generator
    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        Self {
            scalar: ScalarField::random_nonzero(rng),
        }
    }

    /// Like [`SigningKey::random`], for randomness sources that can fail.
    ///
    /// Returns `SchnorrError::Entropy` when the source reports an error.
    pub fn try_random<R: TryRngCore>(rng: &mut R) -> Result<Self, SchnorrError> {
        let scalar = ScalarField::try_random_nonzero(rng)
            .map_err(|e| SchnorrError::Entropy(e.to_string()))?;
        Ok(Self { scalar })
    }

    /// Wraps an existing secret scalar. Zero is rejected.
    pub fn from_scalar(scalar: ScalarField) -> Result<Self, SchnorrError> {
        if scalar.is_zero() {
            return Err(SchnorrError::ZeroSecret);
        }
        Ok(Self { scalar })
    }

    /// The secret scalar.
    pub fn scalar(&self) -> ScalarField {
        self.scalar
    }

    /// Derives the public verifying key from this signing key.
    ///
    /// The verifying key is computed as `G * sk` where `G` is the generator
    /// of the prime-order subgroup and `sk` is the secret scalar.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey {
            point: mul_generator(&self.scalar),
        }
    }

    /// Signs a message using a fresh random nonce.
    ///
    /// The signature is computed using the Schnorr signature algorithm:
    /// 1. Draw a nonce `k` uniformly from `[1, l - 1]`
    /// 2. Compute `R = G * k`
    /// 3. Compute challenge `e = H(R.x, R.y, pk.x, pk.y, msg)` using MiMC
    /// 4. Compute `s = k + (e mod l) * sk`
    /// 5. Return signature `(R, s)`
    ///
    /// # Arguments
    ///
    /// * `rng` - Source of the nonce; any `RngCore` works, fallible sources
    ///   surface as `SchnorrError::Entropy`
    /// * `msg` - The message, already encoded as a base field element
    ///
    /// # Example
    ///
    /// ```
    /// use curve::BaseField;
    /// use schnorr::SigningKey;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let signing_key = SigningKey::random(&mut rng);
    /// let message = BaseField::from(42u64);
    /// let signature = signing_key.sign(&mut rng, message).expect("signing failed");
    /// ```
    pub fn sign<R: TryRngCore>(&self, rng: &mut R, msg: BaseField) -> Result<Signature, SchnorrError> {
        let nonce = ScalarField::try_random_nonzero(rng)
            .map_err(|e| SchnorrError::Entropy(e.to_string()))?;
        Ok(self.sign_with_scalar_nonce(nonce, msg))
    }

    /// Signs a message with a caller-supplied nonce.
    ///
    /// The nonce is reduced modulo the subgroup order first. A nonce that
    /// reduces to zero would leak the secret key and returns
    /// `SchnorrError::ZeroNonce`. Reusing a nonce across two messages leaks
    /// the key as well; this is intended for reproducible test vectors.
    pub fn sign_with_nonce(&self, msg: BaseField, nonce: &BigUint) -> Result<Signature, SchnorrError> {
        let nonce = ScalarField::from(nonce.clone());
        if nonce.is_zero() {
            return Err(SchnorrError::ZeroNonce);
        }
        Ok(self.sign_with_scalar_nonce(nonce, msg))
    }

    fn sign_with_scalar_nonce(&self, nonce: ScalarField, msg: BaseField) -> Signature {
        let r = mul_generator(&nonce);
        let pk = self.verifying_key();

        let e = hash_challenge(&r, &pk.point, msg);
        let s = nonce + e * self.scalar;

        Signature { r, s }
    }
}

impl VerifyingKey {
    /// Wraps a curve point, checking that it is a non-identity member of
    /// the prime-order subgroup.
    pub fn from_point(point: Affine) -> Result<Self, SchnorrError> {
        if is_identity(&point) || !is_in_prime_subgroup(&point) {
            return Err(SchnorrError::InvalidPoint);
        }
        Ok(Self { point })
    }

    /// The underlying curve point.
    pub fn point(&self) -> Affine {
        self.point
    }

    /// Big-endian `x || y`.
    pub fn to_bytes(&self) -> [u8; PK_SIZE] {
        let mut out = [0u8; PK_SIZE];
        out[..FIELD_SIZE].copy_from_slice(&self.point.x.to_be_bytes());
        out[FIELD_SIZE..].copy_from_slice(&self.point.y.to_be_bytes());
        out
    }

    /// Verifies a signature on a message using this verifying key.
    ///
    /// The verification checks whether the signature equation holds:
    /// `G * s == R + pk * e`, where:
    /// - `G` is the subgroup generator
    /// - `s` is the signature scalar
    /// - `R` is the signature point
    /// - `pk` is this verifying key
    /// - `e = H(R.x, R.y, pk.x, pk.y, msg)` is the challenge hash
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing:
    /// - `Ok(true)` if the signature is valid
    /// - `Ok(false)` if the signature is invalid
    /// - `Err(SchnorrError::InvalidPoint)` if the verifying key is the
    ///   identity or either point is off the curve or outside the prime
    ///   subgroup
    ///
    /// An identity `R` is a subgroup member and is checked like any other
    /// commitment. The boolean agrees with [`crate::verify_signature`].
    ///
    /// # Example
    ///
    /// ```
    /// use curve::BaseField;
    /// use schnorr::SigningKey;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let signing_key = SigningKey::random(&mut rng);
    /// let verifying_key = signing_key.verifying_key();
    /// let message = BaseField::from(42u64);
    ///
    /// let signature = signing_key.sign(&mut rng, message).expect("signing failed");
    /// let is_valid = verifying_key.verify(message, &signature).expect("verification failed");
    /// assert!(is_valid);
    /// ```
    pub fn verify(&self, msg: BaseField, sig: &Signature) -> Result<bool, SchnorrError> {
        if is_identity(&self.point) || !is_in_prime_subgroup(&self.point) {
            return Err(SchnorrError::InvalidPoint);
        }
        if !is_in_prime_subgroup(&sig.r) {
            return Err(SchnorrError::InvalidPoint);
        }

        Ok(verify_signature(&self.point, msg, sig))
    }
}

impl From<&SigningKey> for VerifyingKey {
    /// Converts a reference to a signing key into a verifying key.
    ///
    /// This is equivalent to calling `signing_key.verifying_key()`.
    fn from(sk: &SigningKey) -> Self {
        sk.verifying_key()
    }
}
