//! Schnorr signature scheme over the Baby-JubJub curve.
//!
//! This library implements a Schnorr signature scheme using:
//! - The prime-order subgroup of the Baby-JubJub twisted Edwards curve
//! - The MiMC hash over the BN254 scalar field for the Fiat-Shamir challenge
//! - Messages encoded as a single base field element
//!
//! The challenge is `e = H(R.x, R.y, pk.x, pk.y, msg)`, computed on the
//! unreduced coordinates so that an arithmetic circuit over the same field
//! can recompute it with no range checks.
//!
//! # Example
//!
//! ```
//! use curve::BaseField;
//! use schnorr::{SigningKey, VerifyingKey, Signature};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! // Generate a random signing key
//! let mut rng = StdRng::seed_from_u64(2024);
//! let signing_key = SigningKey::random(&mut rng);
//!
//! // Derive the corresponding verifying key
//! let verifying_key = signing_key.verifying_key();
//!
//! // The message is a field element
//! let message = BaseField::from(1234u64);
//!
//! // Sign the message
//! let signature = signing_key.sign(&mut rng, message).expect("signing failed");
//!
//! // Verify the signature
//! let is_valid = verifying_key.verify(message, &signature).expect("verification failed");
//! assert!(is_valid);
//! ```
//!
//! # Security Considerations
//!
//! - Always use a cryptographically secure random number generator (CSRNG)
//! - Each signature must use a fresh random nonce
//! - Protect the signing key from unauthorized access

mod constants;
mod errors;
mod keys;
mod signatures;


pub use constants::{PK_SIZE, SIG_SIZE, SK_SIZE};
pub use errors::SchnorrError;
pub use keys::{SigningKey, VerifyingKey};
pub use signatures::{Signature, challenge, verify_signature};
