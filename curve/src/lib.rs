//! Baby-JubJub twisted Edwards curve over the BN254 scalar field.
//!
//! The field and group arithmetic come from arkworks (`ark-bn254`,
//! `ark-ed-on-bn254`); this crate pins the generator the rest of the
//! workspace signs against, adds the encodings and sampling helpers the
//! protocol needs, and provides the MiMC hash used for commitments and
//! signature challenges.

mod field;
pub mod hash;
mod point;
mod random;
pub mod serde_ark;

pub use ark_ed_on_bn254::{EdwardsAffine as Affine, EdwardsConfig, EdwardsProjective as Projective};
pub use field::{base_from_scalar, scalar_from_base, FieldEncoding, FIELD_BYTES};
pub use hash::{keccak_to_field, mimc_hash, MimcCompression, MimcHasher};
pub use point::{
    double_scalar_mul_basepoint, generator, identity, is_identity, is_in_prime_subgroup,
    mul_generator, GENERATOR,
};
pub use random::RandomField;

/// The field the curve is defined over (the BN254 scalar field).
pub type BaseField = ark_bn254::Fr;

/// The scalar field of the prime-order subgroup.
pub type ScalarField = ark_ed_on_bn254::Fr;
