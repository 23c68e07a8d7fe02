//! Range checks and gated assertions shared by the slot logic.

use ark_ff::{BigInteger, PrimeField};
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::SynthesisError;
use curve::{BaseField, ScalarField};

/// Width of a canonical base field decomposition.
pub const FIELD_BITS: usize = BaseField::MODULUS_BIT_SIZE as usize;

/// Width of a scalar below the subgroup order.
pub const SCALAR_BITS: usize = ScalarField::MODULUS_BIT_SIZE as usize;

/// Little-endian `n`-bit decomposition of `x`.
///
/// Each bit is a boolean witness and the packed sum is tied to `x`, so for
/// `n` below [`FIELD_BITS`] this is also the range check `x < 2^n`.
pub fn to_bits_le_bounded(
    x: &FpVar<BaseField>,
    n: usize,
) -> Result<Vec<Boolean<BaseField>>, SynthesisError> {
    let cs = x.cs();
    let value = x.value().ok();
    let bits = (0..n)
        .map(|i| {
            Boolean::new_witness(cs.clone(), || {
                value
                    .map(|v| v.into_bigint().get_bit(i))
                    .ok_or(SynthesisError::AssignmentMissing)
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Boolean::le_bits_to_fp_var(&bits)?.enforce_equal(x)?;
    Ok(bits)
}

/// Forces `value == 0` whenever `gate` is one. `gate` must be boolean.
pub fn enforce_gated_zero(
    gate: &FpVar<BaseField>,
    value: &FpVar<BaseField>,
) -> Result<(), SynthesisError> {
    gate.mul_equals(value, &FpVar::zero())
}
