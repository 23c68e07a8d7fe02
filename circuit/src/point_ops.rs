//! Twisted Edwards point gadgets.
//!
//! Points are `ark-ed-on-bn254`'s [`EdwardsVar`], whose addition law is the
//! complete one, so the same gadget doubles, adds the identity and adds a
//! point to itself. What lives here is what the slot logic needs on top:
//! allocation with no curve check, the on-curve residual, masking, the
//! subgroup-order check and fixed-base multiplication by the generator.

use std::sync::OnceLock;

use ark_ec::twisted_edwards::TECurveConfig;
use ark_ec::CurveGroup;
use ark_ff::{BitIteratorBE, One, PrimeField};
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};
use curve::{generator, Affine, BaseField, EdwardsConfig, Projective, ScalarField};

use crate::gadgets::{enforce_gated_zero, SCALAR_BITS};

pub use ark_ed_on_bn254::constraints::EdwardsVar;

/// Allocates `(x, y)` as private witnesses.
///
/// Unlike `EdwardsVar::new_witness` nothing is checked, so off-curve and
/// small-order values can be assigned and the caller decides what to assert.
pub fn alloc_unchecked(
    cs: ConstraintSystemRef<BaseField>,
    point: Option<&Affine>,
) -> Result<EdwardsVar, SynthesisError> {
    let x = FpVar::new_witness(cs.clone(), || {
        point.map(|p| p.x).ok_or(SynthesisError::AssignmentMissing)
    })?;
    let y = FpVar::new_witness(cs, || {
        point.map(|p| p.y).ok_or(SynthesisError::AssignmentMissing)
    })?;
    Ok(EdwardsVar::new(x, y))
}

/// `a*x^2 + y^2 - 1 - d*x^2*y^2`, zero exactly on the curve.
pub fn on_curve_residual(point: &EdwardsVar) -> Result<FpVar<BaseField>, SynthesisError> {
    let xx = point.x.square()?;
    let yy = point.y.square()?;
    let xxyy = &xx * &yy;
    Ok(&xx * EdwardsConfig::COEFF_A + &yy - BaseField::one() - xxyy * EdwardsConfig::COEFF_D)
}

/// The point itself when `active` holds, the identity otherwise.
pub fn mask(point: &EdwardsVar, active: &Boolean<BaseField>) -> Result<EdwardsVar, SynthesisError> {
    active.select(point, &EdwardsVar::zero())
}

/// `ℓ·point` by double-and-add over the bits of the subgroup order.
pub fn mul_by_subgroup_order(point: &EdwardsVar) -> Result<EdwardsVar, SynthesisError> {
    let mut acc = EdwardsVar::zero();
    for bit in BitIteratorBE::without_leading_zeros(ScalarField::MODULUS) {
        acc = acc.double()?;
        if bit {
            acc = acc + point;
        }
    }
    Ok(acc)
}

/// Forces `point == O` whenever `gate` is one.
pub fn enforce_gated_identity(
    point: &EdwardsVar,
    gate: &FpVar<BaseField>,
) -> Result<(), SynthesisError> {
    enforce_gated_zero(gate, &point.x)?;
    enforce_gated_zero(gate, &(&point.y - BaseField::one()))
}

/// Forces `ℓ·point == O` whenever `gate` is one.
pub fn enforce_gated_prime_order(
    point: &EdwardsVar,
    gate: &FpVar<BaseField>,
) -> Result<(), SynthesisError> {
    let multiple = mul_by_subgroup_order(point)?;
    enforce_gated_identity(&multiple, gate)
}

/// `[G, 2G, 4G, ...]`, one entry per scalar bit.
fn generator_powers() -> &'static [Projective] {
    static TABLE: OnceLock<Vec<Projective>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = Vec::with_capacity(SCALAR_BITS);
        let mut p = Projective::from(generator());
        for _ in 0..SCALAR_BITS {
            table.push(p);
            p += p;
        }
        table
    })
}

/// `s·G` from the little-endian bits of `s`.
///
/// The multiples of `G` are constants, so each pair of bits costs a table
/// lookup and one addition.
pub fn fixed_base_mul(bits_le: &[Boolean<BaseField>]) -> Result<EdwardsVar, SynthesisError> {
    let mut acc = EdwardsVar::zero();
    acc.precomputed_base_scalar_mul_le(bits_le.iter().zip(generator_powers()))?;
    Ok(acc)
}

/// The assigned point, in affine form.
pub fn point_value(point: &EdwardsVar) -> Result<Affine, SynthesisError> {
    Ok(point.value()?.into_affine())
}
