use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{MontFp, One, PrimeField, Zero};

use crate::{Affine, BaseField, Projective, ScalarField};

const GENERATOR_X: BaseField =
    MontFp!("5299619240641551281634865583518297030282874472190772894086521144482721001553");
const GENERATOR_Y: BaseField =
    MontFp!("16950150798460657717958625567821834550301663161624707787222815936182638968203");

/// The signing generator, a point of the prime-order subgroup.
pub const GENERATOR: Affine = Affine::new_unchecked(GENERATOR_X, GENERATOR_Y);

pub fn generator() -> Affine {
    GENERATOR
}

/// The neutral element `(0, 1)`.
pub fn identity() -> Affine {
    Affine::new_unchecked(BaseField::zero(), BaseField::one())
}

pub fn is_identity(point: &Affine) -> bool {
    point.x.is_zero() && point.y.is_one()
}

/// On the curve and annihilated by the subgroup order.
pub fn is_in_prime_subgroup(point: &Affine) -> bool {
    point.is_on_curve() && point.mul_bigint(ScalarField::MODULUS).is_zero()
}

/// `scalar · G`.
pub fn mul_generator(scalar: &ScalarField) -> Affine {
    (GENERATOR * scalar).into_affine()
}

/// `a · G + b · point`, evaluated as a single two-term MSM.
pub fn double_scalar_mul_basepoint(a: &ScalarField, b: &ScalarField, point: &Affine) -> Affine {
    Projective::msm_unchecked(&[GENERATOR, *point], &[*a, *b]).into_affine()
}
