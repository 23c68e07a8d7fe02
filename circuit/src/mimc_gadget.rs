//! In-circuit MiMC hash and commitment accumulator.
//!
//! Mirrors `curve::hash` round for round: each round is `(x + k + c)^5`,
//! three multiplications, and the hash chains blocks Miyaguchi–Preneel
//! style starting from a zero key.

use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::SynthesisError;
use curve::hash::round_constants;
use curve::BaseField;

/// `E_key(message)`.
pub fn encrypt(
    key: &FpVar<BaseField>,
    message: &FpVar<BaseField>,
) -> Result<FpVar<BaseField>, SynthesisError> {
    let mut x = message.clone();
    for &c in round_constants().iter() {
        let t = &x + key + c;
        let t4 = t.square()?.square()?;
        x = t4 * &t;
    }
    Ok(x + key)
}

pub fn hash(inputs: &[FpVar<BaseField>]) -> Result<FpVar<BaseField>, SynthesisError> {
    let mut h = FpVar::zero();
    for m in inputs {
        let e = encrypt(&h, m)?;
        h = e + &h + m;
    }
    Ok(h)
}

/// Root over `(x, y)` key coordinates, leaves `H(x, y)` folded pairwise.
///
/// The key count must be a power of two; callers check it.
pub fn commitment_root(
    keys: &[(FpVar<BaseField>, FpVar<BaseField>)],
) -> Result<FpVar<BaseField>, SynthesisError> {
    let mut level = keys
        .iter()
        .map(|(x, y)| hash(&[x.clone(), y.clone()]))
        .collect::<Result<Vec<_>, _>>()?;
    while level.len() > 1 {
        level = level
            .chunks_exact(2)
            .map(hash)
            .collect::<Result<Vec<_>, _>>()?;
    }
    Ok(level.pop().unwrap_or_else(FpVar::zero))
}
