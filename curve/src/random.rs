use ark_ff::{PrimeField, Zero};
use rand::{RngCore, TryRngCore};

/// Helper trait for sampling random field elements by rejection.
pub trait RandomField: Sized {
    /// Sample from the field with zero excluded.
    fn random_nonzero<R: RngCore + ?Sized>(rng: &mut R) -> Self;

    /// As [`RandomField::random_nonzero`], surfacing entropy failures.
    fn try_random_nonzero<R: TryRngCore + ?Sized>(rng: &mut R) -> Result<Self, R::Error>;
}

fn sample_bytes<F: PrimeField>() -> Vec<u8> {
    vec![0u8; (F::MODULUS_BIT_SIZE as usize).div_ceil(8)]
}

// `from_random_bytes` masks off the bits above the modulus width and returns
// `None` for values at or above the modulus, so accepted draws are uniform.
fn accept<F: PrimeField>(bytes: &[u8]) -> Option<F> {
    F::from_random_bytes(bytes).filter(|value: &F| !value.is_zero())
}

impl<F: PrimeField> RandomField for F {
    fn random_nonzero<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = sample_bytes::<F>();
        loop {
            rng.fill_bytes(&mut bytes);
            if let Some(value) = accept(&bytes) {
                return value;
            }
        }
    }

    fn try_random_nonzero<R: TryRngCore + ?Sized>(rng: &mut R) -> Result<Self, R::Error> {
        let mut bytes = sample_bytes::<F>();
        loop {
            rng.try_fill_bytes(&mut bytes)?;
            if let Some(value) = accept(&bytes) {
                return Ok(value);
            }
        }
    }
}
