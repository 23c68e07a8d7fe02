//! MiMC-5 over the base field, in Miyaguchi–Preneel mode.
//!
//! The block cipher is keyed by the running chaining value:
//!
//! ```text
//! E_k(m): x = m; for c in C: x = (x + k + c)^5;  return x + k
//! H(m_1..m_n): h = 0; for m_i: h = E_h(m_i) + h + m_i
//! ```
//!
//! Round constants are a Keccak-256 chain seeded with `"seed"`; each digest
//! is read big-endian and reduced into the field. The same function serves
//! as the accumulator's leaf and node hash and the signature challenge, so
//! the in-circuit gadget must follow these definitions exactly.

use std::sync::OnceLock;

use ark_ff::{Field, PrimeField, Zero};
use p3_symmetric::{CryptographicHasher, PseudoCompressionFunction};
use sha3::{Digest, Keccak256};

use crate::BaseField;

/// Number of cipher rounds.
pub const MIMC_ROUNDS: usize = 110;

const MIMC_SEED: &[u8] = b"seed";

/// The round constants, derived on first use.
pub fn round_constants() -> &'static [BaseField; MIMC_ROUNDS] {
    static CONSTANTS: OnceLock<[BaseField; MIMC_ROUNDS]> = OnceLock::new();
    CONSTANTS.get_or_init(|| {
        let mut state = Keccak256::digest(MIMC_SEED).to_vec();
        let mut constants = [BaseField::zero(); MIMC_ROUNDS];
        for constant in constants.iter_mut() {
            state = Keccak256::digest(&state).to_vec();
            *constant = BaseField::from_be_bytes_mod_order(&state);
        }
        constants
    })
}

/// Encrypt `message` under `key`.
pub fn encrypt(key: BaseField, message: BaseField) -> BaseField {
    let mut x = message;
    for &c in round_constants().iter() {
        let t = x + key + c;
        x = t.square().square() * t;
    }
    x + key
}

/// Variable-length MiMC hash.
#[derive(Copy, Clone, Debug, Default)]
pub struct MimcHasher;

impl CryptographicHasher<BaseField, BaseField> for MimcHasher {
    fn hash_iter<I>(&self, input: I) -> BaseField
    where
        I: IntoIterator<Item = BaseField>,
    {
        input
            .into_iter()
            .fold(BaseField::zero(), |h, m| encrypt(h, m) + h + m)
    }
}

/// The 2-to-1 node compression of the commitment accumulator.
#[derive(Copy, Clone, Debug, Default)]
pub struct MimcCompression;

impl PseudoCompressionFunction<BaseField, 2> for MimcCompression {
    fn compress(&self, input: [BaseField; 2]) -> BaseField {
        MimcHasher.hash_iter(input)
    }
}

/// Hash a slice of field elements.
pub fn mimc_hash(inputs: &[BaseField]) -> BaseField {
    MimcHasher.hash_iter(inputs.iter().copied())
}

/// Keccak-256 of `bytes`, read big-endian and reduced into the field.
pub fn keccak_to_field(bytes: &[u8]) -> BaseField {
    BaseField::from_be_bytes_mod_order(&Keccak256::digest(bytes))
}
