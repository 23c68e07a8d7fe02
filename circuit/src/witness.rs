//! Witness assembly for the multi-signature circuit.
//!
//! Every slot of the validator set becomes a [`Candidate`]: chosen signers
//! carry a real signature, every other slot carries the dummy signature and
//! is flagged as ignored. The public key is always the committed one, so the
//! circuit can rebuild the accumulator root from the candidates alone.

use std::collections::HashSet;

use committee::{build_root, CommitteeParams, ValidatorSet};
use ark_ff::Zero;
use curve::{identity, keccak_to_field, Affine, BaseField};
use num_bigint::BigUint;
use rand::TryRngCore;
use schnorr::{verify_signature, SchnorrError, Signature, SigningKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CircuitError, CircuitResult};

/// One slot of the witness.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(with = "curve::serde_ark")]
    pub public_key: Affine,
    pub signature: Signature,
    pub ignore: bool,
}

impl Candidate {
    pub fn ignored(public_key: Affine) -> Self {
        Self {
            public_key,
            signature: Signature::dummy(),
            ignore: true,
        }
    }

    /// Whether the slot counts towards the threshold, using ordinary
    /// conditionals in place of the circuit's gating. An identity public
    /// key never counts.
    pub fn is_valid(&self, message: BaseField) -> bool {
        !self.ignore && verify_signature(&self.public_key, message, &self.signature)
    }
}

/// The three public inputs, in the order the circuit allocates them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInputs {
    #[serde(with = "curve::serde_ark")]
    pub root: BaseField,
    #[serde(with = "curve::serde_ark")]
    pub message: BaseField,
    #[serde(with = "curve::serde_ark")]
    pub valid_count: BaseField,
}

impl PublicInputs {
    pub const LEN: usize = 3;

    pub fn to_vec(&self) -> Vec<BaseField> {
        vec![self.root, self.message, self.valid_count]
    }

    pub fn from_slice(values: &[BaseField]) -> Option<Self> {
        match values {
            [root, message, valid_count] => Some(Self {
                root: *root,
                message: *message,
                valid_count: *valid_count,
            }),
            _ => None,
        }
    }
}

/// Full assignment of the multi-signature circuit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiSchnorrWitness {
    #[serde(with = "curve::serde_ark")]
    pub root: BaseField,
    #[serde(with = "curve::serde_ark")]
    pub message: BaseField,
    pub valid_count: u64,
    pub candidates: Vec<Candidate>,
}

impl MultiSchnorrWitness {
    /// Signs `message` with every validator in `signers` using fresh nonces.
    pub fn assemble<R: TryRngCore>(
        set: &ValidatorSet,
        signers: &[usize],
        message: BaseField,
        rng: &mut R,
    ) -> CircuitResult<Self> {
        Self::assemble_with(set, signers, message, |sk| sk.sign(&mut *rng, message))
    }

    /// Like [`MultiSchnorrWitness::assemble`], with one fixed nonce for all
    /// signers. Only meant for reproducible fixtures.
    pub fn assemble_with_nonce(
        set: &ValidatorSet,
        signers: &[usize],
        message: BaseField,
        nonce: &BigUint,
    ) -> CircuitResult<Self> {
        Self::assemble_with(set, signers, message, |sk| sk.sign_with_nonce(message, nonce))
    }

    fn assemble_with<F>(
        set: &ValidatorSet,
        signers: &[usize],
        message: BaseField,
        mut sign: F,
    ) -> CircuitResult<Self>
    where
        F: FnMut(&SigningKey) -> Result<Signature, SchnorrError>,
    {
        validate_signers(set, signers)?;
        let root = set.root()?;

        let selected: HashSet<usize> = signers.iter().copied().collect();
        let mut candidates = Vec::with_capacity(set.capacity());
        for (index, entry) in set.entries().iter().enumerate() {
            if !selected.contains(&index) {
                candidates.push(Candidate::ignored(entry.public));
                continue;
            }
            let sk = entry
                .signing_key()
                .ok_or_else(|| CircuitError::Index(format!("slot {index} cannot sign")))?;
            let signature = sign(&sk)?;
            debug!(slot = index, "signed message");
            candidates.push(Candidate {
                public_key: entry.public,
                signature,
                ignore: false,
            });
        }

        info!(
            capacity = candidates.len(),
            signers = signers.len(),
            root = %committee::root_hex(&root),
            "assembled multi-signature witness"
        );

        Ok(Self {
            root,
            message,
            valid_count: signers.len() as u64,
            candidates,
        })
    }

    /// Shape-only witness: every slot ignored, identity keys, dummy signatures.
    ///
    /// It satisfies the circuit, which keeps compilation honest.
    pub fn blank(params: CommitteeParams) -> CircuitResult<Self> {
        params.validate()?;
        let keys = vec![identity(); params.capacity()];
        let root = build_root(&keys)?;
        Ok(Self {
            root,
            message: BaseField::zero(),
            valid_count: 0,
            candidates: keys.into_iter().map(Candidate::ignored).collect(),
        })
    }

    pub fn capacity(&self) -> usize {
        self.candidates.len()
    }

    /// Parameters matching the number of candidates.
    pub fn params(&self) -> CircuitResult<CommitteeParams> {
        let capacity = self.capacity();
        if !capacity.is_power_of_two() {
            return Err(CircuitError::Configuration(format!(
                "candidate count must be a power of two, got {capacity}"
            )));
        }
        Ok(CommitteeParams::new(capacity.trailing_zeros() as usize)?)
    }

    pub fn public_inputs(&self) -> PublicInputs {
        PublicInputs {
            root: self.root,
            message: self.message,
            valid_count: BaseField::from(self.valid_count),
        }
    }

    /// Per-slot validity as the circuit computes it.
    pub fn verify_off_circuit(&self) -> Vec<bool> {
        self.candidates
            .iter()
            .map(|c| c.is_valid(self.message))
            .collect()
    }
}

/// Rejects out-of-range, duplicate and padding indices before any signing.
pub fn validate_signers(set: &ValidatorSet, signers: &[usize]) -> CircuitResult<()> {
    if signers.len() > set.capacity() {
        return Err(CircuitError::Index(format!(
            "{} signers exceed capacity {}",
            signers.len(),
            set.capacity()
        )));
    }

    let mut seen = HashSet::with_capacity(signers.len());
    for &index in signers {
        match set.is_padding(index) {
            None => {
                return Err(CircuitError::Index(format!(
                    "index {index} out of range for capacity {}",
                    set.capacity()
                )))
            }
            Some(true) => {
                return Err(CircuitError::Index(format!(
                    "index {index} is a padding slot"
                )))
            }
            Some(false) => {}
        }
        if !seen.insert(index) {
            return Err(CircuitError::Index(format!("index {index} listed twice")));
        }
    }
    Ok(())
}

/// Maps a message to a field element: Keccak-256 reduced mod `p`.
///
/// A `0x`-prefixed string is hashed as the bytes it encodes; anything else,
/// including malformed hex, is hashed as its UTF-8 bytes.
pub fn encode_message(input: &str) -> BaseField {
    let decoded = input
        .strip_prefix("0x")
        .and_then(|hex_str| hex::decode(hex_str).ok());
    match decoded {
        Some(bytes) => keccak_to_field(&bytes),
        None => keccak_to_field(input.as_bytes()),
    }
}
