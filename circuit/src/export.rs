//! Calldata for an on-chain Groth16-style verifier.
//!
//! A raw proof is read as big-endian 256-bit words: `A` (2 words), `B`
//! (4 words, `[[b00, b01], [b10, b11]]`) and `C` (2 words). Anything past
//! the eighth word is ignored. Public inputs follow in circuit order.

use curve::{BaseField, FieldEncoding};
use serde::{Deserialize, Serialize};

use crate::error::{CircuitError, CircuitResult};
use crate::witness::PublicInputs;

pub const WORD_SIZE: usize = 32;

pub const RAW_PROOF_WORDS: usize = 8;

/// Byte-level access to a backend proof.
pub trait RawProof {
    fn raw_bytes(&self) -> Vec<u8>;
}

/// Proof and public inputs as `0x`-prefixed hex words.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnChainProof {
    pub a: [String; 2],
    pub b: [[String; 2]; 2],
    pub c: [String; 2],
    pub inputs: [String; PublicInputs::LEN],
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message_hex: Option<String>,
}

fn word_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

impl OnChainProof {
    pub fn from_raw(raw: &[u8], publics: &PublicInputs) -> CircuitResult<Self> {
        let needed = RAW_PROOF_WORDS * WORD_SIZE;
        if raw.len() < needed {
            return Err(CircuitError::Export(format!(
                "raw proof too small: {} bytes, expected at least {needed}",
                raw.len()
            )));
        }

        let words: Vec<String> = raw[..needed].chunks_exact(WORD_SIZE).map(word_hex).collect();
        let field_hex = |v: &BaseField| word_hex(&v.to_be_bytes());

        Ok(Self {
            a: [words[0].clone(), words[1].clone()],
            b: [
                [words[2].clone(), words[3].clone()],
                [words[4].clone(), words[5].clone()],
            ],
            c: [words[6].clone(), words[7].clone()],
            inputs: [
                field_hex(&publics.root),
                field_hex(&publics.message),
                field_hex(&publics.valid_count),
            ],
            message_hex: None,
        })
    }

    pub fn from_proof<P: RawProof>(proof: &P, publics: &PublicInputs) -> CircuitResult<Self> {
        Self::from_raw(&proof.raw_bytes(), publics)
    }

    /// Attaches the message as the bytes that were hashed into `Message`.
    pub fn with_message(mut self, message: &str) -> Self {
        self.message_hex = Some(message_hex(message));
        self
    }

    pub fn to_json(&self) -> CircuitResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CircuitError::Export(e.to_string()))
    }
}

/// Hex form of a message: kept as is when already `0x`-prefixed.
pub fn message_hex(message: &str) -> String {
    if message.starts_with("0x") {
        message.to_string()
    } else {
        word_hex(message.as_bytes())
    }
}
