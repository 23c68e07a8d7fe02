use ark_relations::r1cs::SynthesisError;
use committee::CommitteeError;
use schnorr::SchnorrError;
use thiserror::Error;

use crate::r1cs::ConstraintViolation;

#[derive(Debug, Error)]
pub enum CircuitError {
    #[error("invalid signer index: {0}")]
    Index(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("signing failed: {0}")]
    Signing(#[from] SchnorrError),
    #[error("validator set error: {0}")]
    Committee(#[from] CommitteeError),
    #[error("synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
    #[error("assignment does not satisfy the constraint system: {0}")]
    Unsatisfied(#[from] ConstraintViolation),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("export error: {0}")]
    Export(String),
}

pub type CircuitResult<T> = Result<T, CircuitError>;
