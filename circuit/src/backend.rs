//! Proving backend contract.
//!
//! A backend turns an [`R1cs`] into its own constraint representation, runs
//! a setup for it, and proves and verifies assignments. All four steps are
//! opaque and may take a long time; none of them can be cancelled.

use committee::CommitteeParams;
use curve::{keccak_to_field, BaseField, FieldEncoding};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CircuitError, CircuitResult};
use crate::export::{RawProof, RAW_PROOF_WORDS, WORD_SIZE};
use crate::multi_schnorr::MultiSchnorrCircuit;
use crate::r1cs::{Assignment, R1cs};
use crate::witness::{MultiSchnorrWitness, PublicInputs};

pub trait ProvingBackend {
    type ConstraintSystem;
    type ProvingKey;
    type VerifyingKey;
    type Proof;

    fn compile(&self, r1cs: &R1cs) -> CircuitResult<Self::ConstraintSystem>;

    fn setup(
        &self,
        cs: &Self::ConstraintSystem,
    ) -> CircuitResult<(Self::ProvingKey, Self::VerifyingKey)>;

    fn prove(
        &self,
        cs: &Self::ConstraintSystem,
        pk: &Self::ProvingKey,
        assignment: &Assignment,
    ) -> CircuitResult<Self::Proof>;

    fn verify(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_inputs: &[BaseField],
    ) -> CircuitResult<bool>;
}

/// Development backend: "proving" checks satisfiability directly.
///
/// Proofs bind the circuit and the public inputs through a Keccak digest
/// but carry no zero-knowledge or soundness guarantee.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockBackend;

/// Digest identifying a compiled constraint system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitDigest(#[serde(with = "curve::serde_ark")] pub BaseField);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockProof {
    pub circuit: CircuitDigest,
    #[serde(with = "curve::serde_ark")]
    pub public_inputs: Vec<BaseField>,
    pub words: Vec<[u8; WORD_SIZE]>,
}

impl MockProof {
    fn derive_words(circuit: &CircuitDigest, public_inputs: &[BaseField]) -> Vec<[u8; WORD_SIZE]> {
        let mut seed = circuit.0.to_be_bytes().to_vec();
        for input in public_inputs {
            seed.extend_from_slice(&input.to_be_bytes());
        }
        (0..RAW_PROOF_WORDS)
            .map(|i| {
                let mut preimage = seed.clone();
                preimage.push(i as u8);
                keccak_to_field(&preimage).to_be_bytes()
            })
            .collect()
    }
}

impl RawProof for MockProof {
    fn raw_bytes(&self) -> Vec<u8> {
        self.words.iter().flatten().copied().collect()
    }
}

impl ProvingBackend for MockBackend {
    type ConstraintSystem = (R1cs, CircuitDigest);
    type ProvingKey = CircuitDigest;
    type VerifyingKey = CircuitDigest;
    type Proof = MockProof;

    fn compile(&self, r1cs: &R1cs) -> CircuitResult<Self::ConstraintSystem> {
        r1cs.check_well_formed()?;
        let digest = CircuitDigest(keccak_to_field(&r1cs.to_bytes()?));
        Ok((r1cs.clone(), digest))
    }

    fn setup(
        &self,
        cs: &Self::ConstraintSystem,
    ) -> CircuitResult<(Self::ProvingKey, Self::VerifyingKey)> {
        Ok((cs.1, cs.1))
    }

    fn prove(
        &self,
        cs: &Self::ConstraintSystem,
        pk: &Self::ProvingKey,
        assignment: &Assignment,
    ) -> CircuitResult<Self::Proof> {
        if *pk != cs.1 {
            return Err(CircuitError::Configuration(
                "proving key does not belong to this constraint system".into(),
            ));
        }
        cs.0.is_satisfied(assignment)?;
        Ok(MockProof {
            circuit: *pk,
            public_inputs: assignment.public.clone(),
            words: MockProof::derive_words(pk, &assignment.public),
        })
    }

    fn verify(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_inputs: &[BaseField],
    ) -> CircuitResult<bool> {
        Ok(proof.circuit == *vk
            && proof.public_inputs == public_inputs
            && proof.words == MockProof::derive_words(vk, public_inputs))
    }
}

/// Compiles and sets up the circuit once, then proves many witnesses.
pub struct Prover<B: ProvingBackend> {
    backend: B,
    circuit: MultiSchnorrCircuit,
    system: B::ConstraintSystem,
    proving_key: B::ProvingKey,
    verifying_key: B::VerifyingKey,
}

impl<B: ProvingBackend> Prover<B> {
    pub fn new(backend: B, params: CommitteeParams) -> CircuitResult<Self> {
        let circuit = MultiSchnorrCircuit::new(params)?;
        let r1cs = circuit.compile()?;
        let system = backend.compile(&r1cs)?;
        let (proving_key, verifying_key) = backend.setup(&system)?;
        info!(capacity = params.capacity(), "prover ready");
        Ok(Self {
            backend,
            circuit,
            system,
            proving_key,
            verifying_key,
        })
    }

    pub fn circuit(&self) -> &MultiSchnorrCircuit {
        &self.circuit
    }

    pub fn verifying_key(&self) -> &B::VerifyingKey {
        &self.verifying_key
    }

    pub fn prove(&self, witness: &MultiSchnorrWitness) -> CircuitResult<B::Proof> {
        let synthesis = self.circuit.synthesize(witness)?;
        debug!(
            valid = ?synthesis.outputs.valid,
            "synthesized witness"
        );
        self.backend
            .prove(&self.system, &self.proving_key, &synthesis.assignment)
    }

    pub fn verify(&self, proof: &B::Proof, public_inputs: &PublicInputs) -> CircuitResult<bool> {
        self.backend
            .verify(&self.verifying_key, proof, &public_inputs.to_vec())
    }
}
