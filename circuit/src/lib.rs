//! # Multi-Schnorr Threshold Circuit
//!
//! A rank-1 constraint system proving that at least `ValidCount` members of
//! a committed validator set signed the same message, with Schnorr
//! signatures over Baby-JubJub and MiMC for both the commitment and the
//! challenge.
//!
//! ## Overview
//!
//! The circuit has three public inputs, in order:
//!
//! - `Root`: the accumulator root over every public key of the set
//! - `Message`: the signed message as a field element
//! - `ValidCount`: how many slots carry a valid signature
//!
//! Each of the `2^depth` slots supplies `(Ax, Ay, Rx, Ry, s, ignore)` as
//! private inputs. Slots run identical, branch-free constraints; `ignore`
//! gates every assertion so a slot that does not sign is accepted whatever
//! it contains, and it counts as invalid.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use circuit::{encode_message, MockBackend, MultiSchnorrWitness, OnChainProof, Prover};
//! use committee::{CommitteeParams, ValidatorSet};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let params = CommitteeParams::new(2).expect("depth");
//! let set = ValidatorSet::generate(3, params, &mut rng).expect("validators");
//!
//! let message = encode_message("0x1234");
//! let witness = MultiSchnorrWitness::assemble(&set, &[0, 2], message, &mut rng)
//!     .expect("witness");
//!
//! let prover = Prover::new(MockBackend, params).expect("setup");
//! let proof = prover.prove(&witness).expect("prove");
//! assert!(prover.verify(&proof, &witness.public_inputs()).expect("verify"));
//!
//! let calldata = OnChainProof::from_proof(&proof, &witness.public_inputs())
//!     .expect("export")
//!     .with_message("0x1234");
//! println!("{}", calldata.to_json().expect("json"));
//! ```
//!
//! ## Constraint System
//!
//! Constraints have the form `<A, z> * <B, z> = <C, z>` with
//! `z = (1, public..., private...)`. Synthesis runs on an `ark-relations`
//! constraint system with `ark-r1cs-std` variables; [`R1cs`] freezes its
//! matrices and [`Assignment`] its values. Namespaces recorded during
//! synthesis make [`R1cs::is_satisfied`] report where a violation
//! happened, e.g. `slot0/on_curve`. [`MultiSchnorrInstance`] exposes the
//! same circuit as a `ConstraintSynthesizer` for arkworks proving systems.
//!
//! Gadgets:
//!
//! - [`point_ops`]: unchecked allocation, masking, the on-curve residual,
//!   the subgroup-order check and fixed-base multiplication over
//!   `ark-ed-on-bn254`'s `EdwardsVar`
//! - [`mimc_gadget`]: MiMC-5 with 3 constraints per round and the
//!   commitment root
//! - [`gadgets`]: bounded bit decomposition and gated assertions
//!
//! ## Backends
//!
//! [`ProvingBackend`] is the contract a SNARK backend fulfils. The crate
//! ships only [`MockBackend`], which checks satisfiability in place of
//! proving. [`OnChainProof`] formats any backend proof exposing
//! [`RawProof`] for an on-chain verifier.

pub mod backend;
mod error;
pub mod export;
pub mod gadgets;
pub mod mimc_gadget;
pub mod multi_schnorr;
pub mod point_ops;
pub mod r1cs;
pub mod witness;

pub use backend::{CircuitDigest, MockBackend, MockProof, Prover, ProvingBackend};
pub use gadgets::{FIELD_BITS, SCALAR_BITS};
pub use error::{CircuitError, CircuitResult};
pub use export::{message_hex, OnChainProof, RawProof};
pub use multi_schnorr::{
    compile, CircuitOutputs, MultiSchnorrCircuit, MultiSchnorrInstance, Synthesis,
};
pub use point_ops::EdwardsVar;
pub use r1cs::{Assignment, ConstraintViolation, R1cs, Row};
pub use witness::{encode_message, validate_signers, Candidate, MultiSchnorrWitness, PublicInputs};

pub use curve::BaseField;
