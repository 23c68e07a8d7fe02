//! The multi-signature threshold circuit.
//!
//! Public inputs: `Root`, `Message`, `ValidCount`, in that order. Private
//! inputs: one candidate per validator slot, `(Ax, Ay, Rx, Ry, s, ignore)`.
//!
//! ```text
//! root(H(Ax_i, Ay_i))        == Root
//! ignore_i                   in {0, 1},  active_i = 1 - ignore_i
//! active_i * curve(A_i)      == 0,  same for R_i
//! active_i * (l*A_i - O)     == 0,  same for R_i
//! active_i * [A_i == O]      == 0
//! e_i = H(Rx_i, Ry_i, Ax_i, Ay_i, Message)
//! active_i * (s_i*G - R_i - e_i*A_i) == 0
//! valid_i = active_i * [A_i != O] * [s_i*G == R_i + e_i*A_i]
//! sum(valid_i)               == ValidCount
//! ```
//!
//! Every slot runs the same constraints. Points and `s` are masked to the
//! identity and zero in ignored slots before any scalar multiplication, so
//! arbitrary values there never break a division.

use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::prelude::*;
use ark_relations::r1cs::{
    ConstraintSynthesizer, ConstraintSystem, ConstraintSystemRef, SynthesisError, SynthesisMode,
};
use committee::CommitteeParams;
use curve::{base_from_scalar, BaseField};
use tracing::info;

use crate::error::{CircuitError, CircuitResult};
use crate::gadgets::{enforce_gated_zero, to_bits_le_bounded, SCALAR_BITS};
use crate::mimc_gadget::{commitment_root, hash};
use crate::point_ops::{
    alloc_unchecked, enforce_gated_prime_order, fixed_base_mul, mask, on_curve_residual,
    EdwardsVar,
};
use crate::r1cs::{Assignment, R1cs, Scopes};
use crate::witness::{Candidate, MultiSchnorrWitness};

fn assigned<T>(value: Option<T>) -> Result<T, SynthesisError> {
    value.ok_or(SynthesisError::AssignmentMissing)
}

/// Private variables of one candidate slot, before any check.
struct SlotVars {
    public_key: EdwardsVar,
    r: EdwardsVar,
    s: FpVar<BaseField>,
    ignore: Option<bool>,
}

impl SlotVars {
    fn alloc(
        cs: &ConstraintSystemRef<BaseField>,
        candidate: Option<&Candidate>,
    ) -> Result<Self, SynthesisError> {
        let public_key = alloc_unchecked(cs.clone(), candidate.map(|c| &c.public_key))?;
        let r = alloc_unchecked(cs.clone(), candidate.map(|c| &c.signature.r))?;
        let s = FpVar::new_witness(cs.clone(), || {
            assigned(candidate.map(|c| base_from_scalar(&c.signature.s)))
        })?;
        Ok(Self {
            public_key,
            r,
            s,
            ignore: candidate.map(|c| c.ignore),
        })
    }
}

/// What the circuit computes, still as constraint variables.
struct CircuitVars {
    root: FpVar<BaseField>,
    valid: Vec<Boolean<BaseField>>,
    valid_sum: FpVar<BaseField>,
}

/// Values the circuit computed, for inspection next to the constraint check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CircuitOutputs {
    pub root: BaseField,
    pub valid: Vec<bool>,
    pub valid_sum: BaseField,
}

/// Result of synthesizing the circuit for one witness.
#[derive(Clone, Debug)]
pub struct Synthesis {
    pub r1cs: R1cs,
    pub assignment: Assignment,
    pub outputs: CircuitOutputs,
}

/// The circuit for a validator set of a given capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MultiSchnorrCircuit {
    params: CommitteeParams,
}

impl MultiSchnorrCircuit {
    pub fn new(params: CommitteeParams) -> CircuitResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> CommitteeParams {
        self.params
    }

    /// The constraint system, synthesized in setup mode with no witness.
    pub fn compile(&self) -> CircuitResult<R1cs> {
        let cs = ConstraintSystem::<BaseField>::new_ref();
        cs.set_mode(SynthesisMode::Setup);
        let mut scopes = Scopes::default();
        generate(&cs, self.params.capacity(), None, &mut scopes)?;
        let r1cs = R1cs::from_constraint_system(&cs, scopes)?;
        info!(
            capacity = self.params.capacity(),
            constraints = r1cs.num_constraints(),
            public = r1cs.num_public(),
            private = r1cs.num_private(),
            "compiled multi-signature circuit"
        );
        Ok(r1cs)
    }

    /// Builds constraints and assignment for `witness`.
    ///
    /// Fails when the witness does not fit this circuit's capacity, or when
    /// an active slot holds points for which an addition divides by zero.
    /// An unsatisfying witness otherwise still synthesizes.
    pub fn synthesize(&self, witness: &MultiSchnorrWitness) -> CircuitResult<Synthesis> {
        self.check_capacity(witness)?;

        let cs = ConstraintSystem::<BaseField>::new_ref();
        let mut scopes = Scopes::default();
        let vars = generate(&cs, self.params.capacity(), Some(witness), &mut scopes)?;
        let outputs = CircuitOutputs {
            root: vars.root.value()?,
            valid: vars
                .valid
                .iter()
                .map(|v| v.value())
                .collect::<Result<Vec<_>, _>>()?,
            valid_sum: vars.valid_sum.value()?,
        };

        let r1cs = R1cs::from_constraint_system(&cs, scopes)?;
        let assignment = Assignment::from_constraint_system(&cs)?;
        Ok(Synthesis {
            r1cs,
            assignment,
            outputs,
        })
    }

    /// The circuit paired with a witness, for arkworks proving systems.
    pub fn instance<'a>(
        &self,
        witness: Option<&'a MultiSchnorrWitness>,
    ) -> CircuitResult<MultiSchnorrInstance<'a>> {
        if let Some(witness) = witness {
            self.check_capacity(witness)?;
        }
        Ok(MultiSchnorrInstance {
            capacity: self.params.capacity(),
            witness,
        })
    }

    fn check_capacity(&self, witness: &MultiSchnorrWitness) -> CircuitResult<()> {
        let witness_params = witness.params()?;
        if witness_params != self.params {
            return Err(CircuitError::Configuration(format!(
                "witness has {} candidates, circuit expects {}",
                witness.capacity(),
                self.params.capacity()
            )));
        }
        Ok(())
    }
}

/// [`MultiSchnorrCircuit`] as a [`ConstraintSynthesizer`]. Without a
/// witness only the constraint shape is generated.
#[derive(Clone, Copy, Debug)]
pub struct MultiSchnorrInstance<'a> {
    capacity: usize,
    witness: Option<&'a MultiSchnorrWitness>,
}

impl ConstraintSynthesizer<BaseField> for MultiSchnorrInstance<'_> {
    fn generate_constraints(self, cs: ConstraintSystemRef<BaseField>) -> Result<(), SynthesisError> {
        let mut scopes = Scopes::default();
        generate(&cs, self.capacity, self.witness, &mut scopes).map(|_| ())
    }
}

/// Constraint system for a set of the given shape.
pub fn compile(params: CommitteeParams) -> CircuitResult<R1cs> {
    MultiSchnorrCircuit::new(params)?.compile()
}

fn generate(
    cs: &ConstraintSystemRef<BaseField>,
    capacity: usize,
    witness: Option<&MultiSchnorrWitness>,
    scopes: &mut Scopes,
) -> Result<CircuitVars, SynthesisError> {
    let publics = witness.map(MultiSchnorrWitness::public_inputs);
    let root = FpVar::new_input(cs.clone(), || assigned(publics.map(|p| p.root)))?;
    let message = FpVar::new_input(cs.clone(), || assigned(publics.map(|p| p.message)))?;
    let valid_count = FpVar::new_input(cs.clone(), || assigned(publics.map(|p| p.valid_count)))?;

    let slots = (0..capacity)
        .map(|i| SlotVars::alloc(cs, witness.and_then(|w| w.candidates.get(i))))
        .collect::<Result<Vec<_>, _>>()?;

    let computed_root = scopes.scoped(cs, "commitment", |_| {
        let keys: Vec<_> = slots
            .iter()
            .map(|slot| (slot.public_key.x.clone(), slot.public_key.y.clone()))
            .collect();
        let computed = commitment_root(&keys)?;
        computed.enforce_equal(&root)?;
        Ok(computed)
    })?;

    let mut valid = Vec::with_capacity(slots.len());
    for (i, slot) in slots.iter().enumerate() {
        let v = scopes.scoped(cs, &format!("slot{i}"), |scopes| {
            verify_slot(cs, scopes, slot, &message)
        })?;
        valid.push(v);
    }

    let valid_sum = scopes.scoped(cs, "threshold", |_| {
        let total = valid
            .iter()
            .fold(FpVar::zero(), |acc, v| acc + FpVar::from(v.clone()));
        total.enforce_equal(&valid_count)?;
        Ok(total)
    })?;

    Ok(CircuitVars {
        root: computed_root,
        valid,
        valid_sum,
    })
}

fn verify_slot(
    cs: &ConstraintSystemRef<BaseField>,
    scopes: &mut Scopes,
    slot: &SlotVars,
    message: &FpVar<BaseField>,
) -> Result<Boolean<BaseField>, SynthesisError> {
    let ignore = Boolean::new_witness(cs.clone(), || assigned(slot.ignore))?;
    let active = ignore.not();
    let gate = FpVar::from(active.clone());

    scopes.scoped(cs, "on_curve", |_| {
        enforce_gated_zero(&gate, &on_curve_residual(&slot.public_key)?)?;
        enforce_gated_zero(&gate, &on_curve_residual(&slot.r)?)
    })?;

    let public_key = mask(&slot.public_key, &active)?;
    let r = mask(&slot.r, &active)?;
    let s = active.select(&slot.s, &FpVar::zero())?;

    let key_is_identity = scopes.scoped(cs, "subgroup", |_| {
        enforce_gated_prime_order(&public_key, &gate)?;
        enforce_gated_prime_order(&r, &gate)?;
        // With A = O, R = G and s = 1 satisfy the equation for any challenge.
        let key_is_identity = public_key.is_eq(&EdwardsVar::zero())?;
        active
            .and(&key_is_identity)?
            .enforce_equal(&Boolean::constant(false))?;
        Ok(key_is_identity)
    })?;

    let e = scopes.scoped(cs, "challenge", |_| {
        hash(&[
            slot.r.x.clone(),
            slot.r.y.clone(),
            slot.public_key.x.clone(),
            slot.public_key.y.clone(),
            message.clone(),
        ])
    })?;

    scopes.scoped(cs, "equation", |_| {
        let e_bits = e.to_bits_le()?;
        let e_a = public_key.scalar_mul_le(e_bits.iter())?;
        let s_bits = to_bits_le_bounded(&s, SCALAR_BITS)?;
        let s_g = fixed_base_mul(&s_bits)?;
        let rhs = &r + &e_a;

        let dx = &s_g.x - &rhs.x;
        let dy = &s_g.y - &rhs.y;
        enforce_gated_zero(&gate, &dx)?;
        enforce_gated_zero(&gate, &dy)?;

        let holds = s_g.is_eq(&rhs)?;
        active.and(&key_is_identity.not())?.and(&holds)
    })
}
