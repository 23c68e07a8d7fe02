use circuit::{
    compile, encode_message, CircuitError, ConstraintViolation, MockBackend, MultiSchnorrCircuit,
    MultiSchnorrWitness, OnChainProof, Prover, R1cs,
};
use committee::{build_root, CommitteeParams, ValidatorSet};
use ark_ec::CurveGroup;
use curve::{
    generator, identity, mul_generator, scalar_from_base, Affine, BaseField, FieldEncoding,
    ScalarField,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use schnorr::{challenge, Signature};

const SEED: u64 = 0x5eed;

fn fixture() -> (ValidatorSet, MultiSchnorrWitness) {
    let mut rng = StdRng::seed_from_u64(SEED);
    let params = CommitteeParams::new(2).expect("depth");
    let set = ValidatorSet::generate(3, params, &mut rng).expect("validators");
    let message = encode_message("0xdeadbeef");
    let witness =
        MultiSchnorrWitness::assemble(&set, &[0, 2], message, &mut rng).expect("witness");
    (set, witness)
}

fn circuit() -> MultiSchnorrCircuit {
    MultiSchnorrCircuit::new(CommitteeParams::new(2).expect("depth")).expect("circuit")
}

fn check(witness: &MultiSchnorrWitness) -> Result<(), ConstraintViolation> {
    let synthesis = circuit().synthesize(witness).expect("synthesize");
    synthesis.r1cs.is_satisfied(&synthesis.assignment)
}

#[test]
fn two_of_four_signers_satisfy() {
    let (set, witness) = fixture();
    let synthesis = circuit().synthesize(&witness).expect("synthesize");

    assert_eq!(synthesis.outputs.valid, vec![true, false, true, false]);
    assert_eq!(synthesis.outputs.valid_sum, BaseField::from(2u64));
    assert_eq!(synthesis.outputs.root, set.root().expect("root"));
    assert_eq!(synthesis.assignment.public, witness.public_inputs().to_vec());
    assert_eq!(synthesis.r1cs.is_satisfied(&synthesis.assignment), Ok(()));
    assert_eq!(witness.verify_off_circuit(), vec![true, false, true, false]);
}

#[test]
fn tampered_commitment_point_is_rejected() {
    let (_, mut witness) = fixture();
    witness.candidates[0].signature.r.x += BaseField::from(1u64);

    let synthesis = circuit().synthesize(&witness).expect("synthesize");
    match synthesis.r1cs.is_satisfied(&synthesis.assignment) {
        Err(ConstraintViolation::Unsatisfied { namespace, .. }) => {
            assert_eq!(namespace, "slot0/on_curve");
        }
        other => panic!("expected an unsatisfied constraint, got {other:?}"),
    }
    assert!(synthesis.outputs.valid[2]);
    assert_eq!(witness.verify_off_circuit(), vec![false, false, true, false]);
}

#[test]
fn padding_signer_is_rejected_at_assembly() {
    let (set, witness) = fixture();
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    let result = MultiSchnorrWitness::assemble(&set, &[0, 3], witness.message, &mut rng);
    assert!(matches!(result, Err(CircuitError::Index(_))));
}

#[test]
fn duplicate_and_out_of_range_signers_are_rejected() {
    let (set, witness) = fixture();
    let mut rng = StdRng::seed_from_u64(SEED + 2);
    for signers in [&[0, 0][..], &[4][..], &[0, 1, 2, 0, 1][..]] {
        let result = MultiSchnorrWitness::assemble(&set, signers, witness.message, &mut rng);
        assert!(matches!(result, Err(CircuitError::Index(_))), "{signers:?}");
    }
}

#[test]
fn compiled_system_is_witness_independent() {
    let (_, witness) = fixture();
    let compiled = compile(CommitteeParams::new(2).expect("depth")).expect("compile");
    let synthesized = circuit().synthesize(&witness).expect("synthesize").r1cs;
    assert_eq!(compiled, synthesized);

    let mut tampered = witness.clone();
    tampered.candidates[0].signature.r.x += BaseField::from(1u64);
    let from_tampered = circuit().synthesize(&tampered).expect("synthesize").r1cs;
    assert_eq!(compiled, from_tampered);
}

#[test]
fn ignored_slot_with_garbage_is_accepted() {
    let (_, mut witness) = fixture();
    let garbage = Affine::new_unchecked(BaseField::from(123u64), BaseField::from(456u64));
    witness.candidates[1].signature = Signature {
        r: garbage,
        s: ScalarField::from(789u64),
    };
    witness.candidates[3].public_key =
        Affine::new_unchecked(BaseField::from(7u64), BaseField::from(9u64));
    let keys: Vec<Affine> = witness.candidates.iter().map(|c| c.public_key).collect();
    witness.root = build_root(&keys).expect("root");

    assert_eq!(check(&witness), Ok(()));
    assert_eq!(witness.verify_off_circuit(), vec![true, false, true, false]);
}

#[test]
fn wrong_count_is_rejected() {
    let (_, mut witness) = fixture();
    witness.valid_count = 3;
    match check(&witness) {
        Err(ConstraintViolation::Unsatisfied { namespace, .. }) => {
            assert_eq!(namespace, "threshold");
        }
        other => panic!("expected an unsatisfied constraint, got {other:?}"),
    }
}

#[test]
fn wrong_root_is_rejected() {
    let (_, mut witness) = fixture();
    witness.root += BaseField::from(1u64);
    match check(&witness) {
        Err(ConstraintViolation::Unsatisfied { namespace, .. }) => {
            assert_eq!(namespace, "commitment");
        }
        other => panic!("expected an unsatisfied constraint, got {other:?}"),
    }
}

#[test]
fn forged_response_fails_the_equation() {
    let (_, mut witness) = fixture();
    witness.candidates[2].signature.s += ScalarField::from(1u64);
    match check(&witness) {
        Err(ConstraintViolation::Unsatisfied { namespace, .. }) => {
            assert_eq!(namespace, "slot2/equation");
        }
        other => panic!("expected an unsatisfied constraint, got {other:?}"),
    }
    let synthesis = circuit().synthesize(&witness).expect("synthesize");
    assert!(!synthesis.outputs.valid[2]);
    assert_eq!(witness.verify_off_circuit(), vec![true, false, false, false]);
}

#[test]
fn active_padding_slot_is_rejected() {
    // The padding key is the identity, so R = G, s = 1 satisfies the equation.
    let (_, mut witness) = fixture();
    witness.candidates[3].ignore = false;
    witness.candidates[3].signature = Signature {
        r: generator(),
        s: ScalarField::from(1u64),
    };
    witness.valid_count = 3;

    let synthesis = circuit().synthesize(&witness).expect("synthesize");
    assert!(!synthesis.outputs.valid[3]);
    assert_eq!(synthesis.outputs.valid_sum, BaseField::from(2u64));
    match synthesis.r1cs.is_satisfied(&synthesis.assignment) {
        Err(ConstraintViolation::Unsatisfied { namespace, .. }) => {
            assert_eq!(namespace, "slot3/subgroup");
        }
        other => panic!("expected an unsatisfied constraint, got {other:?}"),
    }
    assert_eq!(witness.verify_off_circuit(), vec![true, false, true, false]);

    witness.valid_count = 2;
    assert!(matches!(
        check(&witness),
        Err(ConstraintViolation::Unsatisfied { namespace, .. }) if namespace == "slot3/subgroup"
    ));
}

#[test]
fn ignored_signer_does_not_count() {
    let (_, mut witness) = fixture();
    witness.candidates[2].ignore = true;

    let synthesis = circuit().synthesize(&witness).expect("synthesize");
    assert_eq!(synthesis.outputs.valid, vec![true, false, false, false]);
    assert_eq!(synthesis.outputs.valid_sum, BaseField::from(1u64));
    match synthesis.r1cs.is_satisfied(&synthesis.assignment) {
        Err(ConstraintViolation::Unsatisfied { namespace, .. }) => {
            assert_eq!(namespace, "threshold");
        }
        other => panic!("expected an unsatisfied constraint, got {other:?}"),
    }

    witness.valid_count = 1;
    assert_eq!(check(&witness), Ok(()));
    assert_eq!(witness.verify_off_circuit(), vec![true, false, false, false]);
}

#[test]
fn full_committee_two_signers_satisfy() {
    let mut rng = StdRng::seed_from_u64(SEED + 3);
    let params = CommitteeParams::new(2).expect("depth");
    let set = ValidatorSet::generate(4, params, &mut rng).expect("validators");
    assert!((0..4).all(|i| set.is_padding(i) == Some(false)));

    let message = encode_message("0xdeadbeef");
    let witness =
        MultiSchnorrWitness::assemble(&set, &[0, 2], message, &mut rng).expect("witness");
    assert!(witness.candidates.iter().all(|c| c.public_key != identity()));

    let synthesis = circuit().synthesize(&witness).expect("synthesize");
    assert_eq!(synthesis.outputs.valid, vec![true, false, true, false]);
    assert_eq!(synthesis.outputs.valid_sum, BaseField::from(2u64));
    assert_eq!(synthesis.outputs.root, set.root().expect("root"));
    assert_eq!(synthesis.r1cs.is_satisfied(&synthesis.assignment), Ok(()));
}

#[test]
fn identity_commitment_is_accepted() {
    // R = O verifies when s = e * sk.
    let (set, mut witness) = fixture();
    let secret = set.entry(0).expect("entry").secret;
    let pk = witness.candidates[0].public_key;
    let e = scalar_from_base(&challenge(&identity(), &pk, witness.message));
    witness.candidates[0].signature = Signature {
        r: identity(),
        s: e * secret,
    };
    assert_eq!(
        mul_generator(&witness.candidates[0].signature.s),
        (pk * e).into_affine()
    );

    assert_eq!(witness.verify_off_circuit(), vec![true, false, true, false]);
    assert_eq!(check(&witness), Ok(()));
}

#[test]
fn mock_prover_round_trip_and_export() {
    let (_, witness) = fixture();
    let prover = Prover::new(MockBackend, CommitteeParams::new(2).expect("depth")).expect("setup");
    let publics = witness.public_inputs();
    let proof = prover.prove(&witness).expect("prove");
    assert!(prover.verify(&proof, &publics).expect("verify"));

    let mut other = publics;
    other.valid_count = BaseField::from(3u64);
    assert!(!prover.verify(&proof, &other).expect("verify"));

    let calldata = OnChainProof::from_proof(&proof, &publics)
        .expect("export")
        .with_message("0xdeadbeef");
    assert_eq!(calldata.inputs[0], publics.root.to_hex());
    assert_eq!(calldata.message_hex.as_deref(), Some("0xdeadbeef"));
}

#[test]
fn mock_prover_refuses_forgery() {
    let (_, mut witness) = fixture();
    witness.candidates[0].signature.s += ScalarField::from(1u64);
    let prover = Prover::new(MockBackend, CommitteeParams::new(2).expect("depth")).expect("setup");
    assert!(matches!(
        prover.prove(&witness),
        Err(CircuitError::Unsatisfied(_))
    ));
}

#[test]
fn compiled_system_round_trips_through_bytes() {
    let r1cs = compile(CommitteeParams::new(1).expect("depth")).expect("compile");
    let bytes = r1cs.to_bytes().expect("encode");
    assert_eq!(R1cs::from_bytes(&bytes).expect("decode"), r1cs);
}
