//! End-to-end run: validator set, witness, mock proof and on-chain calldata.
//!
//! `RUST_LOG=debug cargo run --example multi_schnorr -- 0xdeadbeef`

use circuit::{encode_message, MockBackend, MultiSchnorrWitness, OnChainProof, Prover};
use committee::{root_hex, CommitteeParams, ValidatorSet};
use rand::rng;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let message = std::env::args().nth(1).unwrap_or_else(|| "hello validators".to_string());
    let mut rng = rng();

    let params = CommitteeParams::new(2).expect("depth");
    let set = ValidatorSet::generate(3, params, &mut rng).expect("generate validators");

    let mut stored = Vec::new();
    set.persist(&mut stored).expect("persist validators");
    let set = ValidatorSet::load(stored.as_slice(), params).expect("load validators");
    let root = set.root().expect("root");
    println!("Root: {}", root_hex(&root));

    let start = Instant::now();
    let prover = Prover::new(MockBackend, params).expect("setup");
    println!("Setup: {:?}", start.elapsed());

    let signers = [0, 2];
    let witness = MultiSchnorrWitness::assemble(&set, &signers, encode_message(&message), &mut rng)
        .expect("assemble witness");
    println!("Off-circuit validity: {:?}", witness.verify_off_circuit());

    let start = Instant::now();
    let proof = prover.prove(&witness).expect("prove");
    println!("Prove: {:?}", start.elapsed());

    let publics = witness.public_inputs();
    let ok = prover.verify(&proof, &publics).expect("verify");
    println!("Verified: {ok}");

    let calldata = OnChainProof::from_proof(&proof, &publics)
        .expect("export")
        .with_message(&message);
    println!("{}", calldata.to_json().expect("json"));
}
