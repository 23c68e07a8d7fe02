use circuit::{encode_message, MultiSchnorrCircuit, MultiSchnorrWitness};
use committee::{CommitteeParams, ValidatorSet};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_synthesis(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(11);
    let params = CommitteeParams::new(2).expect("depth");
    let set = ValidatorSet::generate(4, params, &mut rng).expect("validators");
    let witness = MultiSchnorrWitness::assemble(&set, &[0, 1, 2], encode_message("bench"), &mut rng)
        .expect("witness");
    let circuit = MultiSchnorrCircuit::new(params).expect("circuit");

    let mut group = c.benchmark_group("multi_schnorr");
    group.sample_size(10);

    group.bench_function("synthesize_capacity_4", |b| {
        b.iter(|| circuit.synthesize(black_box(&witness)).expect("synthesize"))
    });

    let synthesis = circuit.synthesize(&witness).expect("synthesize");
    group.bench_function("is_satisfied_capacity_4", |b| {
        b.iter(|| synthesis.r1cs.is_satisfied(black_box(&synthesis.assignment)))
    });

    group.bench_function("assemble_capacity_4", |b| {
        b.iter(|| {
            MultiSchnorrWitness::assemble(&set, black_box(&[0usize, 1, 2][..]), encode_message("bench"), &mut rng)
                .expect("witness")
        })
    });

    group.finish();
}

criterion_group!(benches, bench_synthesis);
criterion_main!(benches);
