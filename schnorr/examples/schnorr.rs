use curve::keccak_to_field;
use rand::SeedableRng;
use rand::rngs::StdRng;
use schnorr::{SigningKey, VerifyingKey};

fn main() {
    let mut rng = StdRng::seed_from_u64(42);
    let sk = SigningKey::random(&mut rng);
    let vk = VerifyingKey::from(&sk);

    let sk_bytes = bincode::serialize(&sk).expect("serialize sk");
    let vk_bytes = bincode::serialize(&vk).expect("serialize vk");

    let msg = keccak_to_field(b"hello schnorr");

    let sig = sk.sign(&mut rng, msg).expect("sign");
    let sig_bytes = bincode::serialize(&sig).expect("serialize sig");

    let sk2: SigningKey = bincode::deserialize(&sk_bytes).expect("deserialize sk");
    let vk2: VerifyingKey = bincode::deserialize(&vk_bytes).expect("deserialize vk");
    let sig2 = bincode::deserialize(&sig_bytes).expect("deserialize sig");

    let ok = vk2.verify(msg, &sig2).expect("verify");
    assert!(ok);
    assert_eq!(sk2.verifying_key(), vk);

    println!("signature: 0x{}", hex_string(&sig.to_bytes()));
}

fn hex_string(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
