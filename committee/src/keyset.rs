//! Fixed-capacity validator sets and their on-disk record format.

use std::collections::HashSet;
use std::io::{Read, Write};

use ark_ff::Zero;
use curve::{identity, is_identity, mul_generator, Affine, BaseField, FieldEncoding, ScalarField};
use rand::TryRngCore;
use schnorr::{SchnorrError, SigningKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::accumulator::{build_root, CommitmentTree};
use crate::config::CommitteeParams;
use crate::error::{CommitteeError, CommitteeResult};

/// One slot of a validator set.
///
/// A padding slot holds secret zero and the identity point `(0, 1)`; it
/// fills the set up to capacity and can never produce a signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    #[serde(with = "curve::serde_ark")]
    pub secret: ScalarField,
    #[serde(with = "curve::serde_ark")]
    pub public: Affine,
}

impl KeyPair {
    pub fn padding() -> Self {
        Self {
            secret: ScalarField::zero(),
            public: identity(),
        }
    }

    pub fn from_signing_key(sk: &SigningKey) -> Self {
        Self {
            secret: sk.scalar(),
            public: sk.verifying_key().point(),
        }
    }

    #[inline]
    pub fn is_padding(&self) -> bool {
        self.secret.is_zero()
    }

    /// The signing key of a real validator; `None` for padding.
    pub fn signing_key(&self) -> Option<SigningKey> {
        SigningKey::from_scalar(self.secret).ok()
    }
}

/// An ordered set of exactly `capacity` key pairs.
///
/// Real validators come first in generation order, followed by padding,
/// although any order is accepted when the entries are supplied directly.
/// The set is immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorSet {
    params: CommitteeParams,
    entries: Vec<KeyPair>,
}

impl ValidatorSet {
    /// Draw `n` fresh key pairs with secrets uniform in `[1, l - 1]`.
    pub fn generate_keys<R: TryRngCore>(n: usize, rng: &mut R) -> CommitteeResult<Vec<KeyPair>> {
        let mut keys = Vec::with_capacity(n);
        for _ in 0..n {
            let sk = SigningKey::try_random(&mut *rng).map_err(|e| match e {
                SchnorrError::Entropy(msg) => CommitteeError::Entropy(msg),
                other => CommitteeError::Configuration(other.to_string()),
            })?;
            keys.push(KeyPair::from_signing_key(&sk));
        }
        Ok(keys)
    }

    /// Fill `keys` up to the capacity of `params` with padding entries.
    pub fn pad(mut keys: Vec<KeyPair>, params: CommitteeParams) -> CommitteeResult<Self> {
        params.validate()?;
        let capacity = params.capacity();
        if keys.len() > capacity {
            return Err(CommitteeError::Configuration(format!(
                "{} keys exceed capacity {capacity}",
                keys.len()
            )));
        }
        keys.resize(capacity, KeyPair::padding());
        Self::from_entries(keys, params)
    }

    /// Generate `n` real validators and pad to capacity.
    pub fn generate<R: TryRngCore>(
        n: usize,
        params: CommitteeParams,
        rng: &mut R,
    ) -> CommitteeResult<Self> {
        params.validate()?;
        if n > params.capacity() {
            return Err(CommitteeError::Configuration(format!(
                "{n} validators exceed capacity {}",
                params.capacity()
            )));
        }
        let keys = Self::generate_keys(n, rng)?;
        let set = Self::pad(keys, params)?;
        info!(
            validators = n,
            capacity = set.capacity(),
            "generated validator set"
        );
        Ok(set)
    }

    /// Build a set from exactly `capacity` entries.
    ///
    /// Every real entry must satisfy `public = secret * G`, padding entries
    /// must be exactly `(0, (0, 1))`, and no public key may repeat.
    pub fn from_entries(entries: Vec<KeyPair>, params: CommitteeParams) -> CommitteeResult<Self> {
        params.validate()?;
        if entries.len() != params.capacity() {
            return Err(CommitteeError::Configuration(format!(
                "expected {} entries, got {}",
                params.capacity(),
                entries.len()
            )));
        }
        for (i, entry) in entries.iter().enumerate() {
            check_entry(i, entry).map_err(CommitteeError::Configuration)?;
        }
        check_duplicates(&entries).map_err(CommitteeError::Configuration)?;
        Ok(Self { params, entries })
    }

    #[inline]
    pub fn params(&self) -> CommitteeParams {
        self.params
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.params.depth
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Number of non-padding entries.
    pub fn active_len(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_padding()).count()
    }

    pub fn entries(&self) -> &[KeyPair] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&KeyPair> {
        self.entries.get(index)
    }

    /// Whether slot `index` is padding. Out-of-range slots report `None`.
    pub fn is_padding(&self, index: usize) -> Option<bool> {
        self.entries.get(index).map(KeyPair::is_padding)
    }

    pub fn public_keys(&self) -> Vec<Affine> {
        self.entries.iter().map(|e| e.public).collect()
    }

    pub fn commitment(&self) -> CommitteeResult<CommitmentTree> {
        CommitmentTree::build(&self.public_keys())
    }

    /// Commitment root over every slot, padding included.
    pub fn root(&self) -> CommitteeResult<BaseField> {
        build_root(&self.public_keys())
    }

    /// Write the set as a JSON document of radix-16 records.
    pub fn persist<W: Write>(&self, writer: W) -> CommitteeResult<()> {
        let document = KeySetDocument {
            depth: self.params.depth,
            keys: self.entries.iter().map(KeyRecord::from).collect(),
        };
        serde_json::to_writer_pretty(writer, &document)?;
        debug!(capacity = self.capacity(), "persisted validator set");
        Ok(())
    }

    /// Read a set written by [`ValidatorSet::persist`].
    ///
    /// The document must match `params` exactly and every record must be a
    /// consistent key pair; anything else is a serialization error.
    pub fn load<R: Read>(reader: R, params: CommitteeParams) -> CommitteeResult<Self> {
        params.validate()?;
        let document: KeySetDocument = serde_json::from_reader(reader)?;

        if document.depth != params.depth {
            warn!(
                expected = params.depth,
                found = document.depth,
                "validator set depth mismatch"
            );
            return Err(CommitteeError::Serialization(format!(
                "document depth {} does not match configured depth {}",
                document.depth, params.depth
            )));
        }
        if document.keys.len() != params.capacity() {
            warn!(
                expected = params.capacity(),
                found = document.keys.len(),
                "validator set size mismatch"
            );
            return Err(CommitteeError::Serialization(format!(
                "expected {} key records, found {}",
                params.capacity(),
                document.keys.len()
            )));
        }

        let mut entries = Vec::with_capacity(document.keys.len());
        for (i, record) in document.keys.iter().enumerate() {
            let entry = record.parse(i)?;
            if let Err(reason) = check_entry(i, &entry) {
                warn!(index = i, "inconsistent key record");
                return Err(CommitteeError::Serialization(reason));
            }
            entries.push(entry);
        }
        check_duplicates(&entries).map_err(CommitteeError::Serialization)?;

        let set = Self { params, entries };
        info!(
            validators = set.active_len(),
            capacity = set.capacity(),
            "loaded validator set"
        );
        Ok(set)
    }
}

fn check_entry(index: usize, entry: &KeyPair) -> Result<(), String> {
    if entry.is_padding() {
        if !is_identity(&entry.public) {
            return Err(format!("padding slot {index} must hold the identity point"));
        }
        return Ok(());
    }
    if !entry.public.is_on_curve() {
        return Err(format!("public key {index} is not on the curve"));
    }
    if mul_generator(&entry.secret) != entry.public {
        return Err(format!("public key {index} does not match its secret"));
    }
    Ok(())
}

fn check_duplicates(entries: &[KeyPair]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        if !entry.is_padding() && !seen.insert(entry.public) {
            return Err(format!("public key {i} repeats an earlier validator"));
        }
    }
    Ok(())
}

#[derive(Serialize, Deserialize)]
struct KeySetDocument {
    depth: usize,
    keys: Vec<KeyRecord>,
}

#[derive(Serialize, Deserialize)]
struct KeyRecord {
    secret: String,
    public_x: String,
    public_y: String,
}

impl From<&KeyPair> for KeyRecord {
    fn from(entry: &KeyPair) -> Self {
        Self {
            secret: entry.secret.to_hex(),
            public_x: entry.public.x.to_hex(),
            public_y: entry.public.y.to_hex(),
        }
    }
}

impl KeyRecord {
    fn parse(&self, index: usize) -> CommitteeResult<KeyPair> {
        let malformed = |field: &str| {
            CommitteeError::Serialization(format!("key {index}: malformed {field}"))
        };
        let secret = ScalarField::from_hex(&self.secret).ok_or_else(|| malformed("secret"))?;
        let x = BaseField::from_hex(&self.public_x).ok_or_else(|| malformed("public_x"))?;
        let y = BaseField::from_hex(&self.public_y).ok_or_else(|| malformed("public_y"))?;
        Ok(KeyPair {
            secret,
            public: Affine::new_unchecked(x, y),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(depth: usize) -> CommitteeParams {
        CommitteeParams::new(depth).expect("depth")
    }

    #[test]
    fn test_generate_pads_to_capacity() {
        let mut rng = StdRng::seed_from_u64(1);
        let set = ValidatorSet::generate(3, params(2), &mut rng).expect("generate");

        assert_eq!(set.capacity(), 4);
        assert_eq!(set.active_len(), 3);
        assert_eq!(set.is_padding(2), Some(false));
        assert_eq!(set.is_padding(3), Some(true));
        assert_eq!(set.is_padding(4), None);
        assert_eq!(set.entry(3), Some(&KeyPair::padding()));
        for entry in &set.entries()[..3] {
            assert!(curve::is_in_prime_subgroup(&entry.public));
            assert!(entry.signing_key().is_some());
        }
    }

    #[test]
    fn test_generate_over_capacity() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            ValidatorSet::generate(5, params(2), &mut rng),
            Err(CommitteeError::Configuration(_))
        ));
    }

    #[test]
    fn test_pad_over_capacity() {
        let mut rng = StdRng::seed_from_u64(1);
        let keys = ValidatorSet::generate_keys(3, &mut rng).expect("keys");
        assert!(matches!(
            ValidatorSet::pad(keys, params(1)),
            Err(CommitteeError::Configuration(_))
        ));
    }

    #[test]
    fn test_pad_zero_keys() {
        let set = ValidatorSet::pad(Vec::new(), params(1)).expect("pad");
        assert_eq!(set.active_len(), 0);
        assert!(set.entries().iter().all(KeyPair::is_padding));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut keys = ValidatorSet::generate_keys(2, &mut rng).expect("keys");
        keys[1] = keys[0];
        assert!(matches!(
            ValidatorSet::pad(keys, params(2)),
            Err(CommitteeError::Configuration(_))
        ));
    }

    #[test]
    fn test_mismatched_entry_rejected() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut keys = ValidatorSet::generate_keys(2, &mut rng).expect("keys");
        keys[0].public = keys[1].public;
        keys[1].public = curve::generator();
        assert!(matches!(
            ValidatorSet::pad(keys, params(1)),
            Err(CommitteeError::Configuration(_))
        ));
    }

    #[test]
    fn test_persist_load_round_trip() {
        let mut rng = StdRng::seed_from_u64(3);
        let set = ValidatorSet::generate(3, params(2), &mut rng).expect("generate");

        let mut buf = Vec::new();
        set.persist(&mut buf).expect("persist");
        let loaded = ValidatorSet::load(buf.as_slice(), params(2)).expect("load");

        assert_eq!(loaded, set);
        assert_eq!(loaded.root().expect("root"), set.root().expect("root"));
    }

    #[test]
    fn test_load_rejects_wrong_count() {
        let mut rng = StdRng::seed_from_u64(3);
        let set = ValidatorSet::generate(2, params(1), &mut rng).expect("generate");
        let mut buf = Vec::new();
        set.persist(&mut buf).expect("persist");

        // A depth-1 document read as depth 2.
        assert!(matches!(
            ValidatorSet::load(buf.as_slice(), params(2)),
            Err(CommitteeError::Serialization(_))
        ));

        let truncated = r#"{"depth": 1, "keys": []}"#;
        assert!(matches!(
            ValidatorSet::load(truncated.as_bytes(), params(1)),
            Err(CommitteeError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_rejects_malformed_hex() {
        let identity_y = BaseField::from(1u64).to_hex();
        let doc = format!(
            r#"{{"depth": 1, "keys": [
                {{"secret": "0xnothex", "public_x": "0x0", "public_y": "{identity_y}"}},
                {{"secret": "0x0", "public_x": "0x0", "public_y": "{identity_y}"}}
            ]}}"#
        );
        assert!(matches!(
            ValidatorSet::load(doc.as_bytes(), params(1)),
            Err(CommitteeError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_rejects_inconsistent_record() {
        let identity_y = BaseField::from(1u64).to_hex();
        let g = curve::generator();
        // Secret 2 paired with the generator itself.
        let doc = format!(
            r#"{{"depth": 1, "keys": [
                {{"secret": "0x2", "public_x": "{}", "public_y": "{}"}},
                {{"secret": "0x0", "public_x": "0x0", "public_y": "{identity_y}"}}
            ]}}"#,
            g.x.to_hex(),
            g.y.to_hex()
        );
        assert!(matches!(
            ValidatorSet::load(doc.as_bytes(), params(1)),
            Err(CommitteeError::Serialization(_))
        ));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        assert!(matches!(
            ValidatorSet::load("not json".as_bytes(), params(1)),
            Err(CommitteeError::Json(_))
        ));
    }

    #[test]
    fn test_root_depends_on_order() {
        let mut rng = StdRng::seed_from_u64(4);
        let keys = ValidatorSet::generate_keys(4, &mut rng).expect("keys");
        let mut reversed = keys.clone();
        reversed.reverse();

        let a = ValidatorSet::pad(keys, params(2)).expect("pad");
        let b = ValidatorSet::pad(reversed, params(2)).expect("pad");
        assert_ne!(a.root().expect("root"), b.root().expect("root"));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_failure_surfaces_as_json_error() {
        let mut rng = StdRng::seed_from_u64(4);
        let set = ValidatorSet::generate(1, params(1), &mut rng).expect("generate");
        assert!(matches!(
            set.persist(FailingWriter),
            Err(CommitteeError::Json(e)) if e.is_io()
        ));
    }
}
