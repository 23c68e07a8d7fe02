//! Validator-set management for threshold Schnorr attestations.
//!
//! A validator set is a fixed-capacity (`2^depth`) ordered list of key
//! pairs: real validators plus padding slots that can never sign. The whole
//! list is committed to by a MiMC accumulator whose root is what a verifier
//! pins; the circuit rebuilds the same root from the disclosed keys.
//!
//! # Example
//!
//! ```
//! use committee::{CommitteeParams, ValidatorSet};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(5);
//! let params = CommitteeParams::new(2).expect("depth");
//! let set = ValidatorSet::generate(3, params, &mut rng).expect("generate");
//!
//! assert_eq!(set.capacity(), 4);
//! let root = set.root().expect("root");
//! println!("root = {}", committee::accumulator::root_hex(&root));
//! ```

pub mod accumulator;
mod config;
mod error;
mod keyset;

pub use accumulator::{build_root, leaf, root_hex, CommitmentTree};
pub use config::{CommitteeParams, DEFAULT_DEPTH, MAX_DEPTH};
pub use error::{CommitteeError, CommitteeResult};
pub use keyset::{KeyPair, ValidatorSet};
