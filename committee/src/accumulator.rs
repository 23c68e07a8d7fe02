//! Full-disclosure commitment over an ordered list of public keys.
//!
//! Leaves are `H(A.x, A.y)`; each level pairs adjacent nodes with the 2-to-1
//! MiMC compression until one node remains. There are no inclusion proofs:
//! the verifier side always rebuilds the whole tree from every key.

use curve::{mimc_hash, Affine, BaseField, FieldEncoding, MimcCompression};
use p3_symmetric::PseudoCompressionFunction;
use tracing::debug;

use crate::error::{CommitteeError, CommitteeResult};

/// Leaf digest of one public key.
#[inline]
pub fn leaf(pk: &Affine) -> BaseField {
    mimc_hash(&[pk.x, pk.y])
}

/// Root over `keys`. The key count must be a non-zero power of two.
pub fn build_root(keys: &[Affine]) -> CommitteeResult<BaseField> {
    Ok(CommitmentTree::build(keys)?.root())
}

/// Publication format of a root: `0x` followed by 64 hex digits.
pub fn root_hex(root: &BaseField) -> String {
    root.to_hex()
}

/// Every level of the accumulator, leaves first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitmentTree {
    levels: Vec<Vec<BaseField>>,
    root: BaseField,
}

impl CommitmentTree {
    pub fn build(keys: &[Affine]) -> CommitteeResult<Self> {
        if keys.is_empty() || !keys.len().is_power_of_two() {
            return Err(CommitteeError::Configuration(format!(
                "key count must be a non-zero power of two, got {}",
                keys.len()
            )));
        }

        let leaves = hash_leaves(keys);
        let mut levels = vec![leaves];
        while levels[levels.len() - 1].len() > 1 {
            let next = fold_level(&levels[levels.len() - 1]);
            debug!(width = next.len(), "folded accumulator level");
            levels.push(next);
        }

        let root = levels[levels.len() - 1][0];
        Ok(Self { levels, root })
    }

    #[inline]
    pub fn root(&self) -> BaseField {
        self.root
    }

    /// Number of folding passes, `log2` of the leaf count.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn leaves(&self) -> &[BaseField] {
        &self.levels[0]
    }

    /// Level `i`, where 0 is the leaves and `depth()` holds only the root.
    pub fn level(&self, i: usize) -> Option<&[BaseField]> {
        self.levels.get(i).map(Vec::as_slice)
    }
}

#[cfg(feature = "parallel")]
fn hash_leaves(keys: &[Affine]) -> Vec<BaseField> {
    use rayon::prelude::*;
    keys.par_iter().map(leaf).collect()
}

#[cfg(not(feature = "parallel"))]
fn hash_leaves(keys: &[Affine]) -> Vec<BaseField> {
    keys.iter().map(leaf).collect()
}

#[cfg(feature = "parallel")]
fn fold_level(level: &[BaseField]) -> Vec<BaseField> {
    use rayon::prelude::*;
    level
        .par_chunks_exact(2)
        .map(|pair| MimcCompression.compress([pair[0], pair[1]]))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn fold_level(level: &[BaseField]) -> Vec<BaseField> {
    level
        .chunks_exact(2)
        .map(|pair| MimcCompression.compress([pair[0], pair[1]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve::{mul_generator, ScalarField};

    fn keys(n: u64) -> Vec<Affine> {
        (1..=n).map(|i| mul_generator(&ScalarField::from(i))).collect()
    }

    #[test]
    fn test_two_leaf_root() {
        let keys = keys(2);
        let expected = mimc_hash(&[leaf(&keys[0]), leaf(&keys[1])]);
        assert_eq!(build_root(&keys).expect("root"), expected);
    }

    #[test]
    fn test_four_leaf_root_by_hand() {
        let keys = keys(4);
        let l: Vec<BaseField> = keys.iter().map(leaf).collect();
        let left = mimc_hash(&[l[0], l[1]]);
        let right = mimc_hash(&[l[2], l[3]]);
        assert_eq!(build_root(&keys).expect("root"), mimc_hash(&[left, right]));
    }

    #[test]
    fn test_single_key_root_is_leaf() {
        let keys = keys(1);
        let tree = CommitmentTree::build(&keys).expect("tree");
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.root(), leaf(&keys[0]));
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        assert!(matches!(
            build_root(&keys(3)),
            Err(CommitteeError::Configuration(_))
        ));
        assert!(matches!(
            build_root(&[]),
            Err(CommitteeError::Configuration(_))
        ));
    }

    #[test]
    fn test_permutation_changes_root() {
        let keys = keys(4);
        let mut swapped = keys.clone();
        swapped.swap(1, 2);
        assert_ne!(
            build_root(&keys).expect("root"),
            build_root(&swapped).expect("root")
        );
    }

    #[test]
    fn test_levels_shape() {
        let tree = CommitmentTree::build(&keys(8)).expect("tree");
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaves().len(), 8);
        assert_eq!(tree.level(1).map(<[BaseField]>::len), Some(4));
        assert_eq!(tree.level(3), Some(&[tree.root()][..]));
        assert_eq!(tree.level(4), None);
    }

    #[test]
    fn test_root_hex_format() {
        let root = build_root(&keys(2)).expect("root");
        let hex = root_hex(&root);
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 66);
        assert_eq!(BaseField::from_hex(&hex), Some(root));
    }
}
