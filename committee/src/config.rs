use serde::{Deserialize, Serialize};

use crate::error::{CommitteeError, CommitteeResult};

/// Depth used by the reference deployment: 64 validator slots.
pub const DEFAULT_DEPTH: usize = 6;

/// Largest supported accumulator depth.
pub const MAX_DEPTH: usize = 20;

/// Shape of a validator set. Capacity is always `2^depth`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitteeParams {
    pub depth: usize,
}

impl CommitteeParams {
    pub fn new(depth: usize) -> CommitteeResult<Self> {
        let params = Self { depth };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> CommitteeResult<()> {
        if self.depth == 0 || self.depth > MAX_DEPTH {
            return Err(CommitteeError::Configuration(format!(
                "depth must be in 1..={MAX_DEPTH}, got {}",
                self.depth
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        1usize << self.depth
    }
}

impl Default for CommitteeParams {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(CommitteeParams::default().capacity(), 64);
    }

    #[test]
    fn test_depth_bounds() {
        assert!(CommitteeParams::new(0).is_err());
        assert!(CommitteeParams::new(MAX_DEPTH + 1).is_err());
        assert_eq!(CommitteeParams::new(2).map(|p| p.capacity()).ok(), Some(4));
    }
}
