//! Runtime safety bounds for the in-memory vault engine.

use crate::{Result, VaultError};
use serde::{Deserialize, Serialize};

/// Safety bounds, not economic parameters:
/// - they prevent unbounded memory growth of the position book
/// - they cap the worst-case work of a single pro-rata sweep call
///
/// Deployments may size these to their expected fan base, but they MUST
/// remain bounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeBounds {
    pub max_owners: usize,
    pub max_positions_per_owner: usize,
    pub max_batch_owners: usize,
}

impl RuntimeBounds {
    pub const HARD_MAX_OWNERS: usize = 10_000_000;
    pub const HARD_MAX_POSITIONS_PER_OWNER: usize = 4_096;
    pub const HARD_MAX_BATCH_OWNERS: usize = 100_000;

    /// Default: sized for a large single-creator fan base.
    pub const DEFAULT_MAX_OWNERS: usize = 1_000_000;
    /// Default: typical per-fan mint fanout.
    pub const DEFAULT_MAX_POSITIONS_PER_OWNER: usize = 256;
    /// Default: bounded forced-burn sweep per call.
    pub const DEFAULT_MAX_BATCH_OWNERS: usize = 10_000;

    pub fn new(
        max_owners: usize,
        max_positions_per_owner: usize,
        max_batch_owners: usize,
    ) -> Result<Self> {
        let b = RuntimeBounds {
            max_owners,
            max_positions_per_owner,
            max_batch_owners,
        };
        b.validate()?;
        Ok(b)
    }

    pub fn validate(self) -> Result<()> {
        if self.max_owners == 0 || self.max_owners > Self::HARD_MAX_OWNERS {
            return Err(VaultError::InvalidConfig(format!(
                "max_owners out of bounds: {}",
                self.max_owners
            )));
        }
        if self.max_positions_per_owner == 0
            || self.max_positions_per_owner > Self::HARD_MAX_POSITIONS_PER_OWNER
        {
            return Err(VaultError::InvalidConfig(format!(
                "max_positions_per_owner out of bounds: {}",
                self.max_positions_per_owner
            )));
        }
        if self.max_batch_owners == 0 || self.max_batch_owners > Self::HARD_MAX_BATCH_OWNERS {
            return Err(VaultError::InvalidConfig(format!(
                "max_batch_owners out of bounds: {}",
                self.max_batch_owners
            )));
        }
        Ok(())
    }
}

impl Default for RuntimeBounds {
    fn default() -> Self {
        RuntimeBounds {
            max_owners: Self::DEFAULT_MAX_OWNERS,
            max_positions_per_owner: Self::DEFAULT_MAX_POSITIONS_PER_OWNER,
            max_batch_owners: Self::DEFAULT_MAX_BATCH_OWNERS,
        }
    }
}
