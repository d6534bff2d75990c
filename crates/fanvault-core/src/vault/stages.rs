//! Stage schedule: creator-stake-gated tiers of mint capacity.

use crate::{Result, VaultError};
use serde::{Deserialize, Serialize};

/// One tier of the schedule: cumulative creator stake required to unlock
/// this stage and the cumulative token mint cap it permits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    pub required_stake: u128,
    pub mint_cap: u128,
}

/// Per-vault stage schedule, validated once at creation and trusted by the
/// engine afterwards.
///
/// Preconditions (enforced):
/// - stage 0 requires nothing and permits nothing
/// - at least one unlockable stage exists (otherwise the vault could never
///   mint)
/// - both columns are strictly increasing from stage 1 on
/// - at most 256 stages (stage numbers fit in `u8`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSchedule(Vec<StageConfig>);

impl StageSchedule {
    pub const MAX_STAGES: usize = 256;

    pub fn new(tiers: Vec<StageConfig>) -> Result<StageSchedule> {
        if tiers.len() < 2 {
            return Err(VaultError::InvalidConfig(
                "schedule needs stage 0 plus at least one unlockable stage".into(),
            ));
        }
        if tiers.len() > Self::MAX_STAGES {
            return Err(VaultError::InvalidConfig(format!(
                "schedule has {} stages, max {}",
                tiers.len(),
                Self::MAX_STAGES
            )));
        }
        if tiers[0] != (StageConfig { required_stake: 0, mint_cap: 0 }) {
            return Err(VaultError::InvalidConfig(
                "stage 0 must require nothing and permit nothing".into(),
            ));
        }
        for (i, pair) in tiers.windows(2).enumerate() {
            if pair[1].required_stake <= pair[0].required_stake {
                return Err(VaultError::InvalidConfig(format!(
                    "stage {} required_stake must exceed stage {}",
                    i + 1,
                    i
                )));
            }
            if pair[1].mint_cap <= pair[0].mint_cap {
                return Err(VaultError::InvalidConfig(format!(
                    "stage {} mint_cap must exceed stage {}",
                    i + 1,
                    i
                )));
            }
        }
        Ok(StageSchedule(tiers))
    }

    /// Highest configured stage number.
    pub fn highest_stage(&self) -> u8 {
        (self.0.len() - 1) as u8
    }

    pub fn config(&self, stage: u8) -> Option<&StageConfig> {
        self.0.get(stage as usize)
    }

    /// Cumulative mint cap of the given stage; stage 0 permits nothing.
    pub fn mint_cap(&self, stage: u8) -> u128 {
        self.config(stage).map(|c| c.mint_cap).unwrap_or(0)
    }

    /// Cumulative creator stake required to hold the given stage.
    pub fn required_stake(&self, stage: u8) -> u128 {
        self.config(stage).map(|c| c.required_stake).unwrap_or(u128::MAX)
    }
}
