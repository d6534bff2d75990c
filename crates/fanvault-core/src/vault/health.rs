//! Collateralization ratio ("health") evaluation.

use crate::Result;
use serde::{Deserialize, Serialize};

use super::math::{self, WAD};

/// Minimum collateralization ratio required after any mint or redeem
/// (1.5 in WAD).
pub const MIN_CR: u128 = 1_500_000_000_000_000_000;

/// Liquidation threshold: liquidation is permitted only while health is
/// strictly below this ratio (1.2 in WAD).
pub const LIQ_CR: u128 = 1_200_000_000_000_000_000;

/// Collateralization ratio in WAD, with an explicit infinity sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u128);

impl Health {
    /// An empty vault is maximally healthy by definition.
    pub const INFINITE: Health = Health(u128::MAX);

    pub fn new(v: u128) -> Health {
        Health(v)
    }

    pub fn get(self) -> u128 {
        self.0
    }

    pub fn is_infinite(self) -> bool {
        self.0 == u128::MAX
    }

    pub fn meets(self, threshold: u128) -> bool {
        self.0 >= threshold
    }

    pub fn below(self, threshold: u128) -> bool {
        self.0 < threshold
    }
}

/// `health = total_collateral / (total_supply * peg)`, all WAD.
///
/// Returns [`Health::INFINITE`] when `total_supply == 0`, and likewise when
/// the WAD liability `floor(total_supply * peg / WAD)` floors to zero (dust
/// supply at a tiny peg): the ratio is undefined there and the vault cannot
/// be undercollateralized by it.
pub fn evaluate(total_collateral: u128, total_supply: u128, peg: u128) -> Result<Health> {
    if total_supply == 0 {
        return Ok(Health::INFINITE);
    }
    let liability = math::mul_wad(total_supply, peg)?;
    if liability == 0 {
        return Ok(Health::INFINITE);
    }
    Ok(Health::new(math::mul_div_floor(
        total_collateral,
        WAD,
        liability,
    )?))
}
