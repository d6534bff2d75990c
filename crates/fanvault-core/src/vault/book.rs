//! The position ledger: per-depositor minting positions.
//!
//! Positions belonging to one owner form an append-only sequence (FIFO =
//! mint order). A zero-qty position is logically dead but its array slot is
//! never compacted, preserving ordering and index stability. A separate
//! append-only list of distinct owners gives pro-rata operations a stable
//! cross-owner iteration order.
//!
//! Every mutating operation here builds its full plan fallibly before
//! touching a position, so an arithmetic error leaves the book unchanged.

use std::collections::BTreeMap;

use crate::{AccountId, Result, Timestamp, VaultError};
use serde::{Deserialize, Serialize};

use super::bounds::RuntimeBounds;
use super::math;

/// A single mint's token quantity and backing collateral.
///
/// `qty` and `collateral` only ever shrink, and only proportionally: any
/// burn that removes a fraction of `qty` removes the same (floored)
/// fraction of `collateral`, so both reach zero together.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub owner: AccountId,
    pub qty: u128,
    pub collateral: u128,
    pub stage: u8,
    pub minted_at: Timestamp,
}

impl Position {
    pub fn is_live(&self) -> bool {
        self.qty > 0
    }
}

/// Result of a FIFO consumption across one owner's positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FifoOutcome {
    pub consumed: u128,
    pub collateral_out: u128,
}

/// Result of a pro-rata burn sweep.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BurnOutcome {
    pub tokens_burned: u128,
    pub collateral_written_off: u128,
    /// Aggregate tokens burned per owner, for the external token ledger.
    pub per_owner: Vec<(AccountId, u128)>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PositionBook {
    /// Distinct owners in first-mint order; never shrinks.
    owners: Vec<AccountId>,
    positions: BTreeMap<AccountId, Vec<Position>>,
}

impl PositionBook {
    pub fn owners(&self) -> &[AccountId] {
        &self.owners
    }

    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    pub fn positions_of(&self, owner: &AccountId) -> &[Position] {
        self.positions.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether appending a position for `owner` would stay within bounds.
    /// Lets the engine validate before any external interaction.
    pub fn can_append(&self, owner: &AccountId, bounds: &RuntimeBounds) -> Result<()> {
        match self.positions.get(owner) {
            None => {
                if self.owners.len() >= bounds.max_owners {
                    return Err(VaultError::BoundExceeded(format!(
                        "max owners {} reached",
                        bounds.max_owners
                    )));
                }
            }
            Some(list) => {
                if list.len() >= bounds.max_positions_per_owner {
                    return Err(VaultError::BoundExceeded(format!(
                        "max positions per owner {} reached",
                        bounds.max_positions_per_owner
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn append(&mut self, position: Position, bounds: &RuntimeBounds) -> Result<()> {
        self.can_append(&position.owner, bounds)?;
        let entry = self.positions.entry(position.owner).or_default();
        if entry.is_empty() && !self.owners.contains(&position.owner) {
            self.owners.push(position.owner);
        }
        entry.push(position);
        Ok(())
    }

    /// Live token holdings of one owner across all their positions.
    pub fn live_qty_of(&self, owner: &AccountId) -> Result<u128> {
        let mut total: u128 = 0;
        for p in self.positions_of(owner) {
            total = math::add(total, p.qty)?;
        }
        Ok(total)
    }

    /// Consumes `qty` tokens from `owner`'s positions oldest-first,
    /// returning each position's floored proportional collateral share.
    ///
    /// Validates the owner holds `qty` live tokens before mutating anything.
    pub fn consume_fifo(&mut self, owner: &AccountId, qty: u128) -> Result<FifoOutcome> {
        let held = self.live_qty_of(owner)?;
        if held < qty {
            return Err(VaultError::InsufficientHoldings {
                requested: qty,
                held,
            });
        }

        // Plan first: (index, consume, collateral share).
        let list = self.positions_of(owner);
        let mut plan: Vec<(usize, u128, u128)> = Vec::new();
        let mut remaining = qty;
        for (i, p) in list.iter().enumerate() {
            if remaining == 0 {
                break;
            }
            if !p.is_live() {
                continue;
            }
            let consume = p.qty.min(remaining);
            let share = math::mul_div_floor(p.collateral, consume, p.qty)?;
            plan.push((i, consume, share));
            remaining = math::sub(remaining, consume)?;
        }
        debug_assert_eq!(remaining, 0);

        // Commit.
        let mut collateral_out: u128 = 0;
        let list = self
            .positions
            .get_mut(owner)
            .ok_or(VaultError::InsufficientHoldings { requested: qty, held: 0 })?;
        for (i, consume, share) in plan {
            let p = &mut list[i];
            p.qty -= consume;
            p.collateral -= share;
            collateral_out += share;
        }
        Ok(FifoOutcome {
            consumed: qty,
            collateral_out,
        })
    }

    /// Pro-rata burn across the owners in `owner_range` (indices into the
    /// stable owner list): each live position burns
    /// `floor(qty * burn_total / denominator)` tokens and writes down the
    /// matching floored collateral share.
    ///
    /// Caller guarantees `burn_total <= denominator` (the burn is a fraction
    /// of outstanding supply), so no position can over-burn.
    pub fn burn_pro_rata_range(
        &mut self,
        owner_range: std::ops::Range<usize>,
        burn_total: u128,
        denominator: u128,
    ) -> Result<BurnOutcome> {
        if denominator == 0 {
            return Err(VaultError::DivisionByZero);
        }
        debug_assert!(burn_total <= denominator);

        // Plan: (owner, index, burn, haircut).
        let mut plan: Vec<(AccountId, usize, u128, u128)> = Vec::new();
        for owner in &self.owners[owner_range] {
            for (i, p) in self.positions_of(owner).iter().enumerate() {
                if !p.is_live() {
                    continue;
                }
                let burn = math::mul_div_floor(p.qty, burn_total, denominator)?;
                if burn == 0 {
                    continue;
                }
                let haircut = math::mul_div_floor(p.collateral, burn, p.qty)?;
                plan.push((*owner, i, burn, haircut));
            }
        }

        // Commit.
        let mut tokens_burned: u128 = 0;
        let mut collateral_written_off: u128 = 0;
        let mut per_owner: Vec<(AccountId, u128)> = Vec::new();
        for (owner, i, burn, haircut) in plan {
            let p = &mut self
                .positions
                .get_mut(&owner)
                .ok_or(VaultError::External("owner vanished from book".into()))?[i];
            p.qty -= burn;
            p.collateral -= haircut;
            tokens_burned += burn;
            collateral_written_off += haircut;
            match per_owner.last_mut() {
                Some((o, total)) if *o == owner => *total += burn,
                _ => per_owner.push((owner, burn)),
            }
        }
        Ok(BurnOutcome {
            tokens_burned,
            collateral_written_off,
            per_owner,
        })
    }

    /// Pro-rata burn across every owner.
    pub fn burn_pro_rata(&mut self, burn_total: u128, denominator: u128) -> Result<BurnOutcome> {
        self.burn_pro_rata_range(0..self.owners.len(), burn_total, denominator)
    }

    /// Exact sum of live position quantities. Used by the invariant checker,
    /// never by the engine's incremental accounting.
    pub fn total_qty(&self) -> Result<u128> {
        let mut total: u128 = 0;
        for list in self.positions.values() {
            for p in list {
                total = math::add(total, p.qty)?;
            }
        }
        Ok(total)
    }

    /// Exact sum of live position collateral.
    pub fn total_collateral(&self) -> Result<u128> {
        let mut total: u128 = 0;
        for list in self.positions.values() {
            for p in list {
                total = math::add(total, p.collateral)?;
            }
        }
        Ok(total)
    }
}
