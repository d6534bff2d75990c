//! Whole-state invariant checker.
//!
//! Intended for tests and debug assertions: sweeps the full position book,
//! so it is linear in the number of positions and not meant for the hot
//! path.

use std::fmt;

use super::engine::VaultEngine;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvariantId {
    /// `total_collateral == creator_collateral + fan_collateral`.
    CollateralSplitExact,
    /// `total_supply` equals the sum of live position quantities.
    SupplyMatchesPositions,
    /// `fan_collateral` equals the sum of live position collateral.
    FanCollateralMatchesPositions,
    /// A nonzero pending forced burn carries a nonzero deadline, and an
    /// idle contraction carries neither deadline nor cursor.
    ContractionStateCoherent,
    /// Fully consumed positions hold no residual collateral.
    DeadPositionsHaveNoCollateral,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvariantViolation {
    pub id: InvariantId,
    pub details: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invariant {:?} violated: {}", self.id, self.details)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(id: InvariantId, details: String) -> InvariantViolation {
    InvariantViolation { id, details }
}

/// Checks every structural invariant of `engine`, returning the first
/// violation found.
pub fn check(engine: &VaultEngine) -> Result<(), InvariantViolation> {
    let creator = engine.creator_collateral();
    let fan = engine.fan_collateral();
    let total = engine.total_collateral();
    let split = creator.checked_add(fan).ok_or_else(|| {
        violation(
            InvariantId::CollateralSplitExact,
            "creator + fan collateral overflows".into(),
        )
    })?;
    if split != total {
        return Err(violation(
            InvariantId::CollateralSplitExact,
            format!("creator {creator} + fan {fan} != total {total}"),
        ));
    }

    let book_qty = engine.book().total_qty().map_err(|e| {
        violation(
            InvariantId::SupplyMatchesPositions,
            format!("position qty sum overflows: {e}"),
        )
    })?;
    if book_qty != engine.total_supply() {
        return Err(violation(
            InvariantId::SupplyMatchesPositions,
            format!(
                "position qty sum {book_qty} != total_supply {}",
                engine.total_supply()
            ),
        ));
    }

    let book_collateral = engine.book().total_collateral().map_err(|e| {
        violation(
            InvariantId::FanCollateralMatchesPositions,
            format!("position collateral sum overflows: {e}"),
        )
    })?;
    if book_collateral != fan {
        return Err(violation(
            InvariantId::FanCollateralMatchesPositions,
            format!("position collateral sum {book_collateral} != fan_collateral {fan}"),
        ));
    }

    let pending = engine.pending_forced_burn();
    let deadline = engine.forced_burn_deadline();
    if pending > 0 && deadline == 0 {
        return Err(violation(
            InvariantId::ContractionStateCoherent,
            format!("pending {pending} with zero deadline"),
        ));
    }
    if pending == 0 && deadline != 0 {
        return Err(violation(
            InvariantId::ContractionStateCoherent,
            format!("idle contraction with deadline {deadline}"),
        ));
    }

    for owner in engine.book().owners() {
        for (i, p) in engine.book().positions_of(owner).iter().enumerate() {
            if !p.is_live() && p.collateral != 0 {
                return Err(violation(
                    InvariantId::DeadPositionsHaveNoCollateral,
                    format!(
                        "owner {owner} position {i} is dead but holds {}",
                        p.collateral
                    ),
                ));
            }
        }
    }

    Ok(())
}
