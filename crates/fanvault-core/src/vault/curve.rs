//! Peg and supply-cap calculator.
//!
//! Pure, stateless maps from a live aura reading to a token price and to a
//! maximum mintable supply. Aura is conceptually bounded to [0, 200] but is
//! never input-validated: out-of-range readings still compute and clamp.
//! Both curves are linear with signed intermediates (aura below the
//! reference point produces a negative delta) and clamp after, never
//! re-normalizing.

use crate::{Result, VaultError};

use super::math::{self, WAD};

/// Reference aura: the score at which peg and cap sit at their base values.
pub const A_REF: u64 = 100;

/// Base token price at `A_REF`, in WAD base-asset units.
pub const BASE_PRICE: u128 = WAD;

/// Peg sensitivity per unit of relative aura deviation (0.85 in WAD).
pub const PEG_K: u128 = 850_000_000_000_000_000;

/// Peg clamp floor (0.3 in WAD).
pub const PEG_MIN: u128 = 300_000_000_000_000_000;

/// Peg clamp ceiling (3.0 in WAD).
pub const PEG_MAX: u128 = 3 * WAD;

/// Supply-cap sensitivity per unit of relative aura deviation (0.75 in WAD).
pub const CAP_K: u128 = 750_000_000_000_000_000;

/// Current token price in WAD base-asset units.
///
/// `peg(a) = clamp(BASE_PRICE + PEG_K * (a - A_REF) / A_REF, PEG_MIN, PEG_MAX)`
///
/// Monotone non-decreasing in `a`; `peg(0)` clamps up to `PEG_MIN`,
/// `peg(A_REF) == BASE_PRICE`, `peg(200) == 1.85 * WAD` (unclamped).
pub fn peg(aura: u64) -> u128 {
    // PEG_K * |a - A_REF| stays far below i128::MAX even for aura = u64::MAX.
    let delta = (PEG_K as i128) * (aura as i128 - A_REF as i128) / (A_REF as i128);
    let raw = BASE_PRICE as i128 + delta;
    if raw < PEG_MIN as i128 {
        PEG_MIN
    } else if raw > PEG_MAX as i128 {
        PEG_MAX
    } else {
        raw as u128
    }
}

/// Maximum mintable supply for the given aura, in WAD token units.
///
/// `supply_cap(a, c) = clamp(c + c * CAP_K * (a - A_REF) / (A_REF * WAD), c/4, c*4)`
///
/// The deviation term floors through a 256-bit intermediate so arbitrarily
/// large base caps stay exact. Errors only on arithmetic overflow of the
/// `base_cap * 4` ceiling or the unclamped upward branch.
pub fn supply_cap(aura: u64, base_cap: u128) -> Result<u128> {
    let floor = base_cap / 4;
    let ceiling = base_cap.checked_mul(4).ok_or(VaultError::Overflow)?;

    let deviation = aura.abs_diff(A_REF) as u128;
    // CAP_K * deviation <= 0.75e18 * u64::MAX < u128::MAX.
    let shift = math::mul_div_floor(base_cap, CAP_K * deviation, A_REF as u128 * WAD)?;

    let raw = if aura >= A_REF {
        math::add(base_cap, shift)?
    } else {
        base_cap.saturating_sub(shift)
    };
    Ok(raw.clamp(floor, ceiling))
}
