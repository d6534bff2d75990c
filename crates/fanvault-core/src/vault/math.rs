//! Checked WAD fixed-point arithmetic.
//!
//! All amounts and prices in this crate are `u128` values scaled by 1e18
//! ("WAD"). Products of two WAD-scale values need up to 256 bits, so
//! `mul_div_floor` widens through a `(hi, lo)` pair of `u128` limbs and
//! divides with a shift-subtract loop. Division always floors; rounding
//! consistently favors the vault over the holder.

use crate::{Result, VaultError};

/// 1e18 fixed-point unit.
pub const WAD: u128 = 1_000_000_000_000_000_000;

pub fn add(a: u128, b: u128) -> Result<u128> {
    a.checked_add(b).ok_or(VaultError::Overflow)
}

pub fn sub(a: u128, b: u128) -> Result<u128> {
    a.checked_sub(b).ok_or(VaultError::Underflow)
}

/// Exact `floor(a * b / denom)` over the full `u128` range.
///
/// Errors:
/// - `DivisionByZero` when `denom == 0` (fatal input error).
/// - `Overflow` when the true quotient does not fit in `u128`.
pub fn mul_div_floor(a: u128, b: u128, denom: u128) -> Result<u128> {
    if denom == 0 {
        return Err(VaultError::DivisionByZero);
    }
    let (hi, lo) = mul_wide(a, b);
    if hi >= denom {
        return Err(VaultError::Overflow);
    }
    Ok(div_wide(hi, lo, denom))
}

/// `floor(a * b / WAD)`.
pub fn mul_wad(a: u128, b: u128) -> Result<u128> {
    mul_div_floor(a, b, WAD)
}

/// `floor(a * WAD / b)`.
pub fn div_wad(a: u128, b: u128) -> Result<u128> {
    mul_div_floor(a, WAD, b)
}

/// Full 256-bit product of two `u128` values as `(hi, lo)` limbs.
fn mul_wide(a: u128, b: u128) -> (u128, u128) {
    const LO: u128 = (1u128 << 64) - 1;

    let a_lo = a & LO;
    let a_hi = a >> 64;
    let b_lo = b & LO;
    let b_hi = b >> 64;

    let p0 = a_lo * b_lo;
    let p1 = a_lo * b_hi;
    let p2 = a_hi * b_lo;
    let p3 = a_hi * b_hi;

    // Carry chains kept below 2^128 at every step.
    let mid1 = p1 + (p0 >> 64);
    let mid2 = p2 + (mid1 & LO);

    let lo = ((mid2 & LO) << 64) | (p0 & LO);
    let hi = p3 + (mid1 >> 64) + (mid2 >> 64);
    (hi, lo)
}

/// `floor((hi * 2^128 + lo) / d)` for `hi < d`.
///
/// Shift-subtract over the 128 low bits; the running remainder stays below
/// `d`, so a carry out of bit 127 always forces a subtraction (wrapping sub
/// is exact mod 2^128 there).
fn div_wide(hi: u128, lo: u128, d: u128) -> u128 {
    debug_assert!(hi < d);
    let mut rem = hi;
    let mut quot: u128 = 0;
    for i in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> i) & 1);
        if carry == 1 || rem >= d {
            rem = rem.wrapping_sub(d);
            quot |= 1 << i;
        }
    }
    quot
}
