//! Fixed-point math utilities for deterministic scoring.
//!
//! Composition scores are ratios of integer stats. Ordering is decided
//! exactly with [`cmp_ratio`]; [`ratio`] gives a fixed-point value for
//! reporting only, since it rounds and saturates.

use std::cmp::Ordering;

use fixed::types::I32F32;

/// Fixed-point number type for all scoring math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Range: approximately -2,147,483,648 to 2,147,483,647
/// Precision: approximately 0.00000000023
pub type Fixed = I32F32;

/// Divide two integer stats in fixed point, for display.
///
/// Values above the integer range saturate. A zero denominator yields zero,
/// callers are expected to filter those out beforehand. Never compare
/// scores through this; use [`cmp_ratio`].
#[must_use]
pub fn ratio(numerator: u32, denominator: u32) -> Fixed {
    if denominator == 0 {
        return Fixed::ZERO;
    }
    Fixed::saturating_from_num(numerator) / Fixed::saturating_from_num(denominator)
}

/// Compare `a_num / a_den` with `b_num / b_den` exactly.
///
/// Cross-multiplies in `u64`, which cannot overflow for `u32` operands.
/// Denominators must be non-zero.
#[must_use]
pub fn cmp_ratio(a_num: u32, a_den: u32, b_num: u32, b_den: u32) -> Ordering {
    let lhs = u64::from(a_num) * u64::from(b_den);
    let rhs = u64::from(b_num) * u64::from(a_den);
    lhs.cmp(&rhs)
}
