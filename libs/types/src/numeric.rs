//! Fixed-point amounts in integer minor units
//!
//! All ledger and swap arithmetic is integer arithmetic on `Amount`.
//! `rust_decimal` is only used to render an amount in whole units.

use rust_decimal::Decimal;

/// Amount in an asset's minor units (e.g. 1 USDC = 1_000_000 at 6 decimals).
pub type Amount = u128;

/// Decimal places of the reference quote currency.
pub const DEFAULT_QUOTE_DECIMALS: u32 = 6;

/// Largest scale `Decimal` can represent.
pub const MAX_DISPLAY_DECIMALS: u32 = 28;

/// Render `amount` minor units as whole units with `decimals` places.
///
/// Returns `None` when the amount does not fit a `Decimal` mantissa or the
/// scale is above `MAX_DISPLAY_DECIMALS`.
pub fn to_display_units(amount: Amount, decimals: u32) -> Option<Decimal> {
    if decimals > MAX_DISPLAY_DECIMALS {
        return None;
    }
    let mantissa = i128::try_from(amount).ok()?;
    Decimal::try_from_i128_with_scale(mantissa, decimals).ok()
}

/// Scale a whole-unit count into minor units, checked.
pub fn from_whole_units(units: u128, decimals: u32) -> Option<Amount> {
    10u128.checked_pow(decimals)?.checked_mul(units)
}
