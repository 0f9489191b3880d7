//! Strike grid around the at-the-money strike.

use crate::pricing::{PricingError, PricingResult};

/// Strike spacing of the index option chain.
pub const DEFAULT_STRIKE_GAP: f64 = 50.0;

/// Strikes evaluated on each side of the ATM strike.
pub const DEFAULT_STRIKES_EACH_SIDE: u32 = 10;

fn ensure_gap(gap: f64) -> PricingResult<()> {
    if gap.is_finite() && gap > 0.0 {
        Ok(())
    } else {
        Err(PricingError::invalid_input(format!(
            "strike gap must be positive, got {gap}"
        )))
    }
}

/// Rounds `spot` to the nearest multiple of `gap`.
///
/// Exact midpoints round away from zero.
pub fn atm_strike(spot: f64, gap: f64) -> PricingResult<f64> {
    ensure_gap(gap)?;
    if !(spot.is_finite() && spot > 0.0) {
        return Err(PricingError::invalid_input(format!(
            "spot must be positive, got {spot}"
        )));
    }
    Ok((spot / gap).round() * gap)
}

/// Returns `atm − n·gap, …, atm, …, atm + n·gap` in ascending order.
///
/// Non-positive strikes at the low end are dropped.
pub fn strike_range(atm: f64, strikes_each_side: u32, gap: f64) -> PricingResult<Vec<f64>> {
    ensure_gap(gap)?;
    let n = i64::from(strikes_each_side);
    Ok((-n..=n)
        .map(|i| atm + i as f64 * gap)
        .filter(|strike| *strike > 0.0)
        .collect())
}
