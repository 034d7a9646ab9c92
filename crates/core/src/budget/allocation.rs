//! Splitting a salary across products.
//!
//! Shares are truncated to the currency unit first. The cents lost to
//! truncation are then handed back one at a time to the shares that lost the
//! most, so the split neither creates nor drops money.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Splits `amount` into one share per percentage, to `decimal_places`.
///
/// The shares always add up to the charged portion of the amount: the
/// rounded amount scaled by the sum of the percentages, rounded to the unit.
/// A full allocation (percentages summing to 100) therefore charges the whole
/// amount. A partial one charges only its part and leaves the rest
/// unassigned. An over-allocation charges more than the amount. Equal
/// truncation losses favor the earlier share.
///
/// ```
/// use rust_decimal_macros::dec;
/// use bursar_core::budget::split_by_percentages;
///
/// let full = split_by_percentages(dec!(100), &[dec!(33.33), dec!(33.33), dec!(33.34)], 2);
/// assert_eq!(full.iter().sum::<rust_decimal::Decimal>(), dec!(100));
///
/// let partial = split_by_percentages(dec!(41200), &[dec!(60), dec!(30)], 2);
/// assert_eq!(partial, vec![dec!(24720), dec!(12360)]);
/// ```
#[must_use]
pub fn split_by_percentages(
    amount: Decimal,
    percentages: &[Decimal],
    decimal_places: u32,
) -> Vec<Decimal> {
    let unit = Decimal::new(1, decimal_places);
    let amount = amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven);

    let exact: Vec<Decimal> = percentages
        .iter()
        .map(|pct| amount * *pct / Decimal::ONE_HUNDRED)
        .collect();
    let mut shares: Vec<Decimal> = exact
        .iter()
        .map(|share| share.round_dp_with_strategy(decimal_places, RoundingStrategy::ToZero))
        .collect();

    // Truncation loses less than one unit per share and rounding the charged
    // portion moves it by at most half a unit, so the gap is 0..=len units.
    let charged = exact
        .iter()
        .copied()
        .sum::<Decimal>()
        .round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven);
    let gap = charged - shares.iter().copied().sum::<Decimal>();
    let missing_units = (gap / unit).trunc().to_usize().unwrap_or(0);
    if missing_units == 0 {
        return shares;
    }

    let mut by_loss: Vec<usize> = (0..shares.len()).collect();
    by_loss.sort_by(|&a, &b| (exact[b] - shares[b]).cmp(&(exact[a] - shares[a])));
    for index in by_loss.into_iter().take(missing_units) {
        shares[index] += unit;
    }
    shares
}
