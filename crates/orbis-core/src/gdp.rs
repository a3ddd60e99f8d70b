//! Synthetic GDP estimate: `population × multiplier ÷ exchange_rate`, with the
//! multiplier drawn uniformly from [`MULTIPLIER_RANGE`].

use std::ops::RangeInclusive;

use rand::Rng;

/// Inclusive bounds of the random multiplier.
pub const MULTIPLIER_RANGE: RangeInclusive<u32> = 1000..=1999;

/// Estimate GDP for a country.
///
/// Returns `0.0` when the population is zero or no usable rate is given.
/// The randomness source is injected so callers can seed it.
pub fn estimate<R>(population: u64, exchange_rate: Option<f64>, rng: &mut R) -> f64
where
  R: Rng + ?Sized,
{
  let rate = match exchange_rate {
    Some(rate) if rate.is_finite() && rate > 0.0 => rate,
    _ => return 0.0,
  };
  if population == 0 {
    return 0.0;
  }

  let multiplier = rng.gen_range(MULTIPLIER_RANGE);
  population as f64 * f64::from(multiplier) / rate
}
