//! Human-readable GDP amounts.

/// Format `gdp` as dollars, scaled to trillions/billions/millions with two
/// decimals once it reaches that magnitude.
pub fn format_gdp(gdp: f64) -> String {
  const SCALES: [(f64, &str); 3] = [(1e12, "T"), (1e9, "B"), (1e6, "M")];

  for (scale, suffix) in SCALES {
    if gdp >= scale {
      return format!("${:.2}{suffix}", gdp / scale);
    }
  }
  format!("${gdp:.2}")
}

#[cfg(test)]
mod tests {
  use super::format_gdp;

  #[test]
  fn scales_by_magnitude() {
    assert_eq!(format_gdp(2.5e12), "$2.50T");
    assert_eq!(format_gdp(1e12), "$1.00T");
    assert_eq!(format_gdp(999_999_999_999.0), "$1000.00B");
    assert_eq!(format_gdp(3.456e9), "$3.46B");
    assert_eq!(format_gdp(7_250_000.0), "$7.25M");
  }

  #[test]
  fn small_amounts_are_raw() {
    assert_eq!(format_gdp(999_999.994), "$999999.99");
    assert_eq!(format_gdp(0.0), "$0.00");
  }
}
