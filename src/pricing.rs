//! Price display in lakh / crore units.

use crate::taxonomy::{LAKH, LAKHS_PER_CRORE};

/// Format a rupee amount as lakhs below one crore and as crore from there
/// on, with one decimal only when the value is fractional.
///
/// `99_00_000` → `"99L"`, `1_00_00_000` → `"1Cr"`, `1_30_00_000` → `"1.3Cr"`.
pub fn format_rupees_as_lakhs_or_crore(rupees: u64) -> String {
    let lakhs = rupees as f64 / LAKH as f64;
    if lakhs >= LAKHS_PER_CRORE as f64 {
        let crore = lakhs / LAKHS_PER_CRORE as f64;
        if crore.fract() == 0.0 {
            format!("{crore:.0}Cr")
        } else {
            format!("{crore:.1}Cr")
        }
    } else if lakhs.fract() == 0.0 {
        format!("{lakhs:.0}L")
    } else {
        format!("{lakhs:.1}L")
    }
}

/// Format an optional price range for cards and detail pages.
pub fn format_price_range(min: Option<u64>, max: Option<u64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!(
            "₹ {} – ₹ {}",
            format_rupees_as_lakhs_or_crore(min),
            format_rupees_as_lakhs_or_crore(max)
        ),
        (Some(min), None) => format!("₹ {}+", format_rupees_as_lakhs_or_crore(min)),
        (None, Some(max)) => format!("Up to ₹ {}", format_rupees_as_lakhs_or_crore(max)),
        (None, None) => "Price on request".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lakh_crore_thresholds() {
        assert_eq!(format_rupees_as_lakhs_or_crore(99_00_000), "99L");
        assert_eq!(format_rupees_as_lakhs_or_crore(1_00_00_000), "1Cr");
        assert_eq!(format_rupees_as_lakhs_or_crore(1_30_00_000), "1.3Cr");
        assert_eq!(format_rupees_as_lakhs_or_crore(25_00_00_000), "25Cr");
    }

    #[test]
    fn test_fractional_lakhs() {
        assert_eq!(format_rupees_as_lakhs_or_crore(1_50_000), "1.5L");
        assert_eq!(format_rupees_as_lakhs_or_crore(50_000), "0.5L");
        assert_eq!(format_rupees_as_lakhs_or_crore(0), "0L");
    }

    #[test]
    fn test_range_shapes() {
        assert_eq!(
            format_price_range(Some(75_00_000), Some(95_00_000)),
            "₹ 75L – ₹ 95L"
        );
        assert_eq!(format_price_range(Some(1_20_00_000), None), "₹ 1.2Cr+");
        assert_eq!(format_price_range(None, Some(2_00_00_000)), "Up to ₹ 2Cr");
        assert_eq!(format_price_range(None, None), "Price on request");
    }

    #[test]
    fn test_formatting_is_repeatable() {
        let first = format_price_range(Some(80_00_000), Some(1_10_00_000));
        let second = format_price_range(Some(80_00_000), Some(1_10_00_000));
        assert_eq!(first, second);
    }
}
