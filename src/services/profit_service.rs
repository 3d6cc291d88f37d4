use super::holdings_service::Holding;

/// Totals over an inclusive range of holdings.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSummary {
    /// Normalised bounds, `from <= to`.
    pub from: usize,
    pub to: usize,
    pub first: Holding,
    pub last: Holding,
    pub total_profit: f64,
    /// Sum of the per-token PnL ratios, as a percentage.
    pub total_pnl_percent: f64,
}

/// Lenient decimal parse: anything unparseable or non-finite counts as zero.
pub fn parse_decimal(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Inclusive index range `[min(i, j), max(i, j)]` clamped to `len`, or `None`
/// when nothing of it lies inside the list.
fn normalized_range(len: usize, i: usize, j: usize) -> Option<(usize, usize)> {
    let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
    if len == 0 || lo >= len {
        return None;
    }
    Some((lo, hi.min(len - 1)))
}

/// Sum of `total_profit` over the inclusive range between `i` and `j`.
pub fn sum_profit(tokens: &[Holding], i: usize, j: usize) -> f64 {
    match normalized_range(tokens.len(), i, j) {
        Some((lo, hi)) =>
            tokens[lo..=hi]
                .iter()
                .map(|t| parse_decimal(&t.total_profit))
                .sum(),
        None => 0.0,
    }
}

pub fn summarize_range(tokens: &[Holding], i: usize, j: usize) -> Option<RangeSummary> {
    let (lo, hi) = normalized_range(tokens.len(), i, j)?;
    let selected = &tokens[lo..=hi];

    let total_pnl_percent: f64 = selected
        .iter()
        .map(|t| parse_decimal(&t.total_profit_pnl) * 100.0)
        .sum();

    Some(RangeSummary {
        from: lo,
        to: hi,
        first: tokens[lo].clone(),
        last: tokens[hi].clone(),
        total_profit: sum_profit(tokens, lo, hi),
        total_pnl_percent,
    })
}

/// Two decimals with an explicit sign. The sign follows the formatted text,
/// so a tiny negative total prints as `-0.00`.
pub fn format_signed(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    if formatted.starts_with('-') {
        formatted
    } else {
        format!("+{}", formatted)
    }
}

/// Signed amount with the currency symbol after the sign: `+$7.25`, `-$3.00`.
pub fn format_signed_usd(value: f64) -> String {
    let signed = format_signed(value);
    let (sign, digits) = signed.split_at(1);
    format!("{}${}", sign, digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::holdings_service::tests::holding;

    fn tokens(profits: &[&str]) -> Vec<Holding> {
        profits
            .iter()
            .enumerate()
            .map(|(i, p)| holding(&format!("Mint{}", i), "T", p))
            .collect()
    }

    #[test]
    fn test_malformed_entry_counts_as_zero() {
        let list = tokens(&["10.5", "-3.25", "abc"]);
        assert_eq!(sum_profit(&list, 0, 2), 7.25);
        assert_eq!(format_signed(sum_profit(&list, 0, 2)), "+7.25");
    }

    #[test]
    fn test_symmetric_under_swap() {
        let list = tokens(&["1.1", "2.2", "-0.4", "NaN", "", "8"]);
        for i in 0..list.len() {
            for j in 0..list.len() {
                assert_eq!(sum_profit(&list, i, j), sum_profit(&list, j, i));
            }
        }
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(sum_profit(&[], 0, 3), 0.0);
        assert_eq!(format_signed(sum_profit(&[], 0, 3)), "+0.00");

        let list = tokens(&["5"]);
        assert_eq!(sum_profit(&list, 4, 9), 0.0);
        assert!(summarize_range(&list, 4, 9).is_none());
    }

    #[test]
    fn test_range_is_clamped() {
        let list = tokens(&["1", "2", "3"]);
        assert_eq!(sum_profit(&list, 1, 99), 5.0);
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(0.0), "+0.00");
        assert_eq!(format_signed(12.346), "+12.35");
        assert_eq!(format_signed(-3.0), "-3.00");
        assert_eq!(format_signed(-0.001), "-0.00");
        assert_eq!(format_signed_usd(7.25), "+$7.25");
        assert_eq!(format_signed_usd(-3.0), "-$3.00");
    }

    #[test]
    fn test_summarize_range() {
        let list = tokens(&["10", "-4", "1"]);
        let summary = summarize_range(&list, 2, 0).unwrap();

        assert_eq!((summary.from, summary.to), (0, 2));
        assert_eq!(summary.first.token.address, "Mint0");
        assert_eq!(summary.last.token.address, "Mint2");
        assert_eq!(summary.total_profit, 7.0);
        assert!((summary.total_pnl_percent - 30.0).abs() < 1e-9);
    }
}
