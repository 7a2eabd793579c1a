use rust_decimal::{Decimal, RoundingStrategy};

/// Round a ratio to a two-decimal percentage value.
///
/// Returns zero when the denominator is zero: a zero-cost acquisition has no
/// defined return, and the engine reports `0` rather than infinity.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part / whole * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Render a count-over-total share as a percent string with two decimal
/// places, e.g. `"66.67%"`. Zero totals render as `"0%"`.
pub fn share_percent_string(count: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    let percent = percent_of(Decimal::from(count as u64), Decimal::from(total as u64));
    format!("{}%", pad_to_two_decimals(&percent.normalize().to_string()))
}

fn pad_to_two_decimals(s: &str) -> String {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    let mut out = String::with_capacity(int_part.len() + 3);
    out.push_str(int_part);
    out.push('.');
    let mut written = 0usize;
    for ch in frac_part.chars().take(2) {
        out.push(ch);
        written += 1;
    }
    while written < 2 {
        out.push('0');
        written += 1;
    }
    out
}
