//! Formatting helpers.

/// Formats a won amount with thousands separators, rounded to whole won.
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(1000.0), "1,000");
        assert_eq!(format_amount(1_234_567.0), "1,234,567");
        assert_eq!(format_amount(600_000_000.0), "600,000,000");
    }

    #[test]
    fn format_amount_rounds_and_keeps_sign() {
        assert_eq!(format_amount(1_499.6), "1,500");
        assert_eq!(format_amount(-12_000.0), "-12,000");
        assert_eq!(format_amount(-0.2), "0");
    }
}
