//! Number formatting shared by chart labels and tables.

/// Fixed-point rendering with `,` thousands separators: `1234.5` with two
/// decimals becomes `1,234.50`. Non-finite values render as `N/A`.
pub fn thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return String::from("N/A");
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + whole.len() / 3 + 1);
    if value.is_sign_negative() && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        grouped.push('-');
    }
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Dollar amount, sign before the currency mark: `-$1,234.5`.
pub fn usd(value: f64, decimals: usize) -> String {
    let digits = thousands(value, decimals);
    match digits.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None if digits == "N/A" => digits,
        None => format!("${digits}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(thousands(0.0, 0), "0");
        assert_eq!(thousands(999.0, 0), "999");
        assert_eq!(thousands(1000.0, 0), "1,000");
        assert_eq!(thousands(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(thousands(-98_765.4, 1), "-98,765.4");
    }

    #[test]
    fn negative_zero_after_rounding_has_no_sign() {
        assert_eq!(thousands(-0.001, 1), "0.0");
    }

    #[test]
    fn formats_dollars() {
        assert_eq!(usd(212.456, 1), "$212.5");
        assert_eq!(usd(52_000_000_000.0, 0), "$52,000,000,000");
        assert_eq!(usd(-1500.0, 2), "-$1,500.00");
        assert_eq!(usd(f64::NAN, 2), "N/A");
    }
}
