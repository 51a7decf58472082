//! Lenient numeric parsing for formula operands and numeric fields.

/// Parses the longest numeric prefix of `raw`.
///
/// Leading whitespace is skipped and trailing text is ignored, so `"120 m²"`
/// reads as `120` and `"1,200"` as `1`. Returns `None` when the value does
/// not start with a number.
pub fn parse_leading_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if bytes.first() == Some(&b'-') {
            Some(f64::NEG_INFINITY)
        } else {
            Some(f64::INFINITY)
        };
    }

    let int_start = end;
    end = scan_digits(bytes, end);
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = scan_digits(bytes, end + 1);
        let frac = frac_end - (end + 1);
        if digits + frac > 0 {
            end = frac_end;
            digits += frac;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = scan_digits(bytes, exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok()
}

fn scan_digits(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    end
}

/// Formula operand: the parsed value, or `0` for a non-numeric cell.
///
/// The flag is `true` when the cell did not hold a number.
pub fn operand(raw: &str) -> (f64, bool) {
    match parse_leading_number(raw) {
        Some(value) => (value, false),
        None => (0.0, true),
    }
}

/// Parses a numeric field value, tolerating thousands separators and
/// trailing units.
pub fn parse_field_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '_').collect();
    parse_leading_number(&cleaned).filter(|value| value.is_finite())
}
