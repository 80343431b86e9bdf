//! Monetary value parsing for free-text price strings
//!
//! Prices arrive from document extraction in whatever shape the contract used
//! (`"$125,000"`, `"USD 40000.00/yr"`, `"TBD"`). The value is derived by
//! dropping every character that is not a digit, `.` or `-` and reading the
//! longest numeric prefix of what remains. Anything that does not yield a
//! number is worth `0`.

/// Parse a loosely formatted price string into a float, defaulting to `0.0`
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    leading_number(&cleaned)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse an optional price string, treating `None` as `0.0`
pub fn parse_amount_opt(raw: Option<&str>) -> f64 {
    raw.map(parse_amount).unwrap_or(0.0)
}

fn leading_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if bytes.first() == Some(&b'-') {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            end = frac_end;
            digits += frac_end - frac_start;
        }
    }

    if digits == 0 {
        return None;
    }

    s[..end].parse::<f64>().ok()
}
