use super::chunk::Value;

/// Missing-value markers treated as null when reading, besides the empty field.
pub const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_null_marker(raw: &str) -> bool {
    NULL_MARKERS.contains(&raw)
}

/// Trim whitespace, then keep at most `max_chars` characters.
pub fn clean_truncate(raw: &str, max_chars: usize) -> String {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(max_chars) {
        // cut may expose trailing whitespace, e.g. "ab c" at 3
        Some((cut, _)) => trimmed[..cut].trim_end().to_string(),
        None => trimmed.to_string(),
    }
}

/// Parse a trimmed string as an integer, or failing that as a finite float.
pub fn parse_number(raw: &str) -> Option<Value> {
    let s = raw.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::Int(i));
    }
    match s.parse::<f64>() {
        Ok(x) if x.is_finite() => Some(Value::Float(x)),
        _ => None,
    }
}

/// Stringify, trim and truncate. Null stays null.
pub fn strip_truncate(value: &Value, max_chars: usize) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Text(s) => Value::Text(clean_truncate(s, max_chars)),
        other => Value::Text(clean_truncate(&other.to_string(), max_chars)),
    }
}

/// Numeric value, or 0 when missing or unparseable.
pub fn numeric_or_zero(value: &Value) -> Value {
    match value {
        Value::Int(_) => value.clone(),
        Value::Float(x) if x.is_finite() => value.clone(),
        Value::Text(s) => parse_number(s).unwrap_or(Value::Int(0)),
        _ => Value::Int(0),
    }
}

/// Like [`numeric_or_zero`], truncated toward zero.
pub fn integer_or_zero(value: &Value) -> Value {
    match numeric_or_zero(value) {
        // `as` saturates out-of-range floats
        Value::Float(x) => Value::Int(x.trunc() as i64),
        other => other,
    }
}

pub fn fill_zero_if_missing(value: &Value) -> Value {
    match value {
        Value::Null => Value::Int(0),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_truncate_bounds_length_and_trims() {
        let cases = [
            ("  1234567890123 ", 10, "1234567890"),
            ("\tY\n", 1, "Y"),
            ("abc", 10, "abc"),
            ("   ", 3, ""),
            ("ab cdef", 3, "ab"),
            ("ÄÖÜßé", 2, "ÄÖ"),
        ];
        for (raw, n, expected) in cases {
            let out = strip_truncate(&Value::text(raw), n);
            assert_eq!(out, Value::text(expected), "input {:?}", raw);
            let Value::Text(s) = &out else { unreachable!() };
            assert!(s.chars().count() <= n);
            assert_eq!(s.trim(), s);
        }
    }

    #[test]
    fn strip_truncate_is_idempotent() {
        for raw in ["  x  y  z ", "E1234 567 ", "N", "", " 0042 ", "a\u{3000}b c"] {
            for n in [1, 2, 3, 10, 50] {
                let once = strip_truncate(&Value::text(raw), n);
                let twice = strip_truncate(&once, n);
                assert_eq!(once, twice, "input {:?} n {}", raw, n);
            }
        }
    }

    #[test]
    fn strip_truncate_stringifies_numbers_and_keeps_null() {
        assert_eq!(strip_truncate(&Value::Int(123456), 4), Value::text("1234"));
        assert_eq!(strip_truncate(&Value::Float(1.5), 10), Value::text("1.5"));
        assert_eq!(strip_truncate(&Value::Null, 10), Value::Null);
    }

    #[test]
    fn numeric_or_zero_parses_or_defaults() {
        assert_eq!(numeric_or_zero(&Value::text("42")), Value::Int(42));
        assert_eq!(numeric_or_zero(&Value::text(" -7 ")), Value::Int(-7));
        assert_eq!(numeric_or_zero(&Value::text("3.25")), Value::Float(3.25));
        assert_eq!(numeric_or_zero(&Value::text("1e3")), Value::Float(1000.0));
        assert_eq!(numeric_or_zero(&Value::text("abc")), Value::Int(0));
        assert_eq!(numeric_or_zero(&Value::text("")), Value::Int(0));
        assert_eq!(numeric_or_zero(&Value::text("inf")), Value::Int(0));
        assert_eq!(numeric_or_zero(&Value::Null), Value::Int(0));
        assert_eq!(numeric_or_zero(&Value::Int(9)), Value::Int(9));
    }

    #[test]
    fn integer_or_zero_truncates() {
        assert_eq!(integer_or_zero(&Value::text("12.9")), Value::Int(12));
        assert_eq!(integer_or_zero(&Value::text("-2.5")), Value::Int(-2));
        assert_eq!(integer_or_zero(&Value::text(" 5 ")), Value::Int(5));
        assert_eq!(integer_or_zero(&Value::text("x")), Value::Int(0));
    }

    #[test]
    fn fill_zero_only_touches_null() {
        assert_eq!(fill_zero_if_missing(&Value::Null), Value::Int(0));
        assert_eq!(fill_zero_if_missing(&Value::text("abc")), Value::text("abc"));
        assert_eq!(fill_zero_if_missing(&Value::text("")), Value::text(""));
    }

    #[test]
    fn null_markers() {
        assert!(is_null_marker(""));
        assert!(is_null_marker("NA"));
        assert!(is_null_marker("NULL"));
        assert!(!is_null_marker(" "));
        assert!(!is_null_marker("0"));
    }
}
