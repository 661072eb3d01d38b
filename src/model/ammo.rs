//! Ammo and numeric coercion. Malformed input yields NaN, never an error.

use super::StatValue;

/// Ammo sentinel for weapons that never reload.
pub const AMMO_UNLIMITED: &str = "inf";

/// Parse an ammo value: `"inf"` is unlimited, `"a+b"` sums the pools, anything else is coerced.
pub fn parse_ammo_value(raw: &StatValue) -> f64 {
    match raw {
        StatValue::Text(s) => parse_ammo_str(s),
        other => coerce_number(other),
    }
}

pub fn parse_ammo_str(raw: &str) -> f64 {
    if raw == AMMO_UNLIMITED {
        return f64::INFINITY;
    }
    if raw.contains('+') {
        return raw.split('+').map(coerce_str).sum();
    }
    coerce_str(raw)
}

/// Numeric coercion of any stat value: flags are 1/0, strings go through [`coerce_str`].
pub fn coerce_number(v: &StatValue) -> f64 {
    match v {
        StatValue::Number(n) => *n,
        StatValue::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        StatValue::Text(s) => coerce_str(s),
    }
}

/// Lenient string-to-number coercion: surrounding whitespace ignored, blank is 0,
/// `Infinity` is accepted, anything that is not a plain decimal literal is NaN.
pub fn coerce_str(s: &str) -> f64 {
    let t = s.trim();
    match t {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // f64::from_str also takes "inf"/"nan" spellings; only digits, sign, dot and exponent are numeric here.
    if t
        .chars()
        .any(|c| !(c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E')))
    {
        return f64::NAN;
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}
