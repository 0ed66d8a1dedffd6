//! Number formatting and input coercion
//!
//! Display strings must match what the widget has always shown:
//! linear results are rounded to 6 places with trailing zeros stripped,
//! temperatures and currency amounts use fixed 2 places, currency rates 4.

use once_cell::sync::Lazy;
use regex::Regex;

pub const LINEAR_DECIMALS: usize = 6;
pub const TEMPERATURE_DECIMALS: usize = 2;
pub const CURRENCY_AMOUNT_DECIMALS: usize = 2;
pub const CURRENCY_RATE_DECIMALS: usize = 4;

/// Leading numeric prefix, the part `parseFloat` would consume.
static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap()
});

/// Places needed to print any f64 exactly (the smallest subnormal is 2^-1074).
const EXACT_DECIMALS: usize = 1074;

/// Fixed-point rendering with `decimals` places.
///
/// Ties round away from zero on the exact binary value, so `0.125` gives
/// `0.13` while `1.005` (stored just below) gives `1.00`. Negative zero
/// prints as `0`, non-finite values print as `NaN` / `Infinity` / `-Infinity`.
pub fn to_fixed(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = round_half_up(value.abs(), decimals);
    if value < 0.0 {
        format!("-{}", magnitude)
    } else {
        magnitude
    }
}

fn round_half_up(magnitude: f64, decimals: usize) -> String {
    let exact = format!("{:.*}", EXACT_DECIMALS, magnitude);
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(decimals))
        .collect();

    if frac_part.as_bytes().get(decimals).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let int_len = digits.len() - decimals;
    let mut out = String::with_capacity(digits.len() + 1);
    out.extend(digits[..int_len].iter().map(|d| *d as char));
    if decimals > 0 {
        out.push('.');
        out.extend(digits[int_len..].iter().map(|d| *d as char));
    }
    out
}

/// 6 decimal places, then trailing zeros and a dangling point removed.
pub fn format_linear(value: f64) -> String {
    let fixed = to_fixed(value, LINEAR_DECIMALS);
    if !fixed.contains('.') {
        return fixed;
    }
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn format_temperature(value: f64) -> String {
    to_fixed(value, TEMPERATURE_DECIMALS)
}

pub fn format_currency_amount(value: f64) -> String {
    to_fixed(value, CURRENCY_AMOUNT_DECIMALS)
}

pub fn format_currency_rate(value: f64) -> String {
    to_fixed(value, CURRENCY_RATE_DECIMALS)
}

/// Coerce raw field text to a number the way the widget always has:
/// the leading numeric prefix is parsed, anything unparseable becomes 0.
pub fn coerce_input(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let parsed = NUMERIC_PREFIX
        .find(trimmed)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0);

    if parsed.is_nan() || parsed == 0.0 {
        0.0
    } else {
        parsed
    }
}
