//! Parsing of admin-supplied license attributes.
//!
//! Admin input arrives loosely typed (JSON bodies, CLI strings). Each field
//! has exactly one parser, shared by every entry point, and a value either
//! resolves unambiguously or is rejected as `InvalidInput`. Nothing is
//! clamped.

use serde_json::Value;

use licensegate_core::error::AppError;
use licensegate_core::result::AppResult;

/// Parse a lifetime usage limit.
///
/// Accepts non-negative JSON integers, floats without a fractional part,
/// and strings holding a non-negative integer.
pub fn parse_limit(value: &Value) -> AppResult<i64> {
    let invalid = || AppError::invalid_input("Limit must be a non-negative integer");

    match value {
        Value::Number(number) => {
            if let Some(n) = number.as_i64() {
                return if n >= 0 { Ok(n) } else { Err(invalid()) };
            }
            if number.as_u64().is_some() {
                // Larger than i64::MAX.
                return Err(invalid());
            }
            match number.as_f64() {
                Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= i64::MAX as f64 => {
                    Ok(f as i64)
                }
                _ => Err(invalid()),
            }
        }
        Value::String(text) => match text.trim().parse::<i64>() {
            Ok(n) if n >= 0 => Ok(n),
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}

/// Parse an active flag.
///
/// Accepts booleans, the numbers `1`/`0`, and the strings
/// `"true"`/`"false"`/`"1"`/`"0"` (case-insensitive).
pub fn parse_active(value: &Value) -> AppResult<bool> {
    let invalid = || AppError::invalid_input("Active must be a boolean");

    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Number(number) => match number.as_f64() {
            Some(n) if n == 1.0 => Ok(true),
            Some(n) if n == 0.0 => Ok(false),
            _ => Err(invalid()),
        },
        Value::String(text) => {
            let text = text.trim();
            if text == "1" || text.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if text == "0" || text.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(invalid())
            }
        }
        _ => Err(invalid()),
    }
}

/// Parse an optional field, treating JSON `null` as absent.
pub fn parse_optional<T>(
    value: Option<&Value>,
    parse: impl Fn(&Value) -> AppResult<T>,
) -> AppResult<Option<T>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => parse(v).map(Some),
    }
}
