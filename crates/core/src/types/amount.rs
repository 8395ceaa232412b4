//! Lenient serde helpers for prices and quantities.
//!
//! Stored collections are plain JSON written by earlier clients, so a price
//! may arrive as a number, a numeric string, `null`, or garbage. Reads never
//! fail on these fields: anything that is not numeric becomes zero and simply
//! contributes nothing to totals. Writes always emit JSON numbers.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Interpret a JSON value as a decimal amount.
///
/// Accepts numbers and numeric strings. Returns `None` for everything else.
#[must_use]
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(Decimal::from(i));
            }
            if let Some(u) = n.as_u64() {
                return Some(Decimal::from(u));
            }
            parse_decimal(&n.to_string())
        }
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Interpret a JSON value as a line quantity.
///
/// Negative, fractional-below-one, and non-numeric values become `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // guarded by range checks
pub fn quantity_from_json(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return u32::try_from(u).unwrap_or(u32::MAX);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f >= 1.0 => f.min(f64::from(u32::MAX)) as u32,
                _ => 0,
            }
        }
        Value::String(s) => s.trim().parse::<u32>().unwrap_or(0),
        _ => 0,
    }
}

/// Deserialize a decimal amount, mapping non-numeric input to zero.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decimal_from_json(&value).unwrap_or(Decimal::ZERO))
}

/// Deserialize an optional decimal amount, mapping non-numeric input to `None`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decimal_from_json(&value))
}

/// Deserialize a quantity, mapping non-numeric input to zero.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at all.
pub fn deserialize_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(quantity_from_json(&value))
}

/// Serialize a decimal amount as a JSON number.
///
/// Whole amounts are written as integers (`20`, not `20.0`).
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract().is_zero()
        && let Some(whole) = value.to_i64()
    {
        return serializer.serialize_i64(whole);
    }
    serializer.serialize_f64(value.to_f64().unwrap_or_default())
}
