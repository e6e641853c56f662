//! Ready-made column converters.
//!
//! Any `Fn(&str) -> Result<T, E>` works as a converter; these cover the
//! common cases and share one signature, so a slice like
//! `[int, string, boolean]` can be handed to the parser as is.

use super::error::ConvertError;
use super::model::Value;

/// Signature shared by the converters in this module.
pub type ValueConverter = fn(&str) -> Result<Value, ConvertError>;

pub fn int(token: &str) -> Result<Value, ConvertError> {
    Ok(Value::Integer(token.trim().parse::<i64>()?))
}

pub fn float(token: &str) -> Result<Value, ConvertError> {
    Ok(Value::Float(token.trim().parse::<f64>()?))
}

pub fn string(token: &str) -> Result<Value, ConvertError> {
    Ok(Value::String(token.to_string()))
}

/// Truthiness of the raw token: anything but the empty string is `true`.
pub fn boolean(token: &str) -> Result<Value, ConvertError> {
    Ok(Value::Bool(!token.is_empty()))
}

/// Best guess: integer, then float, then the token itself. Never fails.
pub fn auto(token: &str) -> Result<Value, ConvertError> {
    if token.is_empty() {
        return Ok(Value::Null);
    }
    if let Ok(i) = token.parse::<i64>() {
        return Ok(Value::Integer(i));
    }
    if let Ok(f) = token.parse::<f64>() {
        return Ok(Value::Float(f));
    }
    Ok(Value::String(token.to_string()))
}

/// Look up one of the converters above by name.
pub fn by_name(name: &str) -> Option<ValueConverter> {
    let conv: ValueConverter = match name {
        "int" => int,
        "float" => float,
        "str" | "string" => string,
        "bool" => boolean,
        "auto" => auto,
        _ => return None,
    };
    Some(conv)
}
