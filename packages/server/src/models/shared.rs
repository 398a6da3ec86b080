use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::AppError;

/// Serde helper for partial updates on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Returns the trimmed value when it is present and not blank.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Reject a provided-but-blank value for a non-nullable column.
pub fn validate_not_blank(value: Option<&str>, field: &str) -> Result<(), AppError> {
    if let Some(v) = value
        && v.trim().is_empty()
    {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Turn an optional nullable string into a stored value, mapping blank to NULL.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Loose truthiness for required JSON fields: null, `false`, zero and the
/// empty string all count as missing.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}
