//! Shared serde helper functions used across multiple modules.

use serde::{Deserialize, Deserializer};

/// Deserialize a YAML scalar (string, number, or bool) into its literal text.
///
/// Default values are spliced into DDL verbatim, so `0`, `'0'`, and `"0"`
/// all need to arrive as the same string.
pub fn scalar_to_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(if b { "1" } else { "0" }.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar value, found {}",
            crate::operation::describe_value(&other)
        ))),
    }
}

/// Deserialize a loosely-typed flag.
///
/// Missing, `null`, `false` and the string `"false"` are false; any other
/// value switches the flag on.
pub fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::Null => false,
        serde_yaml::Value::Bool(b) => b,
        serde_yaml::Value::String(s) => !s.trim().eq_ignore_ascii_case("false"),
        _ => true,
    })
}
