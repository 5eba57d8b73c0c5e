//! Serde helpers for the remote API's loosely typed JSON.
//!
//! The remote service is not consistent about scalar types: identifiers and
//! dates arrive as strings on some endpoints and as numbers on others.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accept null, string, number or bool and keep it as an optional string.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Like [`opt_string`] but collapses null to an empty string.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string(deserializer)?.unwrap_or_default())
}

/// Integers that sometimes arrive quoted.
pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "super::opt_string")]
        code: Option<String>,
        #[serde(default, deserialize_with = "super::string")]
        name: String,
        #[serde(default, deserialize_with = "super::opt_i64")]
        count: Option<i64>,
    }

    #[test]
    fn numbers_become_strings() {
        let row: Row = serde_json::from_str(r#"{"code": 42, "name": null, "count": "7"}"#).unwrap();
        assert_eq!(row.code.as_deref(), Some("42"));
        assert_eq!(row.name, "");
        assert_eq!(row.count, Some(7));
    }

    #[test]
    fn missing_fields_default() {
        let row: Row = serde_json::from_str("{}").unwrap();
        assert!(row.code.is_none());
        assert!(row.count.is_none());
    }
}
