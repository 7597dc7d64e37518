use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{OutscanError, Result};

/// A sub-account as returned by `ACTION=SUBACCOUNTDATA`.
///
/// Only the five exported fields are kept; any other keys in the payload are
/// ignored. Values are carried as text since Outscan is loose about whether
/// flags come back as strings or numbers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserRecord {
    #[serde(deserialize_with = "scalar_to_string")]
    pub vcfullname: String,
    #[serde(deserialize_with = "scalar_to_string")]
    pub vcemail: String,
    #[serde(deserialize_with = "scalar_to_string")]
    pub superuser: String,
    #[serde(deserialize_with = "scalar_to_string")]
    pub swatlist: String,
    #[serde(deserialize_with = "scalar_to_string")]
    pub swatapplications: String,
}

/// Top-level envelope of a sub-account listing
#[derive(Debug, Clone, Deserialize)]
pub struct SubAccountResponse {
    pub data: Vec<Value>,
}

fn scalar_to_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "expected a scalar value, found {}",
            other
        ))),
    }
}

/// Decode a response body into user records, preserving order.
pub fn parse_users(body: &str) -> Result<Vec<UserRecord>> {
    let payload: Value = serde_json::from_str(body)?;

    if !matches!(payload.get("data"), Some(Value::Array(_))) {
        return Err(OutscanError::MissingData);
    }
    let envelope: SubAccountResponse = serde_json::from_value(payload)?;

    envelope
        .data
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<UserRecord>(value).map_err(|e| OutscanError::InvalidRecord {
                index,
                message: e.to_string(),
            })
        })
        .collect()
}
