use serde_json::Value;

use crate::core::types::Timestamp;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    #[serde(rename = "_id")]
    pub subject_id: String,
    #[serde(rename = "obj")]
    pub payload: Value,
    #[serde(rename = "cre")]
    pub issued_at: Timestamp,
    #[serde(rename = "exp")]
    pub expires_at: Timestamp,
    #[serde(rename = "aud")]
    pub audience: String,
    #[serde(rename = "iss")]
    pub issuer: String,
}

impl Claims {
    /// Projects a decoded claim map onto `Claims`.
    ///
    /// Never fails: a missing key or a value of the wrong shape leaves the
    /// field at its zero value. A correctly signed token with foreign claim
    /// names therefore decodes, but will not pass issuer/audience checks.
    pub fn project(map: &Value) -> Self {
        let string = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .map(ToString::to_string)
                .unwrap_or_default()
        };
        let timestamp = |key: &str| {
            Timestamp(map.get(key).and_then(Value::as_i64).unwrap_or_default())
        };

        Self {
            subject_id: string("_id"),
            payload: map.get("obj").cloned().unwrap_or(Value::Null),
            issued_at: timestamp("cre"),
            expires_at: timestamp("exp"),
            audience: string("aud"),
            issuer: string("iss"),
        }
    }
}
