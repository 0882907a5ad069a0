use chrono::{DateTime, Utc};

use super::types::{RefreshToken, Timestamp};

/// Identity and payload to bind into a new token.
#[derive(Debug, Clone)]
pub struct IssueRequest {
    pub id: String,
    pub obj: serde_json::Value,
}

impl IssueRequest {
    pub fn new(id: impl Into<String>, obj: serde_json::Value) -> Self {
        Self { id: id.into(), obj }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub refresh_token: RefreshToken,
    #[serde(rename = "expired_at")]
    pub expires_at: Timestamp,
    #[serde(rename = "created_at")]
    pub issued_at: Timestamp,
    pub audience: String,
    pub issuer: String,
}

impl TokenResponse {
    pub fn expires_at_time(&self) -> DateTime<Utc> {
        self.expires_at.to_datetime()
    }

    pub fn issued_at_time(&self) -> DateTime<Utc> {
        self.issued_at.to_datetime()
    }
}
