use crate::core::types::SigningKey;
use crate::provider::Error;

pub const DEFAULT_DURATION_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct IssuerConfig {
    pub signing_key: SigningKey,
    pub audience: String,
    pub issuer: String,
    pub duration_secs: u64,
}

impl IssuerConfig {
    pub fn new(
        signing_key: impl Into<SigningKey>,
        audience: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            signing_key: signing_key.into(),
            audience: audience.into(),
            issuer: issuer.into(),
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }

    pub fn with_duration_secs(mut self, duration_secs: u64) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    pub(crate) fn check(&self) -> Result<(), Error> {
        if self.signing_key.is_empty() {
            return Err(Error::Configuration("signing key must not be empty".to_string()));
        }
        if self.duration_secs == 0 {
            return Err(Error::Configuration("duration must be at least one second".to_string()));
        }
        Ok(())
    }
}
