use crate::core::models::{IssueRequest, TokenResponse};
use crate::core::types::{RefreshToken, SigningKey, Timestamp};
use crate::util::clock::{Clock, SystemClock};
use crate::util::hash::RefreshHasher;

pub mod claims;
pub mod config;
pub mod error;
pub mod refresh;
pub mod token;

pub use claims::Claims;
pub use config::{IssuerConfig, DEFAULT_DURATION_SECS};
pub use error::Error;
pub use token::extract;

use token::TokenService;

use tracing::{event, Level};

/// Issues, validates and refreshes tokens for one audience/issuer pair.
///
/// Holds only immutable configuration, so a single instance can be shared
/// across threads without locking.
pub struct TokenIssuer<C = SystemClock> {
    signing_key: SigningKey,
    audience: String,
    issuer: String,
    duration_secs: u64,
    token: TokenService,
    hasher: RefreshHasher,
    clock: C,
}

impl<C> std::fmt::Debug for TokenIssuer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("audience", &self.audience)
            .field("issuer", &self.issuer)
            .field("duration_secs", &self.duration_secs)
            .finish()
    }
}

impl TokenIssuer<SystemClock> {
    pub fn new(config: IssuerConfig) -> Result<Self, Error> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> TokenIssuer<C> {
    pub fn with_clock(config: IssuerConfig, clock: C) -> Result<Self, Error> {
        config.check()?;

        Ok(Self {
            token: TokenService::new(&config.signing_key),
            hasher: RefreshHasher::with_secret_key(config.signing_key.clone()),
            signing_key: config.signing_key,
            audience: config.audience,
            issuer: config.issuer,
            duration_secs: config.duration_secs,
            clock,
        })
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    #[tracing::instrument(skip(self, req), fields(id = %req.id))]
    pub fn issue(&self, req: IssueRequest) -> Result<TokenResponse, Error> {
        let now = self.clock.now();

        let refresh_token = self.hasher.derive(&req.id, now)?;
        let claims = self.new_claims(req.id, req.obj, now);
        let token = self.token.encode(&claims)?;

        event!(Level::DEBUG, exp = claims.expires_at.as_nanos(), "Issued token");
        Ok(self.respond(token, refresh_token, claims))
    }

    /// `true` only for a correctly signed token of this issuer and audience
    /// whose expiry is still ahead. Never fails.
    pub fn validate(&self, token: &str) -> bool {
        let claims = match self.token.decode(token) {
            Ok(claims) => claims,
            Err(e) => {
                event!(Level::DEBUG, error = %e, "Token failed to decode");
                return false;
            }
        };

        self.is_ours(&claims) && self.clock.now() < claims.expires_at
    }

    fn is_ours(&self, claims: &Claims) -> bool {
        claims.issuer == self.issuer && claims.audience == self.audience
    }

    fn new_claims(&self, subject_id: String, payload: serde_json::Value, now: Timestamp) -> Claims {
        Claims {
            subject_id,
            payload,
            issued_at: now,
            expires_at: now.plus_secs(self.duration_secs),
            audience: self.audience.clone(),
            issuer: self.issuer.clone(),
        }
    }

    fn respond(&self, token: String, refresh_token: RefreshToken, claims: Claims) -> TokenResponse {
        TokenResponse {
            token,
            refresh_token,
            expires_at: claims.expires_at,
            issued_at: claims.issued_at,
            audience: claims.audience,
            issuer: claims.issuer,
        }
    }
}
