use crate::core::models::TokenResponse;
use crate::core::types::RefreshToken;
use crate::util::clock::Clock;

use super::{Error, TokenIssuer};

use tracing::{event, Level};

impl<C: Clock> TokenIssuer<C> {
    /// Mints a new token from an old one and the refresh token issued with it.
    ///
    /// Expiry of `old_token` is not checked. With `renew` a fresh refresh
    /// token is derived, otherwise `refresh_token` is handed back unchanged
    /// and stays usable.
    #[tracing::instrument(skip_all, fields(renew = renew))]
    pub fn refresh(
        &self,
        old_token: &str,
        refresh_token: RefreshToken,
        renew: bool,
    ) -> Result<TokenResponse, Error> {
        let old = self.token.decode(old_token)?;

        if !self.is_ours(&old) {
            event!(
                Level::WARN,
                iss = %old.issuer,
                aud = %old.audience,
                "Refusing to refresh foreign token"
            );
            return Err(Error::TokenRejected);
        }

        if !self.hasher.verify(&old.subject_id, old.issued_at, &refresh_token) {
            event!(Level::WARN, id = %old.subject_id, "Refresh token does not match");
            return Err(Error::RefreshRejected);
        }

        let now = self.clock.now();

        let refresh_token = if renew {
            event!(Level::DEBUG, id = %old.subject_id, "Rotating refresh token");
            self.hasher.derive(&old.subject_id, now)?
        } else {
            refresh_token
        };

        let claims = self.new_claims(old.subject_id, old.payload, now);
        let token = self.token.encode(&claims)?;

        event!(Level::DEBUG, exp = claims.expires_at.as_nanos(), "Refreshed token");
        Ok(self.respond(token, refresh_token, claims))
    }
}
