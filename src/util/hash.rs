use crate::core::types::{RefreshToken, SigningKey, Timestamp};

use super::random::FromRandom;

use tracing::{event, Level};

/// Generous bound on an encoded hash; ours are around a hundred bytes.
const MAX_ENCODED_LEN: usize = 256;

#[derive(Debug)]
pub struct Salt(pub String);

/// Derives and checks refresh tokens.
///
/// A refresh token is a salted argon2 hash of
/// `"{subject}-{signing key}-{issued at, second granularity}"`, with the
/// signing key also fed to argon2 as its secret. Nothing is stored: a later
/// refresh recomputes the same input from the old token's claims.
#[derive(Debug)]
pub struct RefreshHasher {
    secret_key: SigningKey,
}

impl RefreshHasher {
    pub fn with_secret_key(secret_key: SigningKey) -> Self {
        Self { secret_key }
    }

    fn get_config(&self) -> argon2::Config<'_> {
        let mut config = argon2::Config::default();
        config.secret = self.secret_key.as_ref();
        config
    }

    fn input(&self, subject: &str, issued_at: Timestamp) -> Vec<u8> {
        let key = self.secret_key.as_ref();
        let stamp = issued_at.to_second_granularity();

        let mut input = Vec::with_capacity(subject.len() + key.len() + stamp.len() + 2);
        input.extend_from_slice(subject.as_bytes());
        input.push(b'-');
        input.extend_from_slice(key);
        input.push(b'-');
        input.extend_from_slice(stamp.as_bytes());
        input
    }

    /// Leading `$variant$v=..$m=..,t=..,p=..$` part shared by every hash
    /// this service derives.
    fn encoded_prefix(&self) -> String {
        let config = self.get_config();
        format!(
            "${}$v={}$m={},t={},p={}$",
            config.variant.as_lowercase_str(),
            config.version.as_u32(),
            config.mem_cost,
            config.time_cost,
            config.lanes,
        )
    }

    pub fn derive(
        &self,
        subject: &str,
        issued_at: Timestamp,
    ) -> Result<RefreshToken, argon2::Error> {
        let salt = Salt::from_random();
        let hash = argon2::hash_encoded(
            &self.input(subject, issued_at),
            salt.0.as_bytes(),
            &self.get_config(),
        )?;

        Ok(hash.into())
    }

    /// `false` covers both a mismatch and a refresh token that is not a
    /// well-formed encoded hash.
    ///
    /// The cost parameters of an encoded hash are read from the string
    /// itself, so anything not carrying our own parameters is refused
    /// before argon2 sees it.
    pub fn verify(&self, subject: &str, issued_at: Timestamp, presented: &RefreshToken) -> bool {
        let presented = presented.as_ref();
        if presented.len() > MAX_ENCODED_LEN || !presented.starts_with(&self.encoded_prefix()) {
            event!(Level::DEBUG, "Refresh token does not carry expected hash parameters");
            return false;
        }

        argon2::verify_encoded_ext(
            presented,
            &self.input(subject, issued_at),
            self.secret_key.as_ref(),
            &[],
        )
        .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> RefreshHasher {
        RefreshHasher::with_secret_key(SigningKey::from("test-signing-key"))
    }

    #[test]
    fn derived_token_verifies_within_the_same_second() {
        let hasher = hasher();
        let issued = Timestamp::from_secs(1_700_000_000);

        let token = hasher.derive("101", issued).unwrap();
        assert!(hasher.verify("101", Timestamp(issued.0 + 500_000_000), &token));
    }

    #[test]
    fn rejects_other_subject_second_or_key() {
        let hasher = hasher();
        let issued = Timestamp::from_secs(1_700_000_000);
        let token = hasher.derive("101", issued).unwrap();

        assert!(!hasher.verify("102", issued, &token));
        assert!(!hasher.verify("101", issued.plus_secs(1), &token));

        let other = RefreshHasher::with_secret_key(SigningKey::from("another-key"));
        assert!(!other.verify("101", issued, &token));
    }

    #[test]
    fn salting_makes_every_derivation_unique() {
        let hasher = hasher();
        let issued = Timestamp::from_secs(1_700_000_000);

        let a = hasher.derive("101", issued).unwrap();
        let b = hasher.derive("101", issued).unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("101", issued, &a));
        assert!(hasher.verify("101", issued, &b));
    }

    #[test]
    fn derived_tokens_carry_the_configured_parameters() {
        let hasher = hasher();
        let token = hasher.derive("101", Timestamp(0)).unwrap();
        assert!(token.0.starts_with(&hasher.encoded_prefix()));
        assert!(token.0.starts_with("$argon2i$v=19$m=4096,t=3,p=1$"));
    }

    #[test]
    fn raised_cost_parameters_are_refused_without_hashing() {
        let hasher = hasher();
        let issued = Timestamp::from_secs(1_700_000_000);
        let token = hasher.derive("101", issued).unwrap();

        for (from, to) in &[
            ("m=4096", "m=4294967295"),
            ("t=3", "t=4294967295"),
            ("p=1", "p=16777215"),
            ("$argon2i$", "$argon2id$"),
        ] {
            let forged = RefreshToken(token.0.replacen(*from, *to, 1));
            assert_ne!(forged, token);
            assert!(!hasher.verify("101", issued, &forged));
        }
    }

    #[test]
    fn oversized_refresh_token_is_refused() {
        let hasher = hasher();
        let issued = Timestamp::from_secs(1_700_000_000);
        let token = hasher.derive("101", issued).unwrap();
        let padded = RefreshToken(format!("{}{}", token.0, "A".repeat(MAX_ENCODED_LEN)));
        assert!(!hasher.verify("101", issued, &padded));
    }

    #[test]
    fn garbage_refresh_token_is_rejected() {
        let hasher = hasher();
        let garbage = RefreshToken("not-a-hash".to_string());
        assert!(!hasher.verify("101", Timestamp(0), &garbage));
    }
}
