use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Not three dot-separated base64url segments.
    #[error("malformed token")]
    MalformedToken,
    /// Wrong key or tampered header/claims.
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("failed to parse token: {0}")]
    Parse(String),
    /// Issuer or audience does not match this issuer's policy.
    #[error("token rejected")]
    TokenRejected,
    #[error("refresh token rejected")]
    RefreshRejected,
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("failed to sign token: {0}")]
    Signing(String),
    #[error("failed to derive refresh token: {0}")]
    Hashing(String),
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::InvalidToken => Self::MalformedToken,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            _ => Self::Parse(e.to_string()),
        }
    }
}

impl From<argon2::Error> for Error {
    fn from(e: argon2::Error) -> Self {
        Self::Hashing(e.to_string())
    }
}
