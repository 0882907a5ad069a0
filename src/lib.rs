pub mod core;
pub mod provider;
pub mod util;

pub use crate::core::models::{IssueRequest, TokenResponse};
pub use crate::core::types::{RefreshToken, SigningKey, Timestamp};
pub use crate::provider::{extract, Claims, Error, IssuerConfig, TokenIssuer};
