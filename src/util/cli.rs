use crate::core::models::IssueRequest;
use crate::core::types::RefreshToken;
use crate::provider::{extract, Error, IssuerConfig, TokenIssuer, DEFAULT_DURATION_SECS};

use clap::{Parser, Subcommand};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Token(#[from] Error),
    #[error("payload is not JSON: {0}")]
    Payload(serde_json::Error),
    #[error("failed to write output: {0}")]
    Output(serde_json::Error),
}

#[derive(Parser)]
#[clap(
    name = "shiori-util",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS")
)]
pub struct Options {
    #[clap(long, env = "SIGNING_KEY", hide_env_values = true)]
    signing_key: String,
    #[clap(long, env = "TOKEN_AUDIENCE")]
    audience: String,
    #[clap(long, env = "TOKEN_ISSUER")]
    issuer: String,
    #[clap(long, env = "TOKEN_DURATION", default_value_t = DEFAULT_DURATION_SECS)]
    duration: u64,
    #[clap(subcommand)]
    command: SubCommand,
}

#[derive(Subcommand)]
enum SubCommand {
    Issue(Issue),
    Validate(Validate),
    Refresh(Refresh),
    Extract(Extract),
}

#[derive(Parser)]
struct Issue {
    #[clap(short, long)]
    id: String,
    /// JSON payload to embed in the token
    #[clap(short, long, default_value = "null")]
    payload: String,
}

#[derive(Parser)]
struct Validate {
    token: String,
}

#[derive(Parser)]
struct Refresh {
    token: String,
    refresh_token: String,
    #[clap(short, long)]
    renew: bool,
}

#[derive(Parser)]
struct Extract {
    token: String,
}

fn get_issuer(opts: &Options) -> Result<TokenIssuer, Error> {
    let config = IssuerConfig::new(
        opts.signing_key.as_str(),
        opts.audience.as_str(),
        opts.issuer.as_str(),
    )
    .with_duration_secs(opts.duration);
    TokenIssuer::new(config)
}

fn to_json(value: &impl serde::Serialize) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(CliError::Output)
}

fn issue(c: &Issue, issuer: &TokenIssuer) -> Result<String, CliError> {
    let obj: serde_json::Value = serde_json::from_str(&c.payload).map_err(CliError::Payload)?;
    let response = issuer.issue(IssueRequest::new(c.id.as_str(), obj))?;
    to_json(&response)
}

fn validate(c: &Validate, issuer: &TokenIssuer) -> Result<String, CliError> {
    to_json(&serde_json::json!({ "valid": issuer.validate(&c.token) }))
}

fn refresh(c: &Refresh, issuer: &TokenIssuer) -> Result<String, CliError> {
    let response = issuer.refresh(&c.token, RefreshToken(c.refresh_token.clone()), c.renew)?;
    to_json(&response)
}

fn extract_claims(c: &Extract, issuer: &TokenIssuer) -> Result<String, CliError> {
    let claims = extract(&c.token, issuer.signing_key().as_ref())?;
    to_json(&claims)
}

/// Runs the selected subcommand and returns its JSON output.
pub fn run_cli_action(opts: Options) -> Result<String, CliError> {
    let issuer = get_issuer(&opts)?;

    match &opts.command {
        SubCommand::Issue(c) => issue(c, &issuer),
        SubCommand::Validate(c) => validate(c, &issuer),
        SubCommand::Refresh(c) => refresh(c, &issuer),
        SubCommand::Extract(c) => extract_claims(c, &issuer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> Result<String, CliError> {
        let mut argv = vec![
            "shiori-util",
            "--signing-key",
            "cli-key",
            "--audience",
            "aud",
            "--issuer",
            "iss",
        ];
        argv.extend_from_slice(args);
        run_cli_action(Options::parse_from(argv))
    }

    #[test]
    fn issue_then_validate_and_refresh() {
        let issued = run(&["issue", "--id", "101", "--payload", r#"{"k":"v"}"#]).unwrap();
        let issued: serde_json::Value = serde_json::from_str(&issued).unwrap();
        let token = issued["token"].as_str().unwrap();
        let refresh_token = issued["refresh_token"].as_str().unwrap();

        let valid = run(&["validate", token]).unwrap();
        let valid: serde_json::Value = serde_json::from_str(&valid).unwrap();
        assert_eq!(valid["valid"], true);

        let claims = run(&["extract", token]).unwrap();
        let claims: serde_json::Value = serde_json::from_str(&claims).unwrap();
        assert_eq!(claims["_id"], "101");
        assert_eq!(claims["obj"]["k"], "v");

        let refreshed: serde_json::Value =
            serde_json::from_str(&run(&["refresh", token, refresh_token]).unwrap()).unwrap();
        assert_eq!(refreshed["refresh_token"], refresh_token);
    }

    #[test]
    fn bad_payload_is_reported() {
        assert!(matches!(
            run(&["issue", "--id", "101", "--payload", "{"]),
            Err(CliError::Payload(_))
        ));
    }

    #[test]
    fn duration_defaults_to_one_hour_and_must_be_numeric() {
        let issued = run(&["issue", "--id", "101"]).unwrap();
        let issued: serde_json::Value = serde_json::from_str(&issued).unwrap();
        let expired_at = issued["expired_at"].as_i64().unwrap();
        let created_at = issued["created_at"].as_i64().unwrap();
        assert_eq!(expired_at - created_at, 3600 * 1_000_000_000);

        let parsed = Options::try_parse_from(vec![
            "shiori-util",
            "--signing-key",
            "cli-key",
            "--audience",
            "aud",
            "--issuer",
            "iss",
            "--duration",
            "an hour",
            "issue",
            "--id",
            "101",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn empty_signing_key_fails_before_any_action() {
        let opts = Options::parse_from(vec![
            "shiori-util",
            "--signing-key",
            "",
            "--audience",
            "aud",
            "--issuer",
            "iss",
            "validate",
            "a.b.c",
        ]);
        assert!(matches!(
            run_cli_action(opts),
            Err(CliError::Token(Error::Configuration(_)))
        ));
    }

    #[test]
    fn token_errors_pass_through() {
        assert!(matches!(
            run(&["refresh", "not-a-token", "$argon2i$"]),
            Err(CliError::Token(Error::MalformedToken))
        ));
        assert!(matches!(
            run(&["extract", "a.b"]),
            Err(CliError::Token(Error::MalformedToken))
        ));
    }
}
