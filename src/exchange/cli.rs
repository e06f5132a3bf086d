// Command-line interface for the exchange client

use crate::exchange::auth::Credential;
use crate::exchange::client::DEFAULT_LIMIT;
use crate::exchange::config::{ClientConfig, DEFAULT_HOST, DEFAULT_PROTOCOL, DEFAULT_TIMEOUT_SECS};
use crate::exchange::context::RawInputs;
use crate::exchange::token::{Token, DEFAULT_TOKEN_FILE};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// What the invocation should do
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Publish a message
    Send,
    /// Fetch the newest messages of a network
    #[value(name = "recv", alias = "receive")]
    Receive,
    /// Re-authenticate and store a new token
    Refresh,
    /// Print the digest of the message locally
    Hash,
}

/// Catswords Community CLI
///
/// Send messages to the Catswords exchange, read them back by network ID,
/// and compute content hashes locally.
#[derive(Debug, Parser)]
#[command(name = "catswords-cli", author, version, about, long_about = None)]
pub struct CatswordsCli {
    /// Server hostname
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Protocol: https, http, ...
    #[arg(long, default_value = DEFAULT_PROTOCOL)]
    pub protocol: String,

    /// Action to perform
    #[arg(long, value_enum, default_value_t = Action::Send)]
    pub action: Action,

    /// User email, used to obtain a token
    #[arg(long)]
    pub email: Option<String>,

    /// User password, used to obtain a token
    #[arg(long)]
    pub password: Option<String>,

    /// Access token (overrides the stored one)
    #[arg(long)]
    pub token: Option<String>,

    /// File the access token is stored in
    #[arg(long, default_value = DEFAULT_TOKEN_FILE)]
    pub token_file: PathBuf,

    /// Maximum number of messages to receive
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    #[command(flatten)]
    pub inputs: RawInputs,
}

impl CatswordsCli {
    /// Parse from command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Connection settings for this invocation
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.host.clone(), self.protocol.clone())
            .with_timeout(Duration::from_secs(self.timeout))
    }

    /// Credentials, if an email was given
    pub fn credential(&self) -> Option<Credential> {
        self.email
            .as_deref()
            .filter(|email| !email.is_empty())
            .map(|email| Credential::new(email, self.password.clone().unwrap_or_default()))
    }

    /// Token given with '--token'
    pub fn explicit_token(&self) -> Option<Token> {
        self.token.clone().and_then(Token::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = CatswordsCli::try_parse_from(["catswords-cli"]).unwrap();

        assert_eq!(cli.host, "catswords.re.kr");
        assert_eq!(cli.protocol, "https");
        assert_eq!(cli.action, Action::Send);
        assert_eq!(cli.limit, 128);
        assert_eq!(cli.token_file, PathBuf::from("token.dat"));
        assert_eq!(cli.inputs.format.as_deref(), Some("text"));
        assert_eq!(cli.inputs.mime.as_deref(), Some("text/plain"));
        assert_eq!(cli.inputs.lang.as_deref(), Some("english"));
        assert!(cli.credential().is_none());
    }

    #[test]
    fn test_actions() {
        for (name, action) in [
            ("send", Action::Send),
            ("recv", Action::Receive),
            ("receive", Action::Receive),
            ("refresh", Action::Refresh),
            ("hash", Action::Hash),
        ] {
            let cli = CatswordsCli::try_parse_from(["catswords-cli", "--action", name]).unwrap();
            assert_eq!(cli.action, action);
        }
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result = CatswordsCli::try_parse_from(["catswords-cli", "--action", "publish"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_legacy_aliases() {
        let cli = CatswordsCli::try_parse_from([
            "catswords-cli",
            "--netid",
            "net-1",
            "--enc",
            "aes",
            "--hasher",
            "sha256",
            "--ttl",
            "2",
            "--lat",
            "-33.5",
            "--mine",
            "application/json",
        ])
        .unwrap();

        assert_eq!(cli.inputs.network_id.as_deref(), Some("net-1"));
        assert_eq!(cli.inputs.encryption.as_deref(), Some("aes"));
        assert_eq!(cli.inputs.hash_function.as_deref(), Some("sha256"));
        assert_eq!(cli.inputs.time_to_live, 2);
        assert_eq!(cli.inputs.latitude, -33.5);
        assert_eq!(cli.inputs.mime.as_deref(), Some("application/json"));
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        for args in [
            ["catswords-cli", "--lat", "NaN", "--message", "x"],
            ["catswords-cli", "--lon", "inf", "--message", "x"],
            ["catswords-cli", "--latitude", "-inf", "--message", "x"],
        ] {
            assert!(CatswordsCli::try_parse_from(args).is_err());
        }

        let cli = CatswordsCli::try_parse_from(["catswords-cli", "--lon", "126.97"]).unwrap();
        assert_eq!(cli.inputs.longitude, 126.97);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(CatswordsCli::try_parse_from(["catswords-cli", "--timeout", "0"]).is_err());
        assert!(CatswordsCli::try_parse_from(["catswords-cli", "--timeout", "1"]).is_ok());
    }

    #[test]
    fn test_credential_and_config() {
        let cli = CatswordsCli::try_parse_from([
            "catswords-cli",
            "--email",
            "me@example.com",
            "--password",
            "pw",
            "--host",
            "localhost:8080",
            "--protocol",
            "http",
            "--timeout",
            "5",
        ])
        .unwrap();

        let credential = cli.credential().unwrap();
        assert_eq!(credential.email, "me@example.com");
        assert_eq!(credential.password, "pw");

        let config = cli.client_config();
        assert_eq!(config.endpoint("x"), "http://localhost:8080/x");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
