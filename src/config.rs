use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::error::{Result, StatsError};

pub const DEFAULT_LOGIN: &str = "thisisyashgarg";
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

pub struct Token(String);

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<redacted>")
    }
}

/// Everything a run needs, resolved once at startup.
#[derive(Debug)]
pub struct Config {
    pub token: Token,
    pub login: String,
    pub readme: PathBuf,
    pub endpoint: String,
    pub timeout: Duration,
    /// Downgrade a missing README region from an error to a warning.
    pub allow_missing: bool,
    pub dry_run: bool,
}

impl TryFrom<Cli> for Config {
    type Error = StatsError;

    fn try_from(cli: Cli) -> Result<Self> {
        let token = cli
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Token::from)
            .ok_or(StatsError::MissingConfig("GH_TOKEN"))?;

        let login = cli.username.trim();
        let login = if login.is_empty() { DEFAULT_LOGIN } else { login };

        Ok(Self {
            token,
            login: login.to_string(),
            readme: cli.readme,
            endpoint: cli.endpoint,
            timeout: Duration::from_secs(cli.timeout_secs),
            allow_missing: cli.allow_missing,
            dry_run: cli.dry_run,
        })
    }
}
