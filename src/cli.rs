use clap::Parser;
use std::path::PathBuf;

use crate::config::{DEFAULT_ENDPOINT, DEFAULT_LOGIN};

#[derive(Parser, Debug)]
#[command(name = "readme-stats")]
#[command(version, about = "Refresh GitHub activity stats inside a README", long_about = None)]
pub struct Cli {
    /// GitHub access token used for the GraphQL API
    #[arg(long, env = "GH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Account whose stats are collected
    #[arg(short, long, env = "USERNAME", default_value = DEFAULT_LOGIN)]
    pub username: String,

    /// README file to rewrite in place
    #[arg(short, long, env = "README_PATH", default_value = "README.md")]
    pub readme: PathBuf,

    /// GraphQL endpoint
    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "GH_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Skip README regions that cannot be found instead of failing
    #[arg(long, default_value_t = false)]
    pub allow_missing: bool,

    /// Print the new sentences without touching the README
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}
