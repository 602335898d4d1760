use chrono::{DateTime, Utc};

/// Everything the summary sentence reports, gathered once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    pub created_at: DateTime<Utc>,
    pub years: u32,
    pub commits: u64,
    pub issues: u64,
    pub pull_requests: u64,
    pub stars: u64,
    pub owned_repos: u64,
    pub contributed_repos: u64,
    pub organizations: u64,
}
