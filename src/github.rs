use chrono::{DateTime, Datelike, Utc};
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::config::Config;
use crate::error::{Result, StatsError};
use crate::languages::RepoLanguages;

const USER_AGENT: &str = "readme-stats";

/// Largest page GitHub returns for a connection; repository lists stop here.
pub const PAGE_CAP: u64 = 100;

const PROFILE_QUERY: &str = r#"
query($login: String!) {
  user(login: $login) {
    createdAt
    contributionsCollection {
      totalCommitContributions
      restrictedContributionsCount
    }
    repositoriesContributedTo(first: 1, contributionTypes: [COMMIT, ISSUE, PULL_REQUEST, REPOSITORY]) {
      totalCount
    }
    pullRequests(first: 1) {
      totalCount
    }
    issues(first: 1) {
      totalCount
    }
    organizations(first: 1) {
      totalCount
    }
    repositories(first: 100, ownerAffiliations: OWNER, isFork: false) {
      totalCount
      nodes {
        stargazerCount
      }
    }
  }
}
"#;

const CONTRIBUTIONS_QUERY: &str = r#"
query($login: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      totalCommitContributions
      restrictedContributionsCount
    }
  }
}
"#;

const LANGUAGES_QUERY: &str = r#"
query($login: String!) {
  user(login: $login) {
    repositories(first: 100, ownerAffiliations: OWNER, isFork: false) {
      nodes {
        name
        languages(first: 10, orderBy: {field: SIZE, direction: DESC}) {
          edges {
            size
            node {
              name
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountObj {
    total_count: u64,
}

#[derive(Deserialize)]
struct UserWrapper<T> {
    user: Option<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContribCollection {
    total_commit_contributions: u64,
    restricted_contributions_count: u64,
}

impl ContribCollection {
    /// Either half can be zero depending on what the token may see, so both count.
    fn commits(&self) -> u64 {
        self.total_commit_contributions
            .saturating_add(self.restricted_contributions_count)
    }
}

/// Aggregate counts from the single profile query.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub created_at: DateTime<Utc>,
    /// Commit contributions in GitHub's default (last year) window.
    pub window_commits: u64,
    pub issues: u64,
    pub pull_requests: u64,
    pub stars: u64,
    pub owned_repos: u64,
    pub contributed_repos: u64,
    pub organizations: u64,
}

#[derive(Clone)]
pub struct GithubClient {
    token: Arc<String>,
    endpoint: Arc<String>,
    http: Arc<Client>,
}

impl GithubClient {
    /// Create a GitHub GraphQL client from the run configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            token: Arc::new(config.token.as_str().to_string()),
            endpoint: Arc::new(config.endpoint.clone()),
            http: Arc::new(http),
        })
    }

    /// One authenticated GraphQL POST, returning the typed `data` payload.
    ///
    /// No retries: any transport failure, non-2xx status, GraphQL `errors`
    /// entry or missing `data` aborts with an error.
    async fn graphql<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        debug!("POST {} variables={variables}", self.endpoint);

        let resp = self
            .http
            .post(self.endpoint.as_str())
            .bearer_auth(self.token.as_str())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(StatsError::Upstream(format!(
                "GitHub API returned HTTP {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let mut json: Value = serde_json::from_str(&body)?;

        if let Some(errors) = json.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let messages = errors
                    .iter()
                    .map(|e| e.get("message").and_then(Value::as_str).unwrap_or("unknown error"))
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(StatsError::Upstream(format!(
                    "GraphQL reported errors: {messages}"
                )));
            }
        }

        let data = json.get_mut("data").map(Value::take).unwrap_or(Value::Null);
        if data.is_null() {
            return Err(StatsError::Upstream(
                "GraphQL response carried no data".to_string(),
            ));
        }

        Ok(serde_json::from_value(data)?)
    }

    /// Run a `user(login:)` query and unwrap the user node.
    async fn user_query<T: DeserializeOwned>(
        &self,
        login: &str,
        query: &str,
        variables: Value,
    ) -> Result<T> {
        let wrapper: UserWrapper<T> = self.graphql(query, variables).await?;
        wrapper.user.ok_or_else(|| {
            StatsError::Upstream(format!(
                "user '{login}' not found or not visible to this token"
            ))
        })
    }

    /// Account age, current-window commits and repository/star counts in one request.
    pub async fn profile(&self, login: &str) -> Result<Profile> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ProfileUser {
            created_at: DateTime<Utc>,
            contributions_collection: ContribCollection,
            repositories_contributed_to: CountObj,
            pull_requests: CountObj,
            issues: CountObj,
            organizations: CountObj,
            repositories: StarRepos,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct StarRepos {
            total_count: u64,
            nodes: Option<Vec<StarNode>>,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct StarNode {
            stargazer_count: u64,
        }

        let user: ProfileUser = self
            .user_query(login, PROFILE_QUERY, json!({ "login": login }))
            .await?;

        let nodes = user.repositories.nodes.unwrap_or_default();
        let stars = nodes
            .iter()
            .fold(0u64, |sum, n| sum.saturating_add(n.stargazer_count));

        if user.repositories.total_count > nodes.len() as u64 {
            warn!(
                "{login} owns {} repositories but only the first {} are counted for stars",
                user.repositories.total_count,
                nodes.len()
            );
        }

        Ok(Profile {
            created_at: user.created_at,
            window_commits: user.contributions_collection.commits(),
            issues: user.issues.total_count,
            pull_requests: user.pull_requests.total_count,
            stars,
            owned_repos: user.repositories.total_count,
            contributed_repos: user.repositories_contributed_to.total_count,
            organizations: user.organizations.total_count,
        })
    }

    /// Commit plus restricted contributions for one calendar year (UTC).
    pub async fn commits_in_year(&self, login: &str, year: i32) -> Result<u64> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct WindowUser {
            contributions_collection: ContribCollection,
        }

        let from = format!("{year}-01-01T00:00:00Z");
        let to = format!("{year}-12-31T23:59:59Z");

        let user: WindowUser = self
            .user_query(
                login,
                CONTRIBUTIONS_QUERY,
                json!({ "login": login, "from": from, "to": to }),
            )
            .await?;

        Ok(user.contributions_collection.commits())
    }

    /// All-time commits, one window query per calendar year, strictly in order.
    ///
    /// GitHub caps a contributions window at one year, so there is no single
    /// request that returns the lifetime total.
    pub async fn all_time_commits(
        &self,
        login: &str,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let mut total = 0u64;

        for year in created_at.year()..=now.year() {
            let commits = self.commits_in_year(login, year).await?;
            debug!("{login}: {commits} commits in {year}");
            total = total.saturating_add(commits);
        }

        Ok(total)
    }

    /// Per-repository language byte counts for owned, non-fork repositories.
    pub async fn repository_languages(&self, login: &str) -> Result<Vec<RepoLanguages>> {
        #[derive(Deserialize)]
        struct LangUser {
            repositories: LangRepos,
        }
        #[derive(Deserialize)]
        struct LangRepos {
            nodes: Option<Vec<LangRepo>>,
        }
        #[derive(Deserialize)]
        struct LangRepo {
            name: String,
            languages: Option<LangConnection>,
        }
        #[derive(Deserialize)]
        struct LangConnection {
            edges: Option<Vec<LangEdge>>,
        }
        #[derive(Deserialize)]
        struct LangEdge {
            size: u64,
            node: LangNode,
        }
        #[derive(Deserialize)]
        struct LangNode {
            name: String,
        }

        let user: LangUser = self
            .user_query(login, LANGUAGES_QUERY, json!({ "login": login }))
            .await?;

        let repos: Vec<RepoLanguages> = user
            .repositories
            .nodes
            .unwrap_or_default()
            .into_iter()
            .map(|repo| RepoLanguages {
                name: repo.name,
                languages: repo
                    .languages
                    .and_then(|l| l.edges)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|e| (e.node.name, e.size))
                    .collect(),
            })
            .collect();

        if repos.len() as u64 >= PAGE_CAP {
            warn!("{login}: language mix only covers the first {PAGE_CAP} repositories");
        }

        Ok(repos)
    }
}
