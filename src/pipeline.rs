use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::fs;

use crate::age::years_since;
use crate::config::Config;
use crate::error::{Result, StatsError};
use crate::format::{languages_sentence, summary_sentence};
use crate::github::GithubClient;
use crate::languages::{self, LanguageShare};
use crate::readme::{self, Region};
use crate::stats::AccountSnapshot;

/// Languages shown individually before the rest is folded into "Other".
const TOP_LANGUAGES: usize = 4;

/// What a run computed and what it did to the README.
#[derive(Debug)]
pub struct Report {
    pub snapshot: AccountSnapshot,
    pub languages: Vec<LanguageShare>,
    pub summary: String,
    pub languages_line: Option<String>,
    pub updated: Vec<Region>,
    pub missing: Vec<Region>,
    pub written: bool,
}

pub async fn run(config: &Config) -> Result<Report> {
    run_at(config, Utc::now()).await
}

/// Fetch everything first, then touch the README. An upstream failure leaves
/// the document as it was.
pub async fn run_at(config: &Config, now: DateTime<Utc>) -> Result<Report> {
    let login = config.login.as_str();
    let client = GithubClient::new(config)?;

    info!("Fetching GitHub stats for {login}");
    let profile = client.profile(login).await?;
    debug!(
        "{login}: {} commits in the current window",
        profile.window_commits
    );

    info!("Counting commits since {}", profile.created_at.format("%Y-%m-%d"));
    let commits = client
        .all_time_commits(login, profile.created_at, now)
        .await?;

    info!("Fetching repository languages");
    let repos = client.repository_languages(login).await?;
    for repo in &repos {
        debug!("{}: {} languages", repo.name, repo.languages.len());
    }
    let languages = languages::top_with_other(
        languages::shares(&languages::totals(&repos)),
        TOP_LANGUAGES,
    );

    let snapshot = AccountSnapshot {
        created_at: profile.created_at,
        years: years_since(profile.created_at, now),
        commits,
        issues: profile.issues,
        pull_requests: profile.pull_requests,
        stars: profile.stars,
        owned_repos: profile.owned_repos,
        contributed_repos: profile.contributed_repos,
        organizations: profile.organizations,
    };

    let summary = summary_sentence(&snapshot);
    let languages_line = if languages.is_empty() {
        warn!("{login} has no language data, languages line is left alone");
        None
    } else {
        Some(languages_sentence(&languages))
    };

    let text = fs::read_to_string(&config.readme)?;
    let patched = readme::patch(&text, &summary, languages_line.as_deref());

    for region in &patched.missing {
        if !config.allow_missing {
            return Err(StatsError::PatternMissing(*region));
        }
        warn!(
            "{region} not found in {}, left unchanged",
            config.readme.display()
        );
    }

    let written = if config.dry_run {
        info!("Dry run, not writing {}", config.readme.display());
        false
    } else {
        fs::write(&config.readme, &patched.text)?;
        info!("Updated {}", config.readme.display());
        true
    };

    Ok(Report {
        snapshot,
        languages,
        summary,
        languages_line,
        updated: patched.updated,
        missing: patched.missing,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::tests::{profile_body, test_config, window_body};
    use chrono::TimeZone;
    use mockito::{Matcher, Mock, Server, ServerGuard};
    use serde_json::json;
    use std::path::Path;

    const OLD_README: &str = "# Hello\n\n\
        I joined GitHub **1 years ago**. Since then I pushed **10 commits**, opened **0 issues**, \
        submitted **0 pull requests**, received **0 stars** across **1 personal projects** \
        and contributed to **0 public repositories**.\n\n\
        **Languages:** Go (100.0%)\n\n\
        Thanks for visiting!\n";

    fn now() -> DateTime<Utc> {
        // 3.5 Julian years after the fixture's createdAt of 2021-04-01T10:00:00Z.
        Utc.with_ymd_and_hms(2021, 4, 1, 10, 0, 0).unwrap() + chrono::Duration::hours(30_681)
    }

    async fn mock_github(server: &mut ServerGuard) -> Vec<Mock> {
        let mut mocks = vec![
            server
                .mock("POST", "/graphql")
                .match_body(Matcher::Regex("repositoriesContributedTo".to_string()))
                .with_status(200)
                .with_body(profile_body().to_string())
                .expect(1)
                .create_async()
                .await,
        ];

        for (year, commits) in [(2021, 400), (2022, 500), (2023, 300), (2024, 34)] {
            mocks.push(
                server
                    .mock("POST", "/graphql")
                    .match_body(Matcher::PartialJson(json!({
                        "variables": { "from": format!("{year}-01-01T00:00:00Z") }
                    })))
                    .with_status(200)
                    .with_body(window_body(commits, 0).to_string())
                    .expect(1)
                    .create_async()
                    .await,
            );
        }

        let languages = json!({
            "data": { "user": { "repositories": { "nodes": [
                { "name": "a", "languages": { "edges": [
                    { "size": 700, "node": { "name": "A" } },
                    { "size": 100, "node": { "name": "B" } }
                ] } },
                { "name": "b", "languages": { "edges": [
                    { "size": 100, "node": { "name": "A" } },
                    { "size": 50, "node": { "name": "B" } },
                    { "size": 30, "node": { "name": "C" } },
                    { "size": 15, "node": { "name": "D" } },
                    { "size": 5, "node": { "name": "E" } }
                ] } }
            ] } } }
        });
        mocks.push(
            server
                .mock("POST", "/graphql")
                .match_body(Matcher::Regex("languages\\(first: 10".to_string()))
                .with_status(200)
                .with_body(languages.to_string())
                .expect(1)
                .create_async()
                .await,
        );

        mocks
    }

    fn config_for(server: &ServerGuard, readme: &Path) -> Config {
        let mut config = test_config(server);
        config.readme = readme.to_path_buf();
        config
    }

    #[tokio::test]
    async fn test_run_rewrites_readme() {
        let mut server = Server::new_async().await;
        let mocks = mock_github(&mut server).await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, OLD_README).unwrap();

        let report = run_at(&config_for(&server, &path), now()).await.unwrap();
        for mock in mocks {
            mock.assert_async().await;
        }

        assert_eq!(report.snapshot.years, 3);
        assert_eq!(report.snapshot.commits, 1_234);
        assert_eq!(report.snapshot.stars, 42);
        assert_eq!(report.languages.len(), 5);
        assert!(report.written);

        let expected = "# Hello\n\n\
            I joined GitHub **3 years ago**. Since then I pushed **1,234 commits**, opened **5 issues**, \
            submitted **17 pull requests**, received **42 stars** across **7 personal projects** \
            and contributed to **3 public repositories**.\n\n\
            **Languages:** A (80.0%), B (15.0%), C (3.0%), D (1.5%), Other (0.5%)\n\n\
            Thanks for visiting!\n";
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    }

    #[tokio::test]
    async fn test_missing_region_fails_without_writing() {
        let mut server = Server::new_async().await;
        let _mocks = mock_github(&mut server).await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        let original = "# Hello\n\n**Languages:** Go (100.0%)\n";
        fs::write(&path, original).unwrap();

        let err = run_at(&config_for(&server, &path), now())
            .await
            .unwrap_err();

        assert!(matches!(err, StatsError::PatternMissing(Region::Summary)));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[tokio::test]
    async fn test_allow_missing_writes_matched_regions() {
        let mut server = Server::new_async().await;
        let _mocks = mock_github(&mut server).await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, "# Hello\n\n**Languages:** Go (100.0%)\n").unwrap();

        let mut config = config_for(&server, &path);
        config.allow_missing = true;
        let report = run_at(&config, now()).await.unwrap();

        assert_eq!(report.updated, [Region::Languages]);
        assert_eq!(report.missing, [Region::Summary]);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# Hello\n\n**Languages:** A (80.0%), B (15.0%), C (3.0%), D (1.5%), Other (0.5%)\n"
        );
    }

    #[tokio::test]
    async fn test_dry_run_leaves_file_alone() {
        let mut server = Server::new_async().await;
        let _mocks = mock_github(&mut server).await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, OLD_README).unwrap();

        let mut config = config_for(&server, &path);
        config.dry_run = true;
        let report = run_at(&config, now()).await.unwrap();

        assert!(!report.written);
        assert_eq!(report.updated, [Region::Summary, Region::Languages]);
        assert_eq!(fs::read_to_string(&path).unwrap(), OLD_README);
    }

    #[tokio::test]
    async fn test_upstream_failure_leaves_readme_untouched() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, OLD_README).unwrap();

        let err = run_at(&config_for(&server, &path), now())
            .await
            .unwrap_err();

        assert!(matches!(err, StatsError::Upstream(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), OLD_README);
    }
}
