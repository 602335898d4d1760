mod age;
mod cli;
mod config;
mod error;
mod format;
mod github;
mod languages;
mod pipeline;
mod readme;
mod stats;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::Config;
use format::{percent, thousands};
use pipeline::Report;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::try_from(Cli::parse())?;
    let report = pipeline::run(&config)
        .await
        .with_context(|| format!("failed to refresh stats in {}", config.readme.display()))?;

    print_summary(&config, &report);

    Ok(())
}

fn print_summary(config: &Config, report: &Report) {
    let stats = &report.snapshot;

    if report.written {
        println!("{} updated with new stats:", config.readme.display());
    } else {
        println!("Computed stats (README not written):");
        println!("  {}", report.summary);
        if let Some(line) = &report.languages_line {
            println!("  {line}");
        }
    }

    println!(
        "  Years: {} (joined {})",
        stats.years,
        stats.created_at.format("%Y-%m-%d")
    );
    println!("  Commits: {}", thousands(stats.commits));
    println!("  Issues: {}", thousands(stats.issues));
    println!("  PRs: {}", thousands(stats.pull_requests));
    println!("  Stars: {}", thousands(stats.stars));
    println!("  Personal Projects: {}", thousands(stats.owned_repos));
    println!("  Contributed To: {}", thousands(stats.contributed_repos));
    println!("  Organizations: {}", thousands(stats.organizations));

    if !report.languages.is_empty() {
        let list = report
            .languages
            .iter()
            .map(|l| format!("{} {}%", l.name, percent(l.percent)))
            .collect::<Vec<_>>()
            .join(", ");
        println!("  Languages: {list}");
    }

    for region in &report.updated {
        println!("  Updated: {region}");
    }
    for region in &report.missing {
        println!("  Skipped: {region} not found");
    }
}
