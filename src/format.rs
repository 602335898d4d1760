//! Sentences written into the README.
//!
//! The wording and bold markers here are matched again by the patterns in
//! `readme.rs` on the next run. Change both together.

use crate::languages::LanguageShare;
use crate::stats::AccountSnapshot;

pub const LANGUAGES_LABEL: &str = "**Languages:**";

/// Group digits in threes with commas, en-US style.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// One decimal place, no grouping.
pub fn percent(p: f64) -> String {
    format!("{p:.1}")
}

pub fn summary_sentence(stats: &AccountSnapshot) -> String {
    format!(
        "I joined GitHub **{} years ago**. Since then I pushed **{} commits**, \
         opened **{} issues**, submitted **{} pull requests**, received **{} stars** \
         across **{} personal projects** and contributed to **{} public repositories**.",
        stats.years,
        thousands(stats.commits),
        thousands(stats.issues),
        thousands(stats.pull_requests),
        thousands(stats.stars),
        thousands(stats.owned_repos),
        thousands(stats.contributed_repos),
    )
}

pub fn languages_sentence(shares: &[LanguageShare]) -> String {
    let list = shares
        .iter()
        .map(|s| format!("{} ({}%)", s.name, percent(s.percent)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("{LANGUAGES_LABEL} {list}")
}
