//! Language mix across a user's owned repositories.
//!
//! Byte counts from every repository are summed per language name, turned
//! into percentages of the account-wide total and cut down to the top few
//! plus an "Other" bucket.

use std::collections::BTreeMap;

pub const OTHER: &str = "Other";

/// Languages reported for a single repository, largest first.
#[derive(Debug, Clone, Default)]
pub struct RepoLanguages {
    pub name: String,
    pub languages: Vec<(String, u64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageShare {
    pub name: String,
    pub percent: f64,
}

/// Total bytes per language across all repositories.
pub fn totals(repos: &[RepoLanguages]) -> BTreeMap<String, u64> {
    let mut out = BTreeMap::new();
    for repo in repos {
        for (language, bytes) in &repo.languages {
            let entry = out.entry(language.clone()).or_insert(0u64);
            *entry = entry.saturating_add(*bytes);
        }
    }
    out
}

/// Percentage share of each language, highest first.
///
/// Equal percentages keep name order. An empty or all-zero map gives an
/// empty list rather than NaN shares.
pub fn shares(totals: &BTreeMap<String, u64>) -> Vec<LanguageShare> {
    let grand_total: u64 = totals.values().sum();
    if grand_total == 0 {
        return Vec::new();
    }

    let mut out: Vec<LanguageShare> = totals
        .iter()
        .map(|(name, bytes)| LanguageShare {
            name: name.clone(),
            percent: *bytes as f64 / grand_total as f64 * 100.0,
        })
        .collect();

    out.sort_by(|a, b| b.percent.total_cmp(&a.percent));
    out
}

/// Keep the first `keep` shares and fold the rest into a single "Other".
///
/// Expects `shares` sorted descending. "Other" is only emitted when the
/// residual is non-zero.
pub fn top_with_other(mut shares: Vec<LanguageShare>, keep: usize) -> Vec<LanguageShare> {
    if shares.len() <= keep {
        return shares;
    }

    let rest = shares.split_off(keep);
    let residual: f64 = rest.iter().map(|s| s.percent).sum();
    if residual > 0.0 {
        shares.push(LanguageShare {
            name: OTHER.to_string(),
            percent: residual,
        });
    }
    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str, languages: &[(&str, u64)]) -> RepoLanguages {
        RepoLanguages {
            name: name.to_string(),
            languages: languages
                .iter()
                .map(|(l, b)| (l.to_string(), *b))
                .collect(),
        }
    }

    fn map(entries: &[(&str, u64)]) -> BTreeMap<String, u64> {
        entries.iter().map(|(l, b)| (l.to_string(), *b)).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn totals_sum_across_repositories() {
        let repos = vec![
            repo("api", &[("Rust", 1000), ("Shell", 20)]),
            repo("site", &[("TypeScript", 500), ("Shell", 30)]),
            repo("empty", &[]),
        ];

        let totals = totals(&repos);
        assert_eq!(totals.len(), 3);
        assert_eq!(totals["Rust"], 1000);
        assert_eq!(totals["Shell"], 50);
        assert_eq!(totals["TypeScript"], 500);
    }

    #[test]
    fn five_languages_scenario() {
        let totals = map(&[("A", 800), ("B", 150), ("C", 30), ("D", 15), ("E", 5)]);

        let all = shares(&totals);
        let names: Vec<&str> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C", "D", "E"]);
        assert_close(all[0].percent, 80.0);
        assert_close(all[4].percent, 0.5);

        let top = top_with_other(all, 4);
        assert_eq!(top.len(), 5);
        assert_eq!(top[3].name, "D");
        assert_close(top[3].percent, 1.5);
        assert_eq!(top[4].name, OTHER);
        assert_close(top[4].percent, 0.5);
    }

    #[test]
    fn fewer_than_four_languages_has_no_other() {
        let top = top_with_other(shares(&map(&[("Go", 3), ("C", 1)])), 4);
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|s| s.name != OTHER));

        let top = top_with_other(
            shares(&map(&[("Go", 4), ("C", 3), ("Zig", 2), ("Lua", 1)])),
            4,
        );
        assert_eq!(top.len(), 4);
        assert!(top.iter().all(|s| s.name != OTHER));
    }

    #[test]
    fn percentages_sum_to_hundred_and_cap_at_five() {
        let totals = map(&[
            ("Rust", 91_234),
            ("Python", 12_345),
            ("Go", 7_777),
            ("C", 3_210),
            ("Shell", 999),
            ("Makefile", 123),
            ("Dockerfile", 77),
            ("Nix", 1),
        ]);

        let top = top_with_other(shares(&totals), 4);
        assert_eq!(top.len(), 5);

        let sum: f64 = top.iter().map(|s| s.percent).sum();
        assert!((sum - 100.0).abs() <= 0.1, "sum was {sum}");
    }

    #[test]
    fn ties_are_ordered_by_name() {
        let all = shares(&map(&[("Zig", 10), ("Ada", 10), ("Nim", 10)]));
        let names: Vec<&str> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Ada", "Nim", "Zig"]);
    }

    #[test]
    fn zero_bytes_gives_no_shares() {
        assert!(shares(&BTreeMap::new()).is_empty());
        assert!(shares(&map(&[("Rust", 0)])).is_empty());
    }
}
