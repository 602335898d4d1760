//! In-place substitution of the stats sentences inside a README.
//!
//! Each region is located purely by shape, so the patterns below must stay in
//! step with the templates in `format.rs`.

use log::warn;
use regex::{NoExpand, Regex};
use std::fmt;
use std::sync::LazyLock;

static SUMMARY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"I joined GitHub \*\*\d+ years ago\*\*\. ",
        r"Since then I pushed \*\*[\d,]+ commits\*\*, ",
        r"opened \*\*[\d,]+ issues\*\*, ",
        r"submitted \*\*[\d,]+ pull requests\*\*, ",
        r"received \*\*[\d,]+ stars\*\* ",
        r"across \*\*[\d,]+ personal projects\*\* ",
        r"and contributed to \*\*[\d,]+ public repositories\*\*\.",
    ))
    .expect("invalid regex")
});

static LANGUAGES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\*\*Languages:\*\*[^\r\n]*").expect("invalid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Summary,
    Languages,
}

impl Region {
    fn pattern(self) -> &'static Regex {
        match self {
            Region::Summary => &SUMMARY_REGEX,
            Region::Languages => &LANGUAGES_REGEX,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Summary => write!(f, "summary sentence"),
            Region::Languages => write!(f, "languages line"),
        }
    }
}

/// Result of patching a document. Regions in `missing` were left untouched.
#[derive(Debug)]
pub struct Patched {
    pub text: String,
    pub updated: Vec<Region>,
    pub missing: Vec<Region>,
}

/// Replace the first occurrence of `region` with `replacement`, verbatim.
///
/// Returns `None` when the region's shape does not occur in `text`.
pub fn replace_region(text: &str, region: Region, replacement: &str) -> Option<String> {
    let pattern = region.pattern();

    let matches = pattern.find_iter(text).count();
    if matches == 0 {
        return None;
    }
    if matches > 1 {
        warn!("{region} occurs {matches} times, only the first is updated");
    }

    Some(pattern.replace(text, NoExpand(replacement)).into_owned())
}

/// Substitute the summary sentence and, when given, the languages line.
pub fn patch(text: &str, summary: &str, languages: Option<&str>) -> Patched {
    let mut out = Patched {
        text: text.to_string(),
        updated: Vec::new(),
        missing: Vec::new(),
    };

    let edits = std::iter::once((Region::Summary, summary))
        .chain(languages.map(|l| (Region::Languages, l)));

    for (region, replacement) in edits {
        match replace_region(&out.text, region, replacement) {
            Some(text) => {
                out.text = text;
                out.updated.push(region);
            }
            None => out.missing.push(region),
        }
    }

    out
}
