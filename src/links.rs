//! Extraction of issue links from pull request bodies.
//!
//! A link is a closing keyword followed by an issue target:
//!
//! ```text
//! link      := keyword [":"] ws+ target
//! keyword   := close | closes | closed | fix | fixes | fixed
//!            | resolve | resolves | resolved            (any case)
//! target    := [owner "/" repo] "#" digits
//!            | "https://github.com/" owner "/" repo "/issues/" digits
//! ```
//!
//! Both target forms are matched over the whole body and visited in body
//! order. Links are unique per canonical issue URL; the first one wins.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::config::RepoInfo;
use crate::snapshot::{Link, LinkKeyword};

const KEYWORD: &str = r"\b(?P<keyword>close[sd]?|fix(?:e[sd])?|resolve[sd]?):?\s+";
const REPO: &str = r"[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+";

static SHORTHAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i){KEYWORD}(?:(?P<repo>{REPO}))?#(?P<issue>\d+)"))
        .expect("valid shorthand link regex")
});

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i){KEYWORD}https://github\.com/(?P<repo>{REPO})/issues/(?P<issue>\d+)"
    ))
    .expect("valid URL link regex")
});

impl LinkKeyword {
    /// Canonical keyword for a matched spelling such as `Fixed` or `CLOSES`.
    #[must_use]
    pub fn from_match(word: &str) -> Option<Self> {
        let word = word.to_ascii_lowercase();
        if word.starts_with("clo") {
            Some(Self::Closes)
        } else if word.starts_with("fix") {
            Some(Self::Fixes)
        } else if word.starts_with("reso") {
            Some(Self::Resolves)
        } else {
            None
        }
    }
}

/// A raw match before repository defaulting and de-duplication.
struct Candidate<'a> {
    start: usize,
    full_match: &'a str,
    keyword: &'a str,
    repo: Option<&'a str>,
    issue: &'a str,
}

impl<'a> Candidate<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        let whole = caps.get(0)?;
        Some(Self {
            start: whole.start(),
            full_match: whole.as_str(),
            keyword: caps.name("keyword")?.as_str(),
            repo: caps.name("repo").map(|m| m.as_str()),
            issue: caps.name("issue")?.as_str(),
        })
    }
}

fn candidates<'a>(re: &Regex, body: &'a str) -> impl Iterator<Item = Candidate<'a>> {
    re.captures_iter(body)
        .filter_map(|caps| Candidate::from_captures(&caps))
}

/// Collect the issue links in `body`.
///
/// Shorthand references without an `owner/repo` qualifier point at
/// `default_repo`. An absent or empty body yields no links.
#[must_use]
pub fn extract_links(body: Option<&str>, default_repo: &RepoInfo) -> Vec<Link> {
    let Some(body) = body.filter(|b| !b.is_empty()) else {
        return Vec::new();
    };
    let mut found: Vec<Candidate<'_>> = candidates(&SHORTHAND_RE, body)
        .chain(candidates(&URL_RE, body))
        .collect();
    found.sort_by_key(|c| c.start);

    let default_repo = default_repo.to_string();
    let mut links: Vec<Link> = Vec::new();
    for candidate in found {
        let Some(keyword) = LinkKeyword::from_match(candidate.keyword) else {
            continue;
        };
        let repo = candidate.repo.unwrap_or(&default_repo);
        let url = format!("https://github.com/{repo}/issues/{}", candidate.issue);
        if links.iter().any(|l| l.url == url) {
            continue;
        }
        links.push(Link {
            full_match: candidate.full_match.to_owned(),
            keyword,
            repo: repo.to_owned(),
            issue: candidate.issue.to_owned(),
            url,
        });
    }
    links
}

#[cfg(test)]
mod tests;
