//! Tests for issue link extraction.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn godot() -> RepoInfo {
    RepoInfo {
        owner: "godotengine".into(),
        name: "godot".into(),
    }
}

#[rstest]
fn duplicate_urls_keep_first_keyword(godot: RepoInfo) {
    let links = extract_links(Some("Fixes #123 and closes godotengine/godot#123"), &godot);
    assert_eq!(
        links,
        vec![Link {
            full_match: "Fixes #123".into(),
            keyword: LinkKeyword::Fixes,
            repo: "godotengine/godot".into(),
            issue: "123".into(),
            url: "https://github.com/godotengine/godot/issues/123".into(),
        }]
    );
}

#[rstest]
fn qualified_shorthand_uses_named_repo(godot: RepoInfo) {
    let links = extract_links(Some("Resolves other/repo#7"), &godot);
    assert_eq!(links.len(), 1);
    let link = links.first().expect("one link");
    assert_eq!(link.repo, "other/repo");
    assert_eq!(link.keyword, LinkKeyword::Resolves);
    assert_eq!(link.issue, "7");
    assert_eq!(link.url, "https://github.com/other/repo/issues/7");
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("Refactors the renderer; see #42 for context."))]
#[case(Some("Unfixes #3 and prefixes #4"))]
fn bodies_without_keywords_have_no_links(godot: RepoInfo, #[case] body: Option<&str>) {
    assert!(extract_links(body, &godot).is_empty());
}

#[rstest]
#[case("close #1", LinkKeyword::Closes)]
#[case("Closed #1", LinkKeyword::Closes)]
#[case("CLOSES #1", LinkKeyword::Closes)]
#[case("fix #1", LinkKeyword::Fixes)]
#[case("FIXED #1", LinkKeyword::Fixes)]
#[case("resolve #1", LinkKeyword::Resolves)]
#[case("Resolved: #1", LinkKeyword::Resolves)]
fn keyword_variants_collapse(godot: RepoInfo, #[case] body: &str, #[case] keyword: LinkKeyword) {
    let links = extract_links(Some(body), &godot);
    assert_eq!(links.first().map(|l| l.keyword), Some(keyword), "{body}");
}

#[rstest]
fn full_url_form_is_recognised(godot: RepoInfo) {
    let links = extract_links(
        Some("This fixes https://github.com/godotengine/godot-proposals/issues/992."),
        &godot,
    );
    assert_eq!(links.len(), 1);
    let link = links.first().expect("one link");
    assert_eq!(link.repo, "godotengine/godot-proposals");
    assert_eq!(link.issue, "992");
    assert_eq!(
        link.full_match,
        "fixes https://github.com/godotengine/godot-proposals/issues/992"
    );
}

#[rstest]
fn url_and_shorthand_to_same_issue_dedupe_in_body_order(godot: RepoInfo) {
    let body = "Closes https://github.com/godotengine/godot/issues/5\nAlso fixes #5 and fixes #6";
    let links = extract_links(Some(body), &godot);
    let summary: Vec<(LinkKeyword, &str)> =
        links.iter().map(|l| (l.keyword, l.issue.as_str())).collect();
    assert_eq!(
        summary,
        vec![(LinkKeyword::Closes, "5"), (LinkKeyword::Fixes, "6")]
    );
}

#[rstest]
fn many_links_keep_discovery_order(godot: RepoInfo) {
    let body = "- Fixes #10\n- Fixes #2\n- Closes a/b#10\n";
    let urls: Vec<String> = extract_links(Some(body), &godot)
        .into_iter()
        .map(|l| l.url)
        .collect();
    assert_eq!(
        urls,
        vec![
            "https://github.com/godotengine/godot/issues/10",
            "https://github.com/godotengine/godot/issues/2",
            "https://github.com/a/b/issues/10",
        ]
    );
}

#[rstest]
#[case("clo", Some(LinkKeyword::Closes))]
#[case("Fixes", Some(LinkKeyword::Fixes))]
#[case("RESOLVED", Some(LinkKeyword::Resolves))]
#[case("refs", None)]
fn keyword_normalises_by_prefix(#[case] word: &str, #[case] expected: Option<LinkKeyword>) {
    assert_eq!(LinkKeyword::from_match(word), expected);
}
