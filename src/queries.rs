//! GraphQL documents for rate-limit checks and pull request pages.
//!
//! Requests carry no variables, so the repository and cursor are spliced into
//! the document text.

use crate::config::RepoInfo;

const RATE_LIMIT_FIELDS: &str = "rateLimit { limit cost remaining resetAt }";

pub const RATE_LIMIT_QUERY: &str = "query RateLimit { rateLimit { limit cost remaining resetAt } }";

const PULL_FIELDS: &str = r"
          id
          number
          url
          title
          state
          isDraft
          createdAt
          updatedAt
          baseRef { name }
          mergeable
          mergeStateStatus
          body
          author {
            login
            avatarUrl
            url
            ... on Node { id }
          }
          milestone { id title url }
          labels(first: 100) {
            nodes { id name color }
          }
          reviewRequests(first: 100) {
            nodes {
              requestedReviewer {
                __typename
                ... on Team {
                  id
                  name
                  avatarUrl
                  slug
                  parentTeam { name slug }
                }
                ... on User {
                  id
                  login
                  avatarUrl
                }
              }
            }
          }";

/// Quote `value` as a GraphQL string literal.
fn string_literal(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

/// Build the `OpenPulls` query for one page.
///
/// `after` is the end cursor of the previous page, `None` for the first.
#[must_use]
pub fn open_pulls_query(repo: &RepoInfo, page_size: u32, after: Option<&str>) -> String {
    let after = after.map_or_else(String::new, |cursor| {
        format!(" after: {}", string_literal(cursor))
    });
    format!(
        "query OpenPulls {{
  {RATE_LIMIT_FIELDS}
  repository(owner: {owner}, name: {name}) {{
    pullRequests(first: {page_size}{after}, states: OPEN) {{
      totalCount
      pageInfo {{ endCursor hasNextPage }}
      nodes {{{PULL_FIELDS}
      }}
    }}
  }}
}}",
        owner = string_literal(&repo.owner),
        name = string_literal(&repo.name),
    )
}
