//! Data structures for GraphQL responses.
//!
//! These mirror the query documents in [`crate::queries`]. Pull nodes are kept
//! as raw JSON by the page fetcher and decoded into [`RawPull`] during
//! normalization.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RateLimit {
    pub limit: u32,
    pub cost: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitData {
    pub rate_limit: Option<RateLimit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullsData {
    pub rate_limit: Option<RateLimit>,
    pub repository: Option<PullsRepository>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullsRepository {
    pub pull_requests: PullConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullConnection {
    pub total_count: u32,
    pub page_info: PageInfo,
    #[serde(default)]
    pub nodes: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// One pull request node as returned by the `OpenPulls` query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPull {
    pub id: String,
    pub number: u64,
    pub url: String,
    pub title: String,
    pub state: String,
    pub is_draft: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub base_ref: Option<RawRef>,
    pub mergeable: String,
    pub merge_state_status: Option<String>,
    pub body: Option<String>,
    pub author: Option<RawAuthor>,
    pub milestone: Option<RawMilestone>,
    pub labels: RawConnection<RawLabel>,
    pub review_requests: RawConnection<RawReviewRequest>,
}

#[derive(Debug, Deserialize)]
pub struct RawRef {
    pub name: String,
}

/// Connection wrapper; missing `nodes` read as empty.
#[derive(Debug, Deserialize)]
pub struct RawConnection<T> {
    // A bare `default` would demand `T: Default`.
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAuthor {
    pub id: String,
    pub login: String,
    pub avatar_url: String,
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawMilestone {
    pub id: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct RawLabel {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReviewRequest {
    pub requested_reviewer: Option<RequestedReviewer>,
}

/// The `requestedReviewer` union, discriminated by `__typename`.
#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
pub enum RequestedReviewer {
    Team(RawTeam),
    User(RawUser),
    /// Bots and mannequins; not tracked.
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTeam {
    pub id: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub slug: String,
    pub parent_team: Option<RawParentTeam>,
}

#[derive(Debug, Deserialize)]
pub struct RawParentTeam {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    pub id: String,
    pub login: String,
    pub avatar_url: String,
}
