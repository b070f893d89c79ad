//! Runtime flow for one snapshot run.
//!
//! The run is strictly sequential: check the rate limit, walk every page
//! (fetch, then normalize), check the rate limit again, then write the
//! snapshot.

use chrono::Utc;
use log::{info, warn};

use crate::api::GraphQLClient;
use crate::config::{RepoInfo, Settings};
use crate::error::PrsnapError;
use crate::normalize::Catalog;
use crate::pages::{PageFetcher, Pagination};
use crate::rate::{check_rate_limit, points_spent};
use crate::snapshot::persist_snapshot;

/// All mutable state of a run, threaded through each stage.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub pagination: Pagination,
    pub catalog: Catalog,
}

impl PipelineState {
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            pagination: Pagination::new(page_size),
            catalog: Catalog::new(),
        }
    }
}

/// Outcome of [`run`], for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub pages_requested: u32,
    pub pulls: usize,
    pub written: bool,
    /// Rate-limit points consumed, when both checks succeeded in one window.
    pub points_spent: Option<u32>,
}

/// Fetch and normalize pages until the page index passes the page count.
///
/// The page count starts at one and is recomputed by every successful fetch,
/// so the first response sets the real bound. Returns the number of pages
/// requested.
///
/// # Errors
///
/// Propagates [`PrsnapError::MalformedPull`] from normalization. Fetch
/// failures are not errors here; they yield empty pages.
pub async fn fetch_all(
    client: &GraphQLClient,
    repo: &RepoInfo,
    state: &mut PipelineState,
) -> Result<u32, PrsnapError> {
    let fetcher = PageFetcher { client, repo };
    let mut page = 1;
    while page <= state.pagination.page_count {
        let nodes = fetcher.fetch(page, &mut state.pagination).await;
        state.catalog.ingest_page(&nodes, repo)?;
        page += 1;
    }
    Ok(page - 1)
}

fn build_graphql_client(settings: &Settings) -> GraphQLClient {
    if settings.token.is_empty() {
        warn!("GitHub token not set, using anonymous API access");
    }
    GraphQLClient::new(
        &settings.token,
        settings.endpoint.clone(),
        settings.http_timeout,
    )
}

/// Run the whole pipeline and write the snapshot to `settings.output`.
///
/// # Errors
///
/// Returns [`PrsnapError::MalformedPull`] when a pull request node cannot be
/// normalized. Network failures and a failed write are logged only.
pub async fn run(settings: &Settings) -> Result<RunSummary, PrsnapError> {
    let client = build_graphql_client(settings);
    info!(
        "snapshotting open pull requests of {} via {}",
        settings.repo,
        client.endpoint().as_str()
    );

    let before = check_rate_limit(&client).await;
    let mut state = PipelineState::new(settings.page_size);
    let pages_requested = fetch_all(&client, &settings.repo, &mut state).await?;
    let after = check_rate_limit(&client).await;
    let spent = before
        .as_ref()
        .zip(after.as_ref())
        .and_then(|(before, after)| points_spent(before, after));
    if let Some(spent) = spent {
        info!("run spent {spent} rate-limit points");
    }

    let catalog = state.catalog;
    info!(
        "collected {} pulls from {pages_requested} pages ({} authors, {} teams, {} reviewers)",
        catalog.pulls.len(),
        catalog.authors.len(),
        catalog.teams.len(),
        catalog.reviewers.len()
    );
    let snapshot = catalog.into_snapshot(Utc::now().timestamp_millis());
    let written = persist_snapshot(&settings.output, &snapshot);
    Ok(RunSummary {
        pages_requested,
        pulls: snapshot.pulls.len(),
        written,
        points_spent: spent,
    })
}
