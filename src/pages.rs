//! Page fetcher for the open pull request connection.
//!
//! [`Pagination`] holds the cursor and page count between requests. Only a
//! successful response updates it; a failed page leaves both untouched and is
//! reported to the caller as an empty page.

use log::{debug, info, warn};
use serde_json::Value;

use crate::api::GraphQLClient;
use crate::config::RepoInfo;
use crate::error::PrsnapError;
use crate::models::{PullConnection, PullsData};
use crate::queries::open_pulls_query;
use crate::rate::log_rate_limit;

/// Cursor state for a sequential walk over the open pull requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// `endCursor` of the last successful page.
    pub cursor: Option<String>,
    /// Pages to request, recomputed from `totalCount` after every success.
    pub page_count: u32,
    pub page_size: u32,
}

impl Pagination {
    /// Start before the first page. One page is always attempted.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            cursor: None,
            page_count: 1,
            page_size: page_size.max(1),
        }
    }

    /// Record a successful page.
    pub fn advance(&mut self, total_count: u32, end_cursor: Option<String>) {
        self.cursor = end_cursor;
        self.page_count = total_count.div_ceil(self.page_size);
    }
}

/// Everything the fetcher needs besides the mutable cursor.
pub struct PageFetcher<'a> {
    pub client: &'a GraphQLClient,
    pub repo: &'a RepoInfo,
}

impl PageFetcher<'_> {
    async fn request(&self, pagination: &Pagination) -> Result<PullConnection, PrsnapError> {
        let query = open_pulls_query(
            self.repo,
            pagination.page_size,
            pagination.cursor.as_deref(),
        );
        let data: PullsData = self.client.post_query(query).await?;
        if let Some(rate) = &data.rate_limit {
            log_rate_limit(rate);
        }
        data.repository
            .map(|repo| repo.pull_requests)
            .ok_or_else(|| PrsnapError::RepoNotFound(self.repo.to_string().into()))
    }

    /// Fetch page `page` (1-based, used for logging) after the current cursor.
    ///
    /// Returns the page's raw pull nodes. On any failure the error is logged
    /// and an empty page is returned; `pagination` then keeps its previous
    /// cursor, so the next call asks for the same slice of results again.
    pub async fn fetch(&self, page: u32, pagination: &mut Pagination) -> Vec<Value> {
        info!(
            "requesting page {page}/{} of open pull requests",
            pagination.page_count
        );
        match self.request(pagination).await {
            Ok(conn) => {
                debug!(
                    "page {page}: {} nodes, total {}, has next page: {}",
                    conn.nodes.len(),
                    conn.total_count,
                    conn.page_info.has_next_page
                );
                pagination.advance(conn.total_count, conn.page_info.end_cursor);
                conn.nodes
            }
            Err(e) => {
                warn!("failed to fetch page {page}: {e}");
                let cursor = pagination.cursor.as_deref().unwrap_or("<start>");
                warn!("next page will reuse cursor {cursor}");
                Vec::new()
            }
        }
    }
}
