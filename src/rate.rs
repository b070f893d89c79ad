//! Rate-limit reporting.
//!
//! Purely observational: nothing here gates or delays requests.

use log::{info, warn};

use crate::api::GraphQLClient;
use crate::models::{RateLimit, RateLimitData};
use crate::queries::RATE_LIMIT_QUERY;

/// Render rate-limit figures as a single log line.
#[must_use]
pub fn describe_rate_limit(rate: &RateLimit) -> String {
    format!(
        "API rate limit: cost {}, remaining {}/{}, resets at {}",
        rate.cost,
        rate.remaining,
        rate.limit,
        rate.reset_at.to_rfc3339()
    )
}

pub fn log_rate_limit(rate: &RateLimit) {
    info!("{}", describe_rate_limit(rate));
}

/// Points spent between two checks of the same rate-limit window.
///
/// `None` when the window reset in between, since the figures no longer
/// share a baseline.
#[must_use]
pub fn points_spent(before: &RateLimit, after: &RateLimit) -> Option<u32> {
    (before.reset_at == after.reset_at).then(|| before.remaining.saturating_sub(after.remaining))
}

/// Query the current rate limit and log it.
///
/// Failures are logged and yield `None`.
pub async fn check_rate_limit(client: &GraphQLClient) -> Option<RateLimit> {
    match client.post_query::<RateLimitData>(RATE_LIMIT_QUERY).await {
        Ok(RateLimitData {
            rate_limit: Some(rate),
        }) => {
            log_rate_limit(&rate);
            Some(rate)
        }
        Ok(RateLimitData { rate_limit: None }) => {
            warn!("rate limit check returned no figures");
            None
        }
        Err(e) => {
            warn!("rate limit check failed: {e}");
            None
        }
    }
}
