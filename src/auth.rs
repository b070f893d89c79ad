//! Authentication helpers for GitHub token resolution.
//!
//! Token resolution prefers explicit configuration (CLI/config file), then
//! `PRSNAP_GITHUB_TOKEN`, and finally `GITHUB_TOKEN`. Empty values are ignored.
//! An empty result means anonymous access with GitHub's lower rate limit.

use crate::cli_args::SnapshotArgs;
use crate::environment;

#[must_use]
pub fn resolve_github_token(args: &SnapshotArgs) -> String {
    args.github_token
        .as_deref()
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .or_else(|| environment::non_empty_var("PRSNAP_GITHUB_TOKEN"))
        .or_else(|| environment::non_empty_var("GITHUB_TOKEN"))
        .unwrap_or_default()
}
