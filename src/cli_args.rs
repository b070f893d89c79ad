//! Command-line argument structures.
//!
//! Every option is optional: running `prsnap` bare snapshots the default
//! repository with compiled-in settings. Values merge as
//! defaults < config file < `PRSNAP_*` environment < CLI, through the
//! loader generated by `OrthoConfig`.

use clap::Parser;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

/// Options for a snapshot run.
#[derive(Parser, Deserialize, Serialize, Default, Debug, OrthoConfig, Clone)]
#[command(
    name = "prsnap",
    about = "Snapshot open pull requests, authors and reviewers to JSON"
)]
#[ortho_config(prefix = "PRSNAP")]
pub struct SnapshotArgs {
    /// Repository to snapshot, as `owner/name`
    #[arg(long)]
    pub repo: Option<String>,
    /// Path of the JSON snapshot to write
    #[arg(long, value_name = "PATH")]
    pub output: Option<std::path::PathBuf>,
    /// Pull requests requested per page (1-100)
    #[arg(long, value_name = "N")]
    pub page_size: Option<u32>,
    /// GitHub token for authenticated API requests
    #[arg(long, value_name = "TOKEN")]
    pub github_token: Option<String>,
    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub http_timeout: Option<u64>,
}
