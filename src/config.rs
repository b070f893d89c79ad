//! Configuration loading and resolution.
//!
//! [`load_from_iter`] layers the command line over `PRSNAP_*` environment
//! variables, over a configuration file, over nothing; [`Settings::from_args`] then fills in compiled-in
//! defaults and validates the values the pipeline depends on.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use std::ffi::OsString;

use ortho_config::OrthoConfig;

use crate::api::{Endpoint, Token};
use crate::cli_args::SnapshotArgs;
use crate::environment;
use crate::error::PrsnapError;

/// Repository snapshotted when none is configured.
pub const DEFAULT_REPO: &str = "godotengine/godot";
/// Where the snapshot lands when no output path is configured.
pub const DEFAULT_OUTPUT: &str = "out/data.json";
/// GitHub caps connection pages at 100 nodes.
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// An `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    pub owner: String,
    pub name: String,
}

impl RepoInfo {
    /// Parse `owner/name`, tolerating a trailing `.git`.
    ///
    /// # Errors
    ///
    /// Returns [`PrsnapError::InvalidRepo`] unless the input has exactly two
    /// non-empty segments.
    pub fn parse(input: &str) -> Result<Self, PrsnapError> {
        let trimmed = input.trim();
        let mut parts = trimmed.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                let name = name.strip_suffix(".git").unwrap_or(name);
                Ok(Self {
                    owner: owner.to_owned(),
                    name: name.to_owned(),
                })
            }
            _ => Err(PrsnapError::InvalidRepo(trimmed.into())),
        }
    }
}

impl fmt::Display for RepoInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Fully resolved settings for one snapshot run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub repo: RepoInfo,
    pub output: PathBuf,
    pub page_size: u32,
    pub token: Token,
    pub endpoint: Endpoint,
    pub http_timeout: Duration,
}

impl Settings {
    /// Resolve `args` against the compiled-in defaults.
    ///
    /// The page size is clamped to `1..=MAX_PAGE_SIZE`. The endpoint honours
    /// `GITHUB_GRAPHQL_URL` so tests can point the run at a local server.
    ///
    /// # Errors
    ///
    /// Returns [`PrsnapError::InvalidRepo`] if the configured repository is not
    /// `owner/name`.
    pub fn from_args(args: &SnapshotArgs) -> Result<Self, PrsnapError> {
        let repo = RepoInfo::parse(args.repo.as_deref().unwrap_or(DEFAULT_REPO))?;
        let page_size = args
            .page_size
            .unwrap_or(MAX_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let endpoint = environment::var("GITHUB_GRAPHQL_URL")
            .map(Endpoint::new)
            .unwrap_or_default();
        Ok(Self {
            repo,
            output: args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            page_size,
            token: Token::new(crate::auth::resolve_github_token(args)),
            endpoint,
            http_timeout: Duration::from_secs(
                args.http_timeout.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
        })
    }
}

/// Load [`SnapshotArgs`] from `args` (program name first) layered over
/// `PRSNAP_*` environment variables and the first configuration file found
/// (`PRSNAP_CONFIG_PATH`, `.prsnap.toml`, or the XDG config directory).
///
/// # Errors
///
/// Returns [`PrsnapError::Config`] when the arguments do not parse or a
/// configuration source cannot be read.
pub fn load_from_iter<I, T>(args: I) -> Result<SnapshotArgs, PrsnapError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Ok(<SnapshotArgs as OrthoConfig>::load_from_iter(args)?)
}
