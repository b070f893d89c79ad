//! The JSON snapshot written at the end of a run.
//!
//! Entities reference each other by id: a [`Pull`] names its author, teams
//! and reviewers, and the matching records live in the top-level maps of
//! [`Snapshot`].

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::error::PrsnapError;

/// Id of the sentinel team referenced by pulls with no team review request.
pub const NO_TEAM_ID: &str = "";
pub const NO_TEAM_NAME: &str = "No team assigned";
pub const NO_TEAM_SLUG: &str = "_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub user: String,
    pub avatar: String,
    pub url: String,
    pub pull_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub slug: String,
    pub full_name: String,
    pub full_slug: String,
    pub pull_count: u32,
}

impl Team {
    /// The "no team assigned" placeholder, with a zero count.
    #[must_use]
    pub fn unassigned() -> Self {
        Self {
            id: NO_TEAM_ID.to_owned(),
            name: NO_TEAM_NAME.to_owned(),
            avatar: String::new(),
            slug: NO_TEAM_SLUG.to_owned(),
            full_name: NO_TEAM_NAME.to_owned(),
            full_slug: NO_TEAM_SLUG.to_owned(),
            pull_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviewer {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub pull_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub name: String,
    /// `#`-prefixed hex colour.
    pub color: String,
}

/// Canonical linking keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKeyword {
    Closes,
    Fixes,
    Resolves,
}

/// An issue reference found in a pull request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub full_match: String,
    pub keyword: LinkKeyword,
    pub repo: String,
    pub issue: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pull {
    pub id: String,
    pub public_id: u64,
    pub url: String,
    pub diff_url: String,
    pub patch_url: String,
    pub title: String,
    pub state: String,
    pub is_draft: bool,
    pub authored_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub target_branch: String,
    pub mergeable_state: String,
    pub mergeable_reason: Option<String>,
    pub milestone: Option<Milestone>,
    pub labels: Vec<Label>,
    pub links: Vec<Link>,
    pub teams: Vec<String>,
    pub reviewers: Vec<String>,
}

/// Everything written to the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Milliseconds since the Unix epoch.
    pub generated_at: i64,
    pub teams: BTreeMap<String, Team>,
    pub reviewers: BTreeMap<String, Reviewer>,
    pub authors: BTreeMap<String, Author>,
    pub pulls: Vec<Pull>,
}

/// Serialize `snapshot` as pretty-printed JSON to any writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_snapshot<W: Write>(mut out: W, snapshot: &Snapshot) -> Result<(), PrsnapError> {
    serde_json::to_writer_pretty(&mut out, snapshot)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write `snapshot` to `path`, creating missing parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), PrsnapError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_snapshot(std::io::BufWriter::new(file), snapshot)
}

/// Best-effort [`save_snapshot`]: failures are logged, never returned.
///
/// Returns whether the file was written.
pub fn persist_snapshot(path: &Path, snapshot: &Snapshot) -> bool {
    match save_snapshot(path, snapshot) {
        Ok(()) => {
            info!(
                "wrote {} pulls, {} authors, {} teams, {} reviewers to {}",
                snapshot.pulls.len(),
                snapshot.authors.len(),
                snapshot.teams.len(),
                snapshot.reviewers.len(),
                path.display()
            );
            true
        }
        Err(e) => {
            error!("failed to write snapshot to {}: {e}", path.display());
            false
        }
    }
}
