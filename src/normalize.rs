//! Normalization of raw pull request nodes into the snapshot tables.
//!
//! [`Catalog`] accumulates pulls in arrival order plus the author, team and
//! reviewer records they reference, counting how many pulls touch each one.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::RepoInfo;
use crate::error::PrsnapError;
use crate::links::extract_links;
use crate::models::{RawAuthor, RawLabel, RawPull, RawTeam, RawUser, RequestedReviewer};
use crate::snapshot::{Author, Label, Milestone, NO_TEAM_ID, Pull, Reviewer, Snapshot, Team};

/// Lookup tables and pull list built up across pages.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    pub authors: BTreeMap<String, Author>,
    pub teams: BTreeMap<String, Team>,
    pub reviewers: BTreeMap<String, Reviewer>,
    pub pulls: Vec<Pull>,
}

fn decode_pull(node: &Value) -> Result<RawPull, PrsnapError> {
    serde_path_to_error::deserialize(node).map_err(|e| {
        let path = e.path().to_string();
        PrsnapError::MalformedPull {
            path: path.into(),
            message: e.into_inner().to_string().into(),
        }
    })
}

fn convert_labels(raw: Vec<RawLabel>) -> Vec<Label> {
    let mut labels: Vec<Label> = raw
        .into_iter()
        .map(|l| Label {
            id: l.id,
            name: l.name,
            color: format!("#{}", l.color),
        })
        .collect();
    // Stable, so equal names keep API order.
    labels.sort_by(|a, b| a.name.cmp(&b.name));
    labels
}

fn team_record(raw: RawTeam) -> Team {
    let (full_name, full_slug) = raw.parent_team.as_ref().map_or_else(
        || (raw.name.clone(), raw.slug.clone()),
        |parent| {
            (
                format!("{}/{}", parent.name, raw.name),
                format!("{}/{}", parent.slug, raw.slug),
            )
        },
    );
    Team {
        id: raw.id,
        name: raw.name,
        avatar: raw.avatar_url.unwrap_or_default(),
        slug: raw.slug,
        full_name,
        full_slug,
        pull_count: 0,
    }
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize every node of one page, in order.
    ///
    /// # Errors
    ///
    /// Returns [`PrsnapError::MalformedPull`] for the first node that does not
    /// have the expected shape. Nodes before it stay ingested.
    pub fn ingest_page(&mut self, nodes: &[Value], repo: &RepoInfo) -> Result<(), PrsnapError> {
        for node in nodes {
            self.ingest(node, repo)?;
        }
        Ok(())
    }

    /// Normalize a single pull request node and append it to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`PrsnapError::MalformedPull`] if the node cannot be decoded or
    /// has no author.
    pub fn ingest(&mut self, node: &Value, repo: &RepoInfo) -> Result<(), PrsnapError> {
        let raw = decode_pull(node)?;
        let author = raw.author.ok_or_else(|| PrsnapError::MalformedPull {
            path: "author".into(),
            message: format!("pull request #{} has no author", raw.number).into(),
        })?;
        let authored_by = self.count_author(author);

        let mut teams = Vec::new();
        let mut reviewers = Vec::new();
        for request in raw.review_requests.nodes {
            match request.requested_reviewer {
                Some(RequestedReviewer::Team(team)) => teams.push(self.count_team(team)),
                Some(RequestedReviewer::User(user)) => reviewers.push(self.count_reviewer(user)),
                Some(RequestedReviewer::Other) | None => {}
            }
        }
        if teams.is_empty() {
            self.teams
                .entry(NO_TEAM_ID.to_owned())
                .or_insert_with(Team::unassigned)
                .pull_count += 1;
            teams.push(NO_TEAM_ID.to_owned());
        }

        self.pulls.push(Pull {
            diff_url: format!("{}.diff", raw.url),
            patch_url: format!("{}.patch", raw.url),
            id: raw.id,
            public_id: raw.number,
            url: raw.url,
            title: raw.title,
            state: raw.state,
            is_draft: raw.is_draft,
            authored_by,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            target_branch: raw.base_ref.map(|r| r.name).unwrap_or_default(),
            mergeable_state: raw.mergeable,
            mergeable_reason: raw.merge_state_status,
            milestone: raw.milestone.map(|m| Milestone {
                id: m.id,
                title: m.title,
                url: m.url,
            }),
            labels: convert_labels(raw.labels.nodes),
            links: extract_links(raw.body.as_deref(), repo),
            teams,
            reviewers,
        });
        Ok(())
    }

    fn count_author(&mut self, raw: RawAuthor) -> String {
        let id = raw.id.clone();
        self.authors
            .entry(raw.id)
            .or_insert_with_key(|id| Author {
                id: id.clone(),
                user: raw.login,
                avatar: raw.avatar_url,
                url: raw.url,
                pull_count: 0,
            })
            .pull_count += 1;
        id
    }

    fn count_team(&mut self, raw: RawTeam) -> String {
        let id = raw.id.clone();
        self.teams
            .entry(id.clone())
            .or_insert_with(|| team_record(raw))
            .pull_count += 1;
        id
    }

    fn count_reviewer(&mut self, raw: RawUser) -> String {
        let id = raw.id.clone();
        self.reviewers
            .entry(raw.id)
            .or_insert_with_key(|id| Reviewer {
                id: id.clone(),
                name: raw.login,
                avatar: raw.avatar_url,
                pull_count: 0,
            })
            .pull_count += 1;
        id
    }

    /// Freeze the catalog into a [`Snapshot`] stamped with `generated_at`
    /// (epoch milliseconds).
    #[must_use]
    pub fn into_snapshot(self, generated_at: i64) -> Snapshot {
        Snapshot {
            generated_at,
            teams: self.teams,
            reviewers: self.reviewers,
            authors: self.authors,
            pulls: self.pulls,
        }
    }
}
