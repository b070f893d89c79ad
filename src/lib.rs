//! Snapshot the open pull requests of a GitHub repository.
//!
//! The binary walks the repository's open pull requests through the GraphQL
//! API, normalizes them into author, team and reviewer tables, and writes a
//! single JSON document. The modules are public so integration tests can
//! drive each stage against a local server.

pub mod api;
pub mod auth;
pub mod cli_args;
pub mod config;
pub mod driver;
pub mod environment;
pub mod error;
pub mod links;
pub mod models;
pub mod normalize;
pub mod pages;
pub mod queries;
pub mod rate;
pub mod snapshot;

pub use api::{Endpoint, GraphQLClient, Token};
pub use cli_args::SnapshotArgs;
pub use config::{RepoInfo, Settings};
pub use driver::{PipelineState, RunSummary, run};
pub use error::PrsnapError;
pub use links::extract_links;
pub use normalize::Catalog;
pub use pages::Pagination;
pub use snapshot::Snapshot;
