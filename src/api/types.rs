//! Newtypes and envelopes used by the GraphQL client.

use serde::Deserialize;

pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// A GraphQL document sent verbatim as the request's `query` field.
#[derive(Debug, Clone)]
pub struct Query(String);

impl Query {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Query {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Query {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A GitHub API token; empty means anonymous access.
#[derive(Clone, Default)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Never print the secret itself.
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            f.write_str("Token(<none>)")
        } else {
            f.write_str("Token(<redacted>)")
        }
    }
}

/// A GraphQL endpoint URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self(GITHUB_GRAPHQL_URL.to_owned())
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GraphQLResponse<T> {
    pub(super) data: Option<T>,
    #[serde(default)]
    pub(super) errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GraphQLError {
    pub(super) message: String,
    #[serde(rename = "type")]
    pub(super) kind: Option<String>,
}
