//! GraphQL transport.
//!
//! [`GraphQLClient`] posts a query document to the endpoint and decodes the
//! `data` member of the response. It makes exactly one attempt per call;
//! callers decide what a failure means.

mod helpers;
mod types;

use helpers::{BODY_SNIPPET_LEN, VALUE_SNIPPET_LEN, snippet};
pub use types::{Endpoint, GITHUB_GRAPHQL_URL, Query, Token};

use std::time::Duration;

use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::PrsnapError;
use helpers::operation_label;
use types::GraphQLResponse;

/// Media type opting into the merge-state preview fields
/// (`mergeStateStatus`).
pub const MERGE_INFO_PREVIEW: &str = "application/vnd.github.merge-info-preview+json";

fn build_headers(token: &Token) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("prsnap"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static(MERGE_INFO_PREVIEW));
    if !token.is_empty() {
        match HeaderValue::from_str(&format!("token {}", token.as_str())) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            Err(e) => warn!("ignoring GitHub token that is not a valid header value: {e}"),
        }
    }
    headers
}

/// Client for the GitHub GraphQL API.
pub struct GraphQLClient {
    client: reqwest::Client,
    headers: HeaderMap,
    endpoint: Endpoint,
    timeout: Duration,
}

impl GraphQLClient {
    /// Create a client for `endpoint`, authenticating with `token` when it is
    /// not empty.
    #[must_use]
    pub fn new(token: &Token, endpoint: Endpoint, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            headers: build_headers(token),
            endpoint,
            timeout,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Post `query` and return the HTTP status and raw body.
    async fn execute(&self, payload: &Value, operation: &str) -> Result<(u16, String), PrsnapError> {
        let response = self
            .client
            .post(self.endpoint.as_str())
            .headers(self.headers.clone())
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| PrsnapError::RequestContext {
                context: format!("operation {operation}").into(),
                source: e,
            })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PrsnapError::RequestContext {
                context: format!("operation {operation}; status {}", status.as_u16()).into(),
                source: e,
            })?;
        if status != StatusCode::OK {
            return Err(PrsnapError::Status {
                status: status.as_u16(),
                snippet: snippet(&body, BODY_SNIPPET_LEN).into(),
            });
        }
        Ok((status.as_u16(), body))
    }

    /// Decode a response body, logging every GraphQL error it carries.
    ///
    /// Errors embedded in a 200 response do not fail the call: whatever `data`
    /// accompanies them is still decoded.
    fn decode<T>(status: u16, body: &str, operation: &str) -> Result<T, PrsnapError>
    where
        T: DeserializeOwned,
    {
        let envelope: GraphQLResponse<Value> =
            serde_json::from_str(body).map_err(|e| PrsnapError::BadResponseSerde {
                status,
                message: e.to_string().into(),
                snippet: snippet(body, BODY_SNIPPET_LEN).into(),
            })?;
        for err in &envelope.errors {
            let kind = err.kind.as_deref().unwrap_or("unknown");
            warn!("{operation}: GraphQL error ({kind}): {}", err.message);
        }
        let Some(value) = envelope.data else {
            return Err(PrsnapError::EmptyResponse {
                status,
                operation: operation.into(),
                snippet: snippet(body, BODY_SNIPPET_LEN).into(),
            });
        };
        serde_path_to_error::deserialize::<_, T>(&value).map_err(|e| {
            let path = e.path().to_string();
            PrsnapError::BadResponseSerde {
                status,
                message: format!("{} at {path}", e.into_inner()).into(),
                snippet: snippet(&value.to_string(), VALUE_SNIPPET_LEN).into(),
            }
        })
    }

    /// Execute `query` and decode its `data` into `T`.
    ///
    /// The request body is `{"query": ...}` with no variables; paging
    /// arguments are spliced into the document by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`PrsnapError::RequestContext`] on transport failure,
    /// [`PrsnapError::Status`] for anything but HTTP 200,
    /// [`PrsnapError::BadResponseSerde`] when the body or its `data` does not
    /// decode, and [`PrsnapError::EmptyResponse`] when `data` is absent.
    pub async fn post_query<T>(&self, query: impl Into<Query>) -> Result<T, PrsnapError>
    where
        T: DeserializeOwned,
    {
        let query = query.into();
        let operation = operation_label(query.as_str());
        let payload = json!({ "query": query.as_str() });
        debug!("POST {} ({operation})", self.endpoint.as_str());
        let (status, body) = self.execute(&payload, &operation).await?;
        Self::decode(status, &body, &operation)
    }
}
