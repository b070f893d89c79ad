//! Test utilities for standing in for the GitHub GraphQL endpoint.
//!
//! [`start_mitm`] runs a local HTTP server whose responses come from a shared
//! handler. [`set_github_responder`] installs a handler that answers rate-limit
//! queries itself and serves pull request pages from a script, recording every
//! request it sees.
#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use assert_cmd::prelude::*;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Request, Response, StatusCode, body::Incoming, header, service::service_fn};
use hyper_util::{rt::TokioExecutor, server::conn::auto};
use serde_json::{Value, json};
use std::io::ErrorKind;
use std::{
    collections::VecDeque,
    net::SocketAddr,
    process::Command,
    sync::{Arc, Mutex},
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

/// Shared handler invoked with each request and its collected body.
pub type Handler = Arc<Mutex<Box<dyn FnMut(&Request<Bytes>) -> Response<Full<Bytes>> + Send>>>;

/// Requests seen by a responder, in arrival order.
pub type RequestLog = Arc<Mutex<Vec<Recorded>>>;

/// Handle returned by [`start_mitm`] for shutting down the server.
pub struct ShutdownHandle {
    join: JoinHandle<()>,
    stop: oneshot::Sender<()>,
}

impl ShutdownHandle {
    /// Signal the server to stop and await shutdown.
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        let _ = self.join.await;
    }
}

/// One GraphQL request as seen by the server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub query: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
}

impl Recorded {
    pub fn is_rate_limit(&self) -> bool {
        self.query.starts_with("query RateLimit")
    }

    pub fn is_page(&self) -> bool {
        self.query.starts_with("query OpenPulls")
    }
}

/// Start an HTTP server forwarding requests to a shared handler.
///
/// # Errors
///
/// Returns an error if the server fails to bind to a local port.
///
/// # Panics
///
/// Panics if the default response cannot be constructed.
#[expect(
    clippy::integer_division_remainder_used,
    reason = "tokio::select! uses % internally"
)]
pub async fn start_mitm() -> Result<(SocketAddr, Handler, ShutdownHandle), std::io::Error> {
    let handler: Handler = Arc::new(Mutex::new(Box::new(|_req| {
        Response::builder()
            .status(404)
            .body(Full::from(Bytes::from_static(b"No handler")))
            .expect("failed to create default response")
    })));
    let handler_clone = handler.clone();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, mut rx) = oneshot::channel();

    let join = tokio::spawn(async move {
        let builder = auto::Builder::new(TokioExecutor::new());
        loop {
            tokio::select! {
                res = listener.accept() => match res {
                    Ok((stream, _)) => {
                        let io = hyper_util::rt::TokioIo::new(stream);
                        let h = handler_clone.clone();
                        let service = service_fn(move |req: Request<Incoming>| {
                            let h = h.clone();
                            async move {
                                let (parts, body) = req.into_parts();
                                let bytes = body.collect().await.map(|b| b.to_bytes()).unwrap_or_default();
                                let req = Request::from_parts(parts, bytes);
                                let mut f = h.lock().expect("lock handler in service");
                                let resp = (f)(&req);
                                Ok::<_, std::convert::Infallible>(resp)
                            }
                        });
                        let builder = builder.clone();
                        tokio::spawn(async move {
                            let _ = builder.serve_connection(io, service).await;
                        });
                    }
                    Err(e) => {
                        eprintln!("accept error: {e}");
                        match e.kind() {
                            ErrorKind::ConnectionAborted
                            | ErrorKind::ConnectionReset
                            | ErrorKind::Interrupted
                            | ErrorKind::WouldBlock => {}
                            _ => break,
                        }
                    }
                },
                _ = &mut rx => break,
            }
        }
    });

    Ok((addr, handler, ShutdownHandle { join, stop: tx }))
}

/// Build a JSON response.
///
/// # Panics
///
/// Panics if building the response fails.
pub fn json_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::from(body))
        .expect("build response")
}

/// Body of a successful `RateLimit` query.
pub fn rate_limit_body() -> String {
    json!({"data": {"rateLimit": {
        "limit": 5000,
        "cost": 1,
        "remaining": 4999,
        "resetAt": "2024-05-01T12:00:00Z"
    }}})
    .to_string()
}

/// Body of a successful `OpenPulls` page.
pub fn pulls_page(total: u32, end_cursor: Option<&str>, nodes: Vec<Value>) -> String {
    json!({"data": {
        "rateLimit": {"limit": 5000, "cost": 1, "remaining": 4998, "resetAt": "2024-05-01T12:00:00Z"},
        "repository": {"pullRequests": {
            "totalCount": total,
            "pageInfo": {"endCursor": end_cursor, "hasNextPage": end_cursor.is_some()},
            "nodes": nodes
        }}
    }})
    .to_string()
}

/// A minimal well-formed pull request node.
pub fn pull_node(number: u64, author: &str) -> Value {
    json!({
        "id": format!("PR_{number}"),
        "number": number,
        "url": format!("https://github.com/godotengine/godot/pull/{number}"),
        "title": format!("Pull {number}"),
        "state": "OPEN",
        "isDraft": false,
        "createdAt": "2024-03-01T10:00:00Z",
        "updatedAt": "2024-03-02T11:30:00Z",
        "baseRef": {"name": "master"},
        "mergeable": "MERGEABLE",
        "mergeStateStatus": "CLEAN",
        "body": format!("Fixes #{}", number + 1000),
        "author": {
            "login": author,
            "avatarUrl": format!("https://avatars/{author}"),
            "url": format!("https://github.com/{author}"),
            "id": format!("U_{author}")
        },
        "milestone": null,
        "labels": {"nodes": [{"id": "L1", "name": "bug", "color": "ff0000"}]},
        "reviewRequests": {"nodes": [{"requestedReviewer": {
            "__typename": "User",
            "id": "U_reviewer",
            "login": "reviewer",
            "avatarUrl": "https://avatars/reviewer"
        }}]}
    })
}

fn header_value(req: &Request<Bytes>, name: header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Answer rate-limit queries with `rate` (or HTTP 502 when `None`) and serve
/// `pages` to page queries in order.
///
/// Requests beyond the scripted pages get HTTP 500. Returns the log of every
/// request received.
///
/// # Panics
///
/// Panics if a request body is not JSON or building a response fails.
pub fn set_github_responder(
    handler: &Handler,
    rate: Option<String>,
    pages: Vec<(StatusCode, String)>,
) -> RequestLog {
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let log_clone = Arc::clone(&log);
    let mut pages = VecDeque::from(pages);
    *handler.lock().expect("lock handler") = Box::new(move |req: &Request<Bytes>| {
        let body: Value = serde_json::from_slice(req.body()).expect("JSON request body");
        let recorded = Recorded {
            query: body
                .get("query")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            authorization: header_value(req, header::AUTHORIZATION),
            accept: header_value(req, header::ACCEPT),
        };
        let response = if recorded.is_rate_limit() {
            rate.clone().map_or_else(
                || json_response(StatusCode::BAD_GATEWAY, "{}".to_owned()),
                |body| json_response(StatusCode::OK, body),
            )
        } else {
            let (status, body) = pages.pop_front().unwrap_or_else(|| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    r#"{"message":"unexpected request"}"#.to_owned(),
                )
            });
            json_response(status, body)
        };
        log_clone.lock().expect("lock log").push(recorded);
        response
    });
    log
}

/// Page queries from `log`, in order.
///
/// # Panics
///
/// Panics if the log mutex is poisoned.
pub fn page_queries(log: &RequestLog) -> Vec<String> {
    log.lock()
        .expect("lock log")
        .iter()
        .filter(|r| r.is_page())
        .map(|r| r.query.clone())
        .collect()
}

/// Create a `prsnap` command pointed at the local server.
///
/// Token variables are cleared so each test decides whether to authenticate,
/// and configuration discovery is confined to `home`.
#[allow(
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    reason = "helper for integration tests"
)]
pub fn prsnap_cmd(addr: SocketAddr, home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("prsnap").expect("binary");
    cmd.env("GITHUB_GRAPHQL_URL", format!("http://{addr}/graphql"))
        .env_remove("GITHUB_TOKEN")
        .env_remove("PRSNAP_GITHUB_TOKEN")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .current_dir(home);
    cmd
}
