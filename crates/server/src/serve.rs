//! The hyper service behind the preview server.
//!
//! Static files only, confined to the bundle root; the security headers from
//! the config are stamped onto every response before it leaves, including
//! 404s and method rejections.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use hyper::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use log::{debug, info, warn};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use auditdash_security::SecurityHeaders;

use crate::config::ServerConfig;
use crate::error::ServerError;

/// A configured, not-yet-bound preview server.
pub struct PreviewServer {
    config: ServerConfig,
}

/// A server bound and serving on a background task.
pub struct RunningServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), hyper::Error>>,
}

impl PreviewServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Bind the configured address and start serving. Must be called from a
    /// tokio runtime.
    pub fn start(self) -> Result<RunningServer, ServerError> {
        let bind = self.config.bind;
        let config = Arc::new(self.config);
        let make_svc = make_service_fn(move |_conn| {
            let config = Arc::clone(&config);
            async move {
                Ok::<_, Infallible>(service_fn(move |req| {
                    let config = Arc::clone(&config);
                    async move { Ok::<_, Infallible>(handle_request(req, &config).await) }
                }))
            }
        });

        let builder = Server::try_bind(&bind).map_err(|source| ServerError::Bind {
            addr: bind,
            source,
        })?;
        let server = builder.serve(make_svc);
        let addr = server.local_addr();
        let (tx, rx) = oneshot::channel();
        let graceful = server.with_graceful_shutdown(async {
            let _ = rx.await;
        });
        let handle = tokio::spawn(graceful);
        info!("dashboard preview listening on http://{}", addr);
        Ok(RunningServer {
            addr,
            shutdown: Some(tx),
            handle,
        })
    }
}

impl RunningServer {
    /// The address actually bound (resolves port 0).
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signal shutdown and wait for in-flight requests to drain.
    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.handle.await {
            Ok(result) => result.map_err(ServerError::Http),
            Err(join_error) => {
                warn!("server task did not complete cleanly: {}", join_error);
                Ok(())
            }
        }
    }
}

/// Serve until ctrl-c.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let server = PreviewServer::new(config).start()?;
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("failed to listen for ctrl-c; shutting down immediately");
    }
    info!("shutting down");
    server.shutdown().await
}

async fn handle_request(req: Request<Body>, config: &ServerConfig) -> Response<Body> {
    let method = req.method().clone();
    debug!("{} {}", method, req.uri().path());

    let mut response = if method == Method::GET || method == Method::HEAD {
        serve_path(req.uri().path(), config).await
    } else {
        status_page(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
    };

    if method == Method::HEAD {
        *response.body_mut() = Body::empty();
    }
    apply_security_headers(&mut response, &config.headers);
    response
}

async fn serve_path(uri_path: &str, config: &ServerConfig) -> Response<Body> {
    let relative = match resolve(uri_path, &config.index) {
        Some(relative) => relative,
        None => {
            warn!("rejected request path {:?}", uri_path);
            return status_page(StatusCode::FORBIDDEN, "forbidden");
        }
    };

    let full = config.root.join(&relative);
    match tokio::fs::read(&full).await {
        Ok(bytes) => file_response(bytes, content_type_for(&relative)),
        Err(_) if config.spa_fallback && wants_html(&relative) => {
            let index = config.root.join(&config.index);
            match tokio::fs::read(&index).await {
                Ok(bytes) => file_response(bytes, "text/html; charset=utf-8"),
                Err(_) => status_page(StatusCode::NOT_FOUND, "not found"),
            }
        }
        Err(_) => status_page(StatusCode::NOT_FOUND, "not found"),
    }
}

/// Map a request path to a path relative to the bundle root.
///
/// Anything that could escape the root is rejected outright: parent/rooted
/// components, backslashes, NULs, and percent-escapes (bundle filenames are
/// plain, so there is nothing legitimate to decode).
fn resolve(uri_path: &str, index: &str) -> Option<PathBuf> {
    let trimmed = uri_path.trim_start_matches('/');
    let target = if trimmed.is_empty() { index } else { trimmed };
    if target.contains('\\') || target.contains('\0') || target.contains('%') {
        return None;
    }
    let mut relative = PathBuf::new();
    for component in Path::new(target).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(relative)
}

fn wants_html(relative: &Path) -> bool {
    match relative.extension().and_then(|e| e.to_str()) {
        None => true,
        Some(ext) => ext.eq_ignore_ascii_case("html"),
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript",
        Some("css") => "text/css; charset=utf-8",
        Some("json") | Some("map") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        Some("woff") => "font/woff",
        Some("wasm") => "application/wasm",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

fn file_response(bytes: Vec<u8>, content_type: &'static str) -> Response<Body> {
    let mut response = Response::new(Body::from(bytes));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn status_page(status: StatusCode, message: &'static str) -> Response<Body> {
    let mut response = Response::new(Body::from(message));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}

/// Stamp the configured header mapping onto a response, as-is.
fn apply_security_headers(response: &mut Response<Body>, headers: &SecurityHeaders) {
    for (name, value) in headers.pairs() {
        let name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(name) => name,
            Err(_) => continue,
        };
        match HeaderValue::from_str(value) {
            Ok(value) => {
                response.headers_mut().insert(name, value);
            }
            Err(_) => warn!("skipping unsendable value for header {}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_maps_root_to_index() {
        assert_eq!(
            resolve("/", "index.html"),
            Some(PathBuf::from("index.html"))
        );
        assert_eq!(
            resolve("/assets/app.js", "index.html"),
            Some(PathBuf::from("assets/app.js"))
        );
    }

    #[test]
    fn resolve_rejects_escapes() {
        assert_eq!(resolve("/../etc/passwd", "index.html"), None);
        assert_eq!(resolve("/a/../../b", "index.html"), None);
        assert_eq!(resolve("/a\\b", "index.html"), None);
        assert_eq!(resolve("/%2e%2e/secret", "index.html"), None);
        assert_eq!(resolve("/a/%00", "index.html"), None);
    }

    #[test]
    fn resolve_collapses_current_dir() {
        assert_eq!(
            resolve("/./assets/./logo.svg", "index.html"),
            Some(PathBuf::from("assets/logo.svg"))
        );
    }

    #[test]
    fn content_types() {
        assert_eq!(
            content_type_for(Path::new("index.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("app.mjs")), "text/javascript");
        assert_eq!(
            content_type_for(Path::new("data.bin")),
            "application/octet-stream"
        );
    }

    #[test]
    fn html_navigations_want_fallback() {
        assert!(wants_html(Path::new("evidence/123")));
        assert!(wants_html(Path::new("page.html")));
        assert!(!wants_html(Path::new("app.js")));
    }

    #[test]
    fn security_headers_are_applied_verbatim() {
        let mut response = Response::new(Body::empty());
        apply_security_headers(&mut response, &SecurityHeaders::default());
        assert_eq!(
            response
                .headers()
                .get("Content-Security-Policy")
                .and_then(|v| v.to_str().ok()),
            Some(auditdash_security::DASHBOARD_CSP)
        );
        assert_eq!(response.headers().len(), 4);
    }
}
