//! Preview server errors.

use std::net::SocketAddr;
use std::path::PathBuf;

use auditdash_security::SecurityError;

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: hyper::Error,
    },

    #[error("server error: {0}")]
    Http(#[from] hyper::Error),
}
