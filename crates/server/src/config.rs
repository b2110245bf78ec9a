//! Preview server configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use auditdash_security::SecurityHeaders;

use crate::error::ServerError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the server binds to. Port 0 picks an ephemeral port.
    pub bind: SocketAddr,
    /// Directory holding the built dashboard bundle.
    pub root: PathBuf,
    /// File served for `/`.
    pub index: String,
    /// Serve the index for extension-less paths (client-side routing).
    pub spa_fallback: bool,
    /// Headers applied to every response.
    pub headers: SecurityHeaders,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 4173)),
            root: PathBuf::from("dist"),
            index: "index.html".to_string(),
            spa_fallback: true,
            headers: SecurityHeaders::default(),
        }
    }
}

impl ServerConfig {
    /// Load a JSON config file. Absent fields keep their defaults; header
    /// overrides are validated before they can reach a response.
    pub fn from_file(path: &Path) -> Result<Self, ServerError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ServerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ServerConfig = serde_json::from_str(&raw)?;
        config.headers.validate()?;
        Ok(config)
    }
}
