//! Dev/preview server for the audit dashboard.
//!
//! Serves the built dashboard bundle over plain HTTP and hands the
//! security-header mapping verbatim to every response it produces - pages,
//! assets, and error responses alike.

pub mod config;
pub mod error;
pub mod serve;

pub use config::ServerConfig;
pub use error::ServerError;
pub use serve::{run, PreviewServer, RunningServer};
