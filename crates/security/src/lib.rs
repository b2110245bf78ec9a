//! Auditdash security crate
//!
//! Holds the dashboard's content-security policy and the response-hardening
//! headers derived from it. The policy is data, not behavior: the dev/preview
//! server hands the header mapping verbatim to every response it serves.

pub mod csp;
pub mod error;
pub mod headers;

pub use csp::{ContentSecurityPolicy, CspDirective, CspSource, DASHBOARD_CSP};
pub use error::{SecurityError, SecurityResult};
pub use headers::{SecurityHeaders, DASHBOARD_SECURITY_HEADERS};
