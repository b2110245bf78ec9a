//! HTML sanitization for the audit dashboard.
//!
//! Fragments the dashboard renders (evidence excerpts, audit notes) pass
//! through [`sanitize_html`] before insertion. All real cleaning is delegated
//! to the `ammonia` library; this crate binds it to a [`DomContext`] - a
//! document-bearing environment built on the html5ever tree - and provides
//! the degraded fallback used when no such environment exists.
//!
//! Known limitation: without a context (explicit or ambient), the fallback
//! only escapes angle brackets. That neutralizes markup but is not a full
//! sanitizer; callers that need tag and attribute stripping must supply a
//! [`DomContext`] or install an ambient one at startup.

pub mod context;
pub mod dom;
pub mod policy;
pub mod sanitize;

pub use context::{ambient_installed, install_ambient, uninstall_ambient, DomContext};
pub use dom::Document;
pub use policy::SanitizePolicy;
pub use sanitize::{escape_angle_brackets, sanitize_html};
