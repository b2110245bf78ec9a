//! DOM-context handles binding the sanitizer to a document environment.

use std::fmt;
use std::sync::RwLock;

use lazy_static::lazy_static;

use crate::dom::Document;
use crate::policy::SanitizePolicy;

lazy_static! {
    // The ambient environment holds only the policy: documents are created
    // per call, and the kuchiki tree is not Send.
    static ref AMBIENT_POLICY: RwLock<Option<SanitizePolicy>> = RwLock::new(None);
}

/// A handle to a document-bearing environment the sanitizer binds to.
///
/// Holds the allowlist policy plus an (initially empty) [`Document`] shell;
/// [`DomContext::parse`] creates further documents in this environment.
pub struct DomContext {
    document: Document,
    policy: SanitizePolicy,
}

impl DomContext {
    /// A context with the dashboard's default allowlists.
    pub fn new() -> Self {
        Self::with_policy(SanitizePolicy::default())
    }

    pub fn with_policy(policy: SanitizePolicy) -> Self {
        Self {
            document: Document::shell(),
            policy,
        }
    }

    /// The document this context exposes.
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn policy(&self) -> &SanitizePolicy {
        &self.policy
    }

    /// Parse markup into a new document in this environment.
    pub fn parse(&self, html: &str) -> Document {
        Document::parse(html)
    }
}

impl Default for DomContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DomContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomContext")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Install a process-wide ambient environment, used by
/// [`sanitize_html`](crate::sanitize_html) when no explicit context is given.
/// Nothing is installed by default: headless callers that skip this get the
/// escaping fallback.
pub fn install_ambient(policy: SanitizePolicy) {
    *AMBIENT_POLICY.write().unwrap() = Some(policy);
}

/// Remove the ambient environment again.
pub fn uninstall_ambient() {
    *AMBIENT_POLICY.write().unwrap() = None;
}

/// Whether an ambient environment is currently installed.
pub fn ambient_installed() -> bool {
    AMBIENT_POLICY.read().unwrap().is_some()
}

/// Materialize a context from the ambient policy, if one is installed.
pub(crate) fn ambient_context() -> Option<DomContext> {
    AMBIENT_POLICY
        .read()
        .unwrap()
        .as_ref()
        .map(|policy| DomContext::with_policy(policy.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_exposes_an_empty_document() {
        let ctx = DomContext::new();
        assert_eq!(ctx.document().text_contents(), "");
        assert!(ctx.policy().is_element_allowed("div"));
    }

    #[test]
    fn parse_creates_documents_in_the_environment() {
        let ctx = DomContext::new();
        let document = ctx.parse("<span>evidence</span>");
        assert_eq!(document.body_inner_html(), "<span>evidence</span>");
    }
}
