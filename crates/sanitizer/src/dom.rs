//! Minimal document environment over the kuchiki (html5ever) tree.

use std::fmt;

use kuchiki::traits::*;
use kuchiki::NodeRef;

/// A parsed HTML document.
///
/// This is the "document-bearing" half of a [`DomContext`](crate::DomContext):
/// a real tree the sanitizer materializes cleaned fragments into, not a parser
/// of its own.
#[derive(Clone)]
pub struct Document {
    root: NodeRef,
}

impl Document {
    /// Parse an HTML string into a full document tree. html5ever recovers
    /// from any input, so this cannot fail.
    pub fn parse(html: &str) -> Self {
        Self {
            root: kuchiki::parse_html().one(html),
        }
    }

    /// An empty document shell.
    pub fn shell() -> Self {
        Self::parse("<!DOCTYPE html><html><head></head><body></body></html>")
    }

    /// The document root node.
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Concatenated text of every text node in the document.
    pub fn text_contents(&self) -> String {
        self.root.text_contents()
    }

    /// Serialized markup of the body's children - the fragment shape the
    /// dashboard inserts into its own DOM.
    pub fn body_inner_html(&self) -> String {
        let body = match self.root.select_first("body") {
            Ok(body) => body,
            Err(()) => return String::new(),
        };
        let mut out = Vec::new();
        for child in body.as_node().children() {
            if child.serialize(&mut out).is_err() {
                return String::new();
            }
        }
        String::from_utf8(out).unwrap_or_default()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_wraps_fragments_in_a_document() {
        let document = Document::parse("<p>hi</p>");
        assert_eq!(document.body_inner_html(), "<p>hi</p>");
        assert_eq!(document.text_contents(), "hi");
    }

    #[test]
    fn shell_is_empty() {
        let document = Document::shell();
        assert_eq!(document.body_inner_html(), "");
        assert_eq!(document.text_contents(), "");
    }

    #[test]
    fn malformed_markup_still_produces_a_tree() {
        let document = Document::parse("<div><p>unclosed");
        assert!(document.body_inner_html().contains("unclosed"));
    }
}
