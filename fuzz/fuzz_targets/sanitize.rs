#![no_main]
//! Sanitizer fuzzing
//!
//! Whatever the input, sanitization must not panic, must be idempotent, and
//! the no-context fallback must leave no raw angle brackets behind.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use auditdash_sanitizer::{sanitize_html, DomContext, SanitizePolicy};

/// Sanitizer fuzzing input
#[derive(Debug, Arbitrary)]
struct SanitizeFuzzInput {
    /// Raw fragment handed to the sanitizer
    html: String,
    /// Extra allowlist entries a caller might configure
    extra_elements: Vec<String>,
    extra_attributes: Vec<String>,
}

fuzz_target!(|input: SanitizeFuzzInput| {
    // Skip excessively large inputs to prevent timeout
    if input.html.len() > 50_000 {
        return;
    }

    // Default policy: cleaning must be idempotent
    let ctx = DomContext::new();
    let cleaned = sanitize_html(Some(&ctx), &input.html);
    assert_eq!(sanitize_html(Some(&ctx), &cleaned), cleaned);

    // A caller-widened policy must never panic, even with hostile allowlists
    let mut elements = vec!["div".to_string(), "script".to_string()];
    elements.extend(input.extra_elements.into_iter().take(8));
    let mut attributes = vec!["onclick".to_string()];
    attributes.extend(input.extra_attributes.into_iter().take(8));
    let widened = DomContext::with_policy(SanitizePolicy::new(
        elements,
        attributes,
        ["https".to_string(), "javascript".to_string()],
    ));
    let _ = sanitize_html(Some(&widened), &input.html);

    // No context at all: everything angle-bracketed is neutralized
    let fallback = sanitize_html(None, &input.html);
    assert!(!fallback.contains('<'));
    assert!(!fallback.contains('>'));
});
