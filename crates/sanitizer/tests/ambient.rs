//! Ambient-environment behavior, isolated in its own process so the unit
//! tests always observe the uninstalled fallback.

use auditdash_sanitizer::{
    ambient_installed, install_ambient, sanitize_html, uninstall_ambient, SanitizePolicy,
};

#[test]
fn ambient_environment_enables_full_sanitization() {
    assert!(!ambient_installed());
    assert_eq!(sanitize_html(None, "<b>"), "&lt;b&gt;");

    install_ambient(SanitizePolicy::default());
    assert!(ambient_installed());

    let dangerous = r#"<div onclick="alert('xss')">click</div><script>alert(1)</script>"#;
    let cleaned = sanitize_html(None, dangerous);
    assert!(!cleaned.contains("<script>"));
    assert!(!cleaned.contains("onclick"));
    assert!(cleaned.contains("click"));

    uninstall_ambient();
    assert!(!ambient_installed());
    assert_eq!(sanitize_html(None, "<b>"), "&lt;b&gt;");
}
