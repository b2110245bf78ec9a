//! The sanitization entry point used by dashboard rendering.

use log::warn;

use crate::context::{ambient_context, DomContext};

/// Clean an HTML fragment before it is inserted into the dashboard DOM.
///
/// With a [`DomContext`] - explicit, or ambient via
/// [`install_ambient`](crate::install_ambient) - cleaning is delegated to
/// ammonia: script-executing elements and event-handler attributes are
/// removed while benign content is preserved. Without one, the input is
/// returned with `<` and `>` escaped. That fallback neutralizes markup but
/// is weaker than full sanitization; it never fails, and neither does this
/// function.
pub fn sanitize_html(ctx: Option<&DomContext>, html: &str) -> String {
    if let Some(ctx) = ctx {
        return clean_in_context(ctx, html);
    }
    if let Some(ambient) = ambient_context() {
        return clean_in_context(&ambient, html);
    }
    warn!("no DOM context available; falling back to angle-bracket escaping");
    escape_angle_brackets(html)
}

fn clean_in_context(ctx: &DomContext, html: &str) -> String {
    let cleaned = ctx.policy().clean(html);
    // Materialize the cleaned fragment in the context's environment and hand
    // back the body markup, the shape the dashboard inserts.
    ctx.parse(&cleaned).body_inner_html()
}

/// Degraded fallback: neutralize tags without parsing anything. Only `<` and
/// `>` are rewritten; entity references in the input pass through untouched.
pub fn escape_angle_brackets(html: &str) -> String {
    html.replace('<', "&lt;").replace('>', "&gt;")
}
