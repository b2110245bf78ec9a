//! Allowlist policy handed to the ammonia sanitizer.

use std::collections::HashSet;

use ammonia::Builder;

/// Elements that execute or host script. Stripped no matter what the
/// allowlists say.
const SCRIPT_BEARING_ELEMENTS: [&str; 6] =
    ["script", "style", "iframe", "object", "embed", "frame"];

/// URL schemes that execute script when dereferenced.
const SCRIPT_SCHEMES: [&str; 2] = ["javascript", "vbscript"];

/// Allowlists applied when cleaning dashboard HTML fragments.
#[derive(Debug, Clone)]
pub struct SanitizePolicy {
    allowed_elements: HashSet<String>,
    allowed_attributes: HashSet<String>,
    allowed_schemes: HashSet<String>,
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        let allowed_elements = [
            "a", "abbr", "article", "aside", "b", "blockquote", "br", "caption", "code", "col",
            "colgroup", "dd", "del", "details", "div", "dl", "dt", "em", "figcaption", "figure",
            "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "i", "img", "ins", "li",
            "main", "mark", "nav", "ol", "p", "pre", "q", "s", "section", "small", "span",
            "strong", "sub", "sup", "table", "tbody", "td", "tfoot", "th", "thead", "time", "tr",
            "u", "ul",
        ];
        let allowed_attributes = [
            "alt", "class", "colspan", "datetime", "dir", "height", "href", "id", "lang",
            "rowspan", "src", "title", "width",
        ];
        let allowed_schemes = ["https", "data", "mailto"];
        Self::new(allowed_elements, allowed_attributes, allowed_schemes)
    }
}

impl SanitizePolicy {
    /// Build a policy from explicit allowlists. Entries are lowercased.
    pub fn new<E, A, S>(elements: E, attributes: A, schemes: S) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        Self {
            allowed_elements: lowercase_set(elements),
            allowed_attributes: lowercase_set(attributes),
            allowed_schemes: lowercase_set(schemes),
        }
    }

    pub fn is_element_allowed(&self, element: &str) -> bool {
        let element = element.to_lowercase();
        !SCRIPT_BEARING_ELEMENTS.contains(&element.as_str())
            && self.allowed_elements.contains(&element)
    }

    pub fn is_attribute_allowed(&self, attribute: &str) -> bool {
        let attribute = attribute.to_lowercase();
        !attribute.starts_with("on") && self.allowed_attributes.contains(&attribute)
    }

    pub fn is_scheme_allowed(&self, scheme: &str) -> bool {
        let scheme = scheme.to_lowercase();
        !SCRIPT_SCHEMES.contains(&scheme.as_str()) && self.allowed_schemes.contains(&scheme)
    }

    /// Clean an HTML fragment with this policy.
    pub fn clean(&self, html: &str) -> String {
        self.builder().clean(html).to_string()
    }

    /// Configure an ammonia builder from the allowlists.
    ///
    /// Script-bearing elements and `on*` attributes are filtered out here,
    /// not just absent from the defaults, so a widened policy still cannot
    /// reintroduce them. Dropping `script`/`style` also keeps the tag set
    /// disjoint from ammonia's clean-content tags, which it insists on.
    fn builder(&self) -> Builder<'_> {
        let tags: HashSet<&str> = self
            .allowed_elements
            .iter()
            .map(String::as_str)
            .filter(|tag| !SCRIPT_BEARING_ELEMENTS.contains(tag))
            .collect();
        let attributes: HashSet<&str> = self
            .allowed_attributes
            .iter()
            .map(String::as_str)
            .filter(|attr| !attr.starts_with("on"))
            .collect();
        let schemes: HashSet<&str> = self
            .allowed_schemes
            .iter()
            .map(String::as_str)
            .filter(|scheme| !SCRIPT_SCHEMES.contains(scheme))
            .collect();

        let mut builder = Builder::default();
        builder
            .tags(tags)
            .generic_attributes(attributes)
            .url_schemes(schemes);
        builder
    }
}

fn lowercase_set<I>(items: I) -> HashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().to_lowercase())
        .collect()
}
