//! Content-Security-Policy model for the audit dashboard.
//!
//! The dashboard ships one fixed policy. The typed model below exists so the
//! header value is assembled and validated in one place instead of being
//! string-pasted wherever a server or test needs it; [`DASHBOARD_CSP`] is the
//! canonical rendering that external tooling pins byte-for-byte.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SecurityError;

/// The dashboard's Content-Security-Policy header value.
///
/// External tooling and tests depend on the literal content of this string;
/// [`ContentSecurityPolicy::dashboard_default`] renders to exactly this value.
pub const DASHBOARD_CSP: &str = "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; object-src 'none'; frame-ancestors 'none'; base-uri 'self'; form-action 'self'";

/// A single CSP source expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CspSource {
    /// `'self'` - the dashboard's own origin.
    SelfOrigin,
    /// `'none'` - no source is allowed.
    None,
    /// `'unsafe-inline'`.
    UnsafeInline,
    /// A scheme source such as `data:`; stored without the trailing colon.
    Scheme(String),
    /// A host source such as `cdn.example.com`.
    Host(String),
}

impl CspSource {
    /// Parse a single source token as it appears inside a directive.
    ///
    /// Keyword sources other than `'self'`, `'none'` and `'unsafe-inline'`
    /// (nonces, hashes, `'unsafe-eval'`, ...) are rejected: the dashboard
    /// policy never uses them, and refusing them keeps misconfigured
    /// overrides from silently weakening the policy.
    pub fn parse(token: &str) -> Result<Self, SecurityError> {
        match token {
            "" => Err(SecurityError::InvalidSource {
                expr: token.to_string(),
            }),
            "'self'" => Ok(CspSource::SelfOrigin),
            "'none'" => Ok(CspSource::None),
            "'unsafe-inline'" => Ok(CspSource::UnsafeInline),
            _ => {
                if let Some(scheme) = token.strip_suffix(':') {
                    let valid = !scheme.is_empty()
                        && scheme
                            .chars()
                            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
                    if valid {
                        return Ok(CspSource::Scheme(scheme.to_string()));
                    }
                    return Err(SecurityError::InvalidSource {
                        expr: token.to_string(),
                    });
                }
                let hostile = token.starts_with('\'')
                    || token.chars().any(|c| {
                        c == ';' || c == '\'' || c.is_ascii_whitespace() || c.is_ascii_control()
                    });
                if hostile {
                    return Err(SecurityError::InvalidSource {
                        expr: token.to_string(),
                    });
                }
                Ok(CspSource::Host(token.to_string()))
            }
        }
    }
}

impl fmt::Display for CspSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CspSource::SelfOrigin => write!(f, "'self'"),
            CspSource::None => write!(f, "'none'"),
            CspSource::UnsafeInline => write!(f, "'unsafe-inline'"),
            CspSource::Scheme(scheme) => write!(f, "{}:", scheme),
            CspSource::Host(host) => write!(f, "{}", host),
        }
    }
}

/// One directive: a name plus its source list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CspDirective {
    name: String,
    sources: Vec<CspSource>,
}

impl CspDirective {
    /// Build a directive, validating the name.
    pub fn new(name: &str, sources: Vec<CspSource>) -> Result<Self, SecurityError> {
        validate_name(name)?;
        Ok(Self {
            name: name.to_string(),
            sources,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sources(&self) -> &[CspSource] {
        &self.sources
    }

    /// Parse one `name source source ...` segment. Valueless directives are
    /// accepted; CSP has several.
    fn parse(segment: &str) -> Result<Self, SecurityError> {
        let mut tokens = segment.split_ascii_whitespace();
        let name = tokens.next().ok_or(SecurityError::EmptyDirective)?;
        validate_name(name)?;
        let sources = tokens
            .map(CspSource::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: name.to_string(),
            sources,
        })
    }

    fn literal(name: &str, sources: Vec<CspSource>) -> Self {
        Self {
            name: name.to_string(),
            sources,
        }
    }
}

impl fmt::Display for CspDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for source in &self.sources {
            write!(f, " {}", source)?;
        }
        Ok(())
    }
}

/// An ordered set of directives with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSecurityPolicy {
    directives: Vec<CspDirective>,
}

impl ContentSecurityPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// The dashboard policy. Renders to [`DASHBOARD_CSP`].
    pub fn dashboard_default() -> Self {
        let directives = vec![
            CspDirective::literal("default-src", vec![CspSource::SelfOrigin]),
            CspDirective::literal("script-src", vec![CspSource::SelfOrigin]),
            CspDirective::literal(
                "style-src",
                vec![CspSource::SelfOrigin, CspSource::UnsafeInline],
            ),
            CspDirective::literal(
                "img-src",
                vec![CspSource::SelfOrigin, CspSource::Scheme("data".to_string())],
            ),
            CspDirective::literal("connect-src", vec![CspSource::SelfOrigin]),
            CspDirective::literal("object-src", vec![CspSource::None]),
            CspDirective::literal("frame-ancestors", vec![CspSource::None]),
            CspDirective::literal("base-uri", vec![CspSource::SelfOrigin]),
            CspDirective::literal("form-action", vec![CspSource::SelfOrigin]),
        ];
        Self { directives }
    }

    /// Append a directive, rejecting duplicates.
    pub fn with_directive(
        mut self,
        name: &str,
        sources: Vec<CspSource>,
    ) -> Result<Self, SecurityError> {
        if self.directive(name).is_some() {
            return Err(SecurityError::DuplicateDirective {
                name: name.to_string(),
            });
        }
        self.directives.push(CspDirective::new(name, sources)?);
        Ok(self)
    }

    /// Parse a full header value. Tolerates extra whitespace and a trailing
    /// semicolon; rejects empty policies, duplicate names, and malformed
    /// tokens.
    pub fn parse(value: &str) -> Result<Self, SecurityError> {
        let mut directives = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for segment in value.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let directive = CspDirective::parse(segment)?;
            if !seen.insert(directive.name.clone()) {
                return Err(SecurityError::DuplicateDirective {
                    name: directive.name,
                });
            }
            directives.push(directive);
        }
        if directives.is_empty() {
            return Err(SecurityError::InvalidConfiguration(
                "empty Content-Security-Policy".to_string(),
            ));
        }
        Ok(Self { directives })
    }

    /// Look up a directive by name.
    pub fn directive(&self, name: &str) -> Option<&CspDirective> {
        self.directives.iter().find(|d| d.name == name)
    }

    pub fn directives(&self) -> &[CspDirective] {
        &self.directives
    }

    /// Render the policy as a header value.
    pub fn header_value(&self) -> String {
        self.directives
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn validate_name(name: &str) -> Result<(), SecurityError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(SecurityError::InvalidDirectiveName {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_policy_contains_required_directives() {
        for required in [
            "default-src 'self'",
            "script-src 'self'",
            "style-src 'self' 'unsafe-inline'",
            "img-src 'self' data:",
            "connect-src 'self'",
            "object-src 'none'",
            "frame-ancestors 'none'",
            "base-uri 'self'",
            "form-action 'self'",
        ] {
            assert!(
                DASHBOARD_CSP.contains(required),
                "missing directive: {}",
                required
            );
        }
    }

    #[test]
    fn dashboard_default_renders_canonical_value() {
        assert_eq!(
            ContentSecurityPolicy::dashboard_default().header_value(),
            DASHBOARD_CSP
        );
    }

    #[test]
    fn parse_round_trips_canonical_value() {
        let policy = ContentSecurityPolicy::parse(DASHBOARD_CSP).unwrap();
        assert_eq!(policy.header_value(), DASHBOARD_CSP);
        assert_eq!(policy, ContentSecurityPolicy::dashboard_default());
    }

    #[test]
    fn parse_tolerates_trailing_semicolon_and_whitespace() {
        let policy = ContentSecurityPolicy::parse("default-src   'self' ;").unwrap();
        assert_eq!(policy.header_value(), "default-src 'self'");
    }

    #[test]
    fn parse_rejects_duplicate_directives() {
        let err = ContentSecurityPolicy::parse("img-src 'self'; img-src data:").unwrap_err();
        assert_eq!(
            err,
            SecurityError::DuplicateDirective {
                name: "img-src".to_string()
            }
        );
    }

    #[test]
    fn parse_rejects_empty_policy() {
        assert!(ContentSecurityPolicy::parse("  ;  ; ").is_err());
    }

    #[test]
    fn parse_rejects_unknown_keyword_sources() {
        assert!(ContentSecurityPolicy::parse("script-src 'unsafe-eval'").is_err());
        assert!(ContentSecurityPolicy::parse("script-src 'nonce-abc123'").is_err());
    }

    #[test]
    fn parse_rejects_malformed_directive_names() {
        assert!(ContentSecurityPolicy::parse("Script-Src 'self'").is_err());
        assert!(ContentSecurityPolicy::parse("script_src 'self'").is_err());
    }

    #[test]
    fn source_tokens_round_trip() {
        for token in ["'self'", "'none'", "'unsafe-inline'", "data:", "cdn.example.com"] {
            let source = CspSource::parse(token).unwrap();
            assert_eq!(source.to_string(), token);
        }
    }

    #[test]
    fn directive_lookup() {
        let policy = ContentSecurityPolicy::dashboard_default();
        let img = policy.directive("img-src").unwrap();
        assert_eq!(
            img.sources(),
            &[CspSource::SelfOrigin, CspSource::Scheme("data".to_string())]
        );
        assert!(policy.directive("frame-src").is_none());
    }

    #[test]
    fn with_directive_rejects_duplicates() {
        let policy = ContentSecurityPolicy::new()
            .with_directive("default-src", vec![CspSource::SelfOrigin])
            .unwrap();
        assert!(policy
            .with_directive("default-src", vec![CspSource::None])
            .is_err());
    }
}
