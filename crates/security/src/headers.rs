//! Response-hardening headers for the audit dashboard.
//!
//! The mapping here is handed verbatim to the dev/preview server's
//! response-header configuration; every served response carries it.

use serde::{Deserialize, Serialize};

use crate::csp::{ContentSecurityPolicy, DASHBOARD_CSP};
use crate::error::SecurityError;

/// The dashboard's security headers as name/value pairs. Keys are unique.
pub const DASHBOARD_SECURITY_HEADERS: [(&str, &str); 4] = [
    ("Content-Security-Policy", DASHBOARD_CSP),
    ("X-Content-Type-Options", "nosniff"),
    ("X-Frame-Options", "DENY"),
    ("Referrer-Policy", "no-referrer"),
];

/// Security headers applied to every dashboard response.
///
/// `Default` yields the values in [`DASHBOARD_SECURITY_HEADERS`]; the fields
/// are configurable so a deployment can tighten the policy, and
/// [`SecurityHeaders::validate`] keeps an override from smuggling in a value
/// that is not a legal header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityHeaders {
    pub csp: String,
    pub content_type_options: String,
    pub frame_options: String,
    pub referrer_policy: String,
}

impl Default for SecurityHeaders {
    fn default() -> Self {
        Self {
            csp: DASHBOARD_CSP.to_string(),
            content_type_options: "nosniff".to_string(),
            frame_options: "DENY".to_string(),
            referrer_policy: "no-referrer".to_string(),
        }
    }
}

impl SecurityHeaders {
    /// Headers with the CSP replaced by a custom policy.
    pub fn with_csp(policy: &ContentSecurityPolicy) -> Self {
        Self {
            csp: policy.header_value(),
            ..Self::default()
        }
    }

    /// Header name/value pairs in declaration order.
    pub fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("Content-Security-Policy", self.csp.as_str()),
            ("X-Content-Type-Options", self.content_type_options.as_str()),
            ("X-Frame-Options", self.frame_options.as_str()),
            ("Referrer-Policy", self.referrer_policy.as_str()),
        ]
    }

    /// Reject values that cannot be sent as HTTP headers, and CSP values
    /// that do not parse.
    pub fn validate(&self) -> Result<(), SecurityError> {
        for (name, value) in self.pairs() {
            if value.is_empty() || value.chars().any(|c| c.is_ascii_control()) {
                return Err(SecurityError::InvalidHeaderValue {
                    header: name.to_string(),
                });
            }
        }
        ContentSecurityPolicy::parse(&self.csp)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csp::CspSource;

    #[test]
    fn mapping_matches_canonical_values() {
        let headers = SecurityHeaders::default();
        let pairs = headers.pairs();
        assert_eq!(pairs[0], ("Content-Security-Policy", DASHBOARD_CSP));
        assert_eq!(pairs[1], ("X-Content-Type-Options", "nosniff"));
        assert_eq!(pairs[2], ("X-Frame-Options", "DENY"));
        assert_eq!(pairs[3], ("Referrer-Policy", "no-referrer"));
        assert_eq!(pairs, DASHBOARD_SECURITY_HEADERS);
    }

    #[test]
    fn keys_are_unique() {
        let mut names: Vec<&str> = DASHBOARD_SECURITY_HEADERS.iter().map(|(n, _)| *n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DASHBOARD_SECURITY_HEADERS.len());
    }

    #[test]
    fn with_csp_swaps_only_the_policy() {
        let policy = ContentSecurityPolicy::new()
            .with_directive("default-src", vec![CspSource::None])
            .unwrap();
        let headers = SecurityHeaders::with_csp(&policy);
        assert_eq!(headers.csp, "default-src 'none'");
        assert_eq!(headers.frame_options, "DENY");
    }

    #[test]
    fn validate_rejects_control_characters_and_bad_csp() {
        let mut headers = SecurityHeaders::default();
        headers.referrer_policy = "no-referrer\r\nSet-Cookie: x".to_string();
        assert!(headers.validate().is_err());

        let mut headers = SecurityHeaders::default();
        headers.csp = "default-src 'self'; default-src 'none'".to_string();
        assert!(headers.validate().is_err());

        assert!(SecurityHeaders::default().validate().is_ok());
    }

    #[test]
    fn serde_round_trip() {
        let headers = SecurityHeaders::default();
        let json = serde_json::to_string(&headers).unwrap();
        let back: SecurityHeaders = serde_json::from_str(&json).unwrap();
        assert_eq!(back, headers);

        // missing fields fall back to the dashboard defaults
        let partial: SecurityHeaders = serde_json::from_str("{}").unwrap();
        assert_eq!(partial, SecurityHeaders::default());
    }
}
