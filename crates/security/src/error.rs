//! Security policy errors for the audit dashboard toolkit.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    #[error("Invalid security configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Empty CSP directive")]
    EmptyDirective,

    #[error("Invalid CSP directive name: {name}")]
    InvalidDirectiveName { name: String },

    #[error("Duplicate CSP directive: {name}")]
    DuplicateDirective { name: String },

    #[error("Invalid CSP source expression: {expr}")]
    InvalidSource { expr: String },

    #[error("Invalid value for header {header}")]
    InvalidHeaderValue { header: String },
}

pub type SecurityResult<T> = Result<T, SecurityError>;
