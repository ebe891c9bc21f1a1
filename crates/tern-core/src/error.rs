//! Error types and result aliases for the Tern compiler.

use crate::Span;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Main error type for the Tern compiler.
///
/// Lowering distinguishes two classes of failure. [`Error::Lowering`] is a
/// user-level semantic error that aborts only the enclosing declaration.
/// [`Error::Internal`] reports a broken compiler invariant and aborts the
/// whole compilation unit.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    #[diagnostic(code(tern::lowering))]
    Lowering(String, #[label("here")] Span),

    #[error("Internal compiler error: {0}")]
    #[diagnostic(
        code(tern::internal),
        help("this is a bug in the compiler, not in the program being compiled")
    )]
    Internal(String),

    #[error("{} error(s) while lowering module '{module}'", .errors.len())]
    #[diagnostic(code(tern::lowering))]
    LoweringFailed {
        module: String,
        #[related]
        errors: Vec<Error>,
    },
}

impl Error {
    /// Creates a user-level lowering error at `span`.
    pub fn lowering(message: impl Into<String>, span: Span) -> Self {
        Self::Lowering(message.into(), span)
    }

    /// Creates an internal invariant violation.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error reports a compiler bug rather than a user error.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        match self {
            Self::Internal(_) => true,
            Self::LoweringFailed { errors, .. } => errors.iter().any(Self::is_internal),
            _ => false,
        }
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::from(span.start.offset..span.end.offset)
    }
}

/// Result type alias using the Tern Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes() {
        let user = Error::lowering("match case type not found", Span::from_range(3, 9));
        let ice = Error::internal("read from a non-pointer value");
        assert!(!user.is_internal());
        assert!(ice.is_internal());
        assert_eq!(
            ice.to_string(),
            "Internal compiler error: read from a non-pointer value"
        );
    }

    #[test]
    fn test_aggregate_message() {
        let failed = Error::LoweringFailed {
            module: "main".to_string(),
            errors: vec![
                Error::lowering("a", Span::default()),
                Error::lowering("b", Span::default()),
            ],
        };
        assert_eq!(failed.to_string(), "2 error(s) while lowering module 'main'");
        assert!(!failed.is_internal());
    }
}
