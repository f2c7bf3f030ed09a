//! Error and diagnostic types for global credential lookup

use std::fmt;

use thiserror::Error;

use crate::state::StateError;

/// Errors that end a lookup
///
/// None of these are retried. The first one returns from the call and no
/// output field is written afterwards.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// Transport failure, backend-reported failure, or a missing or
    /// undecodable payload
    #[error("{operation} failed: {message}")]
    Backend {
        operation: String,
        message: String,
        /// Raw backend body, when one could be read
        diagnostic: Option<String>,
    },

    /// Malformed required input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The normalized result could not be written into the output state
    #[error("Failed to set {field}: {source}")]
    StateWrite {
        field: String,
        operation: String,
        #[source]
        source: StateError,
    },
}

impl CredentialError {
    pub fn backend(
        operation: impl Into<String>,
        message: impl Into<String>,
        diagnostic: Option<String>,
    ) -> Self {
        Self::Backend {
            operation: operation.into(),
            message: message.into(),
            diagnostic,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn state_write(
        field: impl Into<String>,
        operation: impl Into<String>,
        source: StateError,
    ) -> Self {
        Self::StateWrite {
            field: field.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Operation the error belongs to, if any
    pub fn operation(&self) -> Option<&str> {
        match self {
            Self::Backend { operation, .. } | Self::StateWrite { operation, .. } => {
                Some(operation)
            }
            Self::InvalidArgument(_) => None,
        }
    }

    /// Single user-facing diagnostic for this error
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Backend {
                operation,
                message,
                diagnostic,
            } => {
                let detail = match diagnostic {
                    Some(body) if !body.is_empty() => format!("{}\n{}", message, body),
                    _ => message.clone(),
                };
                Diagnostic::error(format!("Failure when executing {}", operation), detail)
            }
            Self::InvalidArgument(message) => {
                Diagnostic::error("Invalid argument", message.clone())
            }
            Self::StateWrite {
                operation, source, ..
            } => Diagnostic::error(
                format!("Failure when setting {} response", operation),
                source.to_string(),
            ),
        }
    }
}

pub type CredentialResult<T> = Result<T, CredentialError>;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A message for the person running the lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.summary)
        } else {
            write!(f, "{}: {}", self.summary, self.detail)
        }
    }
}

/// Diagnostics returned from a read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn has_error(&self) -> bool {
        self.0.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }
}

impl From<CredentialError> for Diagnostics {
    fn from(err: CredentialError) -> Self {
        Self(vec![err.to_diagnostic()])
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}
