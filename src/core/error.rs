use thiserror::Error;

/// Boxed lower-level cause carried by a [`TransportError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can cross the crate boundary.
///
/// Every failure surfaced by the client is exactly one of these three kinds.
/// None of them is logged-and-swallowed internally.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NfseError {
    /// The configuration failed its own validity check before any network activity.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A document or identifier failed local structural checks.
    /// Carries every violated constraint, not just the first.
    #[error("validation failed: {}", join_violations(.0))]
    Validation(Vec<ValidationError>),

    /// Failure during or after a network call.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl NfseError {
    /// Build a validation error from a single violation.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![ValidationError::new(field, message)])
    }

    /// The violations of a `Validation` error (empty for the other kinds).
    pub fn violations(&self) -> &[ValidationError] {
        match self {
            Self::Validation(v) => v,
            _ => &[],
        }
    }

    /// The transport details of a `Transport` error.
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(t) => Some(t),
            _ => None,
        }
    }
}

fn join_violations(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "inf_dps.recipient.name").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Wire element the rule refers to, if any (e.g. "xNome").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a wire element reference.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error tied to a wire element.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}

/// Failure that occurred during or after a network call.
///
/// `status` is set whenever an HTTP response was obtained; `body` holds the raw
/// response text when any was read. `source` wraps the lower-level fault
/// (network error, or the XML error when a successful response could not be parsed).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub status: Option<u16>,
    pub body: Option<String>,
    #[source]
    pub source: Option<BoxError>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            body: None,
            source: None,
        }
    }

    /// A response with a non-success status.
    pub fn with_response(message: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
            body: Some(body.into()),
            source: None,
        }
    }

    pub fn caused_by(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Walk the cause chain looking for an error of type `E`.
    pub fn find_cause<E: std::error::Error + 'static>(&self) -> Option<&E> {
        let mut current: Option<&(dyn std::error::Error + 'static)> =
            self.source.as_deref().map(|e| e as &(dyn std::error::Error + 'static));
        while let Some(err) = current {
            if let Some(found) = err.downcast_ref::<E>() {
                return Some(found);
            }
            current = err.source();
        }
        None
    }
}

/// Identifier codec failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum IdentifierError {
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

impl IdentifierError {
    /// Report this failure as a validation error on `field`.
    pub fn for_field(self, field: impl Into<String>) -> NfseError {
        NfseError::invalid(field, self.to_string())
    }
}
