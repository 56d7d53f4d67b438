//! Error type for object-store operations.

use strum::{AsRefStr, IntoStaticStr};

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for object-store operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of object-store failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The object or bucket does not exist.
    NotFound,
    /// The credentials are valid but lack access.
    PermissionDenied,
    /// The credentials were rejected.
    Unauthenticated,
    /// The client could not be built from the given settings.
    Configuration,
    /// Transport or backend failure.
    Network,
}

/// A store error carrying its kind, a `[label] message` text and the
/// underlying cause.
#[derive(Debug, thiserror::Error)]
#[error("[{label}] {message}")]
pub struct Error {
    kind: ErrorKind,
    label: &'static str,
    message: String,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error of the given kind.
    pub fn new(kind: ErrorKind, label: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            label,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a configuration error raised while building a provider.
    pub fn configuration(label: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, label, message)
    }

    /// Attach a source error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }

    /// Whether the object was missing.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl From<object_store::Error> for Error {
    fn from(err: object_store::Error) -> Self {
        let kind = match &err {
            object_store::Error::NotFound { .. } => ErrorKind::NotFound,
            object_store::Error::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            object_store::Error::Unauthenticated { .. } => ErrorKind::Unauthenticated,
            object_store::Error::UnknownConfigurationKey { .. }
            | object_store::Error::InvalidPath { .. } => ErrorKind::Configuration,
            _ => ErrorKind::Network,
        };
        Self::new(kind, "object-store", err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_label() {
        let err = Error::configuration("s3", "missing bucket");
        assert_eq!(err.to_string(), "[s3] missing bucket");
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.kind_str(), "configuration");
    }

    #[test]
    fn not_found_is_classified() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = object_store::Error::NotFound {
            path: "a/b".to_string(),
            source: Box::new(source),
        }
        .into();
        assert!(err.is_not_found());
        assert!(std::error::Error::source(&err).is_some());
    }
}
