use thiserror::Error;

/// Canonical protocol-level error codes surfaced in tool error payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolErrorCode {
    MissingArgument,
    TypeMismatch,
    OutOfRange,
    InvalidFilter,
    MissingConfiguration,
    UpstreamFailure,
    SerializationFailure,
}

impl ProtocolErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingArgument => "missing_argument",
            Self::TypeMismatch => "type_mismatch",
            Self::OutOfRange => "out_of_range",
            Self::InvalidFilter => "invalid_filter",
            Self::MissingConfiguration => "missing_configuration",
            Self::UpstreamFailure => "upstream_failure",
            Self::SerializationFailure => "serialization_failure",
        }
    }
}

impl std::fmt::Display for ProtocolErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected JSON type of a tool argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Number,
}

impl ValueKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Number => "number",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call validation failures produced while building a search query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("missing required argument: {field}")]
    MissingArgument { field: &'static str },

    #[error("argument '{field}' must be a {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: ValueKind,
    },

    #[error("argument '{field}' must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid filter: {reason}")]
    InvalidFilter { reason: String },

    #[error("{key} not provided. Use {flag} flag or set {env} environment variable")]
    MissingConfiguration {
        key: &'static str,
        flag: &'static str,
        env: &'static str,
    },
}

impl QueryError {
    pub fn code(&self) -> ProtocolErrorCode {
        match self {
            Self::MissingArgument { .. } => ProtocolErrorCode::MissingArgument,
            Self::TypeMismatch { .. } => ProtocolErrorCode::TypeMismatch,
            Self::OutOfRange { .. } => ProtocolErrorCode::OutOfRange,
            Self::InvalidFilter { .. } => ProtocolErrorCode::InvalidFilter,
            Self::MissingConfiguration { .. } => ProtocolErrorCode::MissingConfiguration,
        }
    }

    /// Convenience constructor for filter errors.
    pub fn invalid_filter(reason: impl Into<String>) -> Self {
        Self::InvalidFilter {
            reason: reason.into(),
        }
    }

    /// The argument the error refers to, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingArgument { field }
            | Self::TypeMismatch { field, .. }
            | Self::OutOfRange { field, .. } => Some(field),
            Self::InvalidFilter { .. } | Self::MissingConfiguration { .. } => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} not provided. Use {flag} flag or set {env} environment variable")]
    MissingValue {
        key: &'static str,
        flag: &'static str,
        env: &'static str,
    },

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid config value: {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
