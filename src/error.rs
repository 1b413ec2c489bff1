use std::fmt;

/// Which of the two schema documents an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaRole {
    Topic,
    Shared,
}

impl fmt::Display for SchemaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topic => f.write_str("topic"),
            Self::Shared => f.write_str("shared"),
        }
    }
}

/// Machine-readable error code, printed in front of every fatal diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    SchemaUnavailable,
    SchemaMalformed,
    SchemaInvalid,
    InputUnreadable,
    ConfigError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SchemaUnavailable => "schema_unavailable",
            Self::SchemaMalformed => "schema_malformed",
            Self::SchemaInvalid => "schema_invalid",
            Self::InputUnreadable => "input_unreadable",
            Self::ConfigError => "config_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal errors. Any of these aborts the run before output is written.
///
/// Row-level schema violations are not errors; they are reported as
/// [`crate::report::Violation`] values.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    #[error("failed to retrieve \"{topic_url}\" and/or \"{shared_url}\": {reason}")]
    SchemaUnavailable {
        topic_url: String,
        shared_url: String,
        reason: String,
    },

    #[error("schema at \"{url}\" is not valid JSON: {reason}")]
    SchemaMalformed { url: String, reason: String },

    #[error("{schema} schema is invalid: {reason}")]
    SchemaInvalid { schema: SchemaRole, reason: String },

    #[error("cannot read input \"{input}\": {reason}")]
    InputUnreadable { input: String, reason: String },

    #[error("{0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ValidateError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::SchemaUnavailable { .. } => ErrorCode::SchemaUnavailable,
            Self::SchemaMalformed { .. } => ErrorCode::SchemaMalformed,
            Self::SchemaInvalid { .. } => ErrorCode::SchemaInvalid,
            Self::InputUnreadable { .. } => ErrorCode::InputUnreadable,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    pub(crate) fn schema_invalid(schema: SchemaRole, reason: impl Into<String>) -> Self {
        Self::SchemaInvalid {
            schema,
            reason: reason.into(),
        }
    }

    pub(crate) fn input_unreadable(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InputUnreadable {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
