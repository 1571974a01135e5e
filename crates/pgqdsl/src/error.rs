//! Error types for pgqdsl

use thiserror::Error;

/// Result type alias for pgqdsl operations
pub type QdslResult<T> = Result<T, QdslError>;

/// Errors raised while rendering, bridging or executing statements.
#[derive(Debug, Error)]
pub enum QdslError {
    /// A raw fragment carries a marker that cannot be mapped onto its arguments
    #[error("Malformed raw fragment `{fragment}`: {reason}")]
    MalformedRaw { fragment: String, reason: String },

    /// A `@name` marker has no value in the argument map
    #[error("Missing named argument: @{0}")]
    MissingNamedArg(String),

    /// A raw-supplied name clashes with an auto-generated one
    #[error("Named argument collision: @{0} is both raw-supplied and auto-generated")]
    NameCollision(String),

    /// The placeholder cursor drifted away from the bound values.
    ///
    /// This is an internal invariant violation, never a caller mistake.
    #[error("Placeholder/parameter mismatch: placeholders({placeholders}) != params({params})")]
    ParamMismatch { placeholders: usize, params: usize },

    /// Builder misuse detected at build time
    #[error("Validation error: {0}")]
    Validation(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl QdslError {
    /// Create a malformed raw fragment error
    pub fn malformed_raw(fragment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRaw {
            fragment: fragment.into(),
            reason: reason.into(),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error came from rendering rather than execution
    pub fn is_render_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedRaw { .. }
                | Self::MissingNamedArg(_)
                | Self::NameCollision(_)
                | Self::ParamMismatch { .. }
                | Self::Validation(_)
        )
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for QdslError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
