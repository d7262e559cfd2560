//! Error types for pdokit

use thiserror::Error;

/// Result type alias for pdokit operations
pub type PdoResult<T> = Result<T, PdoError>;

/// Error types for query construction and execution
#[derive(Debug, Error)]
pub enum PdoError {
    /// Malformed builder input (bad value, bad limit, bad operator spacing, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Structurally invalid query state (no table set, OR onto nothing, ...)
    #[error("Invalid state: {0}")]
    State(String),

    /// Reference to a column, index or key the table does not declare
    #[error("Domain error: {0}")]
    Domain(String),

    /// Driver-level execution failure
    #[error("SQL error [{code}]: {message}")]
    Sql { code: String, message: String },

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Query timeout error
    #[error("Query timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl PdoError {
    /// Create an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State(message.into())
    }

    /// Create a domain error
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }

    /// Create a SQL execution error from a driver code and message
    pub fn sql(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Sql {
            code: code.into(),
            message: message.into(),
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

    /// The "no table set" state error shared by every builder.
    pub(crate) fn no_table() -> Self {
        Self::State("no table set".to_string())
    }

    /// Check if this is an invalid-argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is a state error
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State(_))
    }

    /// Check if this is a domain error
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::Domain(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Driver error code, if this is a SQL execution error
    pub fn sql_code(&self) -> Option<&str> {
        match self {
            Self::Sql { code, .. } => Some(code),
            _ => None,
        }
    }
}

#[cfg(feature = "mysql")]
impl From<sqlx::Error> for PdoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let code = db_err
                    .code()
                    .map(|c| c.into_owned())
                    .unwrap_or_else(|| "HY000".to_string());
                Self::Sql {
                    code,
                    message: db_err.message().to_string(),
                }
            }
            sqlx::Error::RowNotFound => Self::NotFound("Expected 1 row, got 0".to_string()),
            sqlx::Error::ColumnDecode { index, source } => Self::Decode {
                column: index,
                message: source.to_string(),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Connection(err.to_string())
            }
            other => Self::Other(other.to_string()),
        }
    }
}
