//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{DomainError, HierarchyError, LayoutError, ParseError};

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("no argument map loaded")]
    NotLoaded,

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ParseError> for ApplicationError {
    fn from(e: ParseError) -> Self {
        ApplicationError::Domain(e.into())
    }
}

impl From<HierarchyError> for ApplicationError {
    fn from(e: HierarchyError) -> Self {
        ApplicationError::Domain(e.into())
    }
}

impl From<LayoutError> for ApplicationError {
    fn from(e: LayoutError) -> Self {
        ApplicationError::Domain(e.into())
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
