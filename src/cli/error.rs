//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, LayoutError};
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(e.into())
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Serialize(_) => crate::exitcode::SOFTWARE,
                InfraError::Application(e) => application_exit_code(e),
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::Config { .. } => crate::exitcode::CONFIG,
        ApplicationError::NotLoaded => crate::exitcode::SOFTWARE,
        ApplicationError::OperationFailed { source, .. } => match source.downcast_ref::<std::io::Error>() {
            Some(io) if io.kind() == std::io::ErrorKind::NotFound => crate::exitcode::NOINPUT,
            _ => crate::exitcode::IOERR,
        },
        ApplicationError::Domain(d) => match d {
            DomainError::Parse(_) | DomainError::Hierarchy(_) => crate::exitcode::DATAERR,
            DomainError::UnknownNode(_) | DomainError::Unreachable(_) => crate::exitcode::USAGE,
            DomainError::Layout(LayoutError::InvalidRadius { .. }) => crate::exitcode::CONFIG,
            DomainError::Layout(_) => crate::exitcode::SOFTWARE,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParseError;

    #[test]
    fn given_parse_error_when_exit_code_then_dataerr() {
        let err: CliError = ApplicationError::from(ParseError::Empty).into();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_unknown_node_when_exit_code_then_usage() {
        let err: CliError = ApplicationError::from(DomainError::UnknownNode("x".into())).into();
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }

    #[test]
    fn given_missing_file_when_exit_code_then_noinput() {
        let err: CliError = ApplicationError::OperationFailed {
            context: "read".into(),
            source: Box::new(std::io::Error::from(std::io::ErrorKind::NotFound)),
        }
        .into();
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_usage_error_when_exit_code_then_usage() {
        let err = CliError::Usage("no command given".into());
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
        assert_eq!(err.to_string(), "no command given");
    }
}
