use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;
use std::io;

use crate::cli::CliError;

/// Unified error type for the mock generator.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Cli(CliError),
    /// The type-graph descriptor could not be loaded, or a requested
    /// interface is not declared in it.
    Load {
        message: String,
    },
    /// A naming/import invariant was violated. Always a bug in the
    /// allocator, never bad user input.
    Internal {
        message: String,
        backtrace: Option<Backtrace>,
    },
}

/// Convenience result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Construct a new descriptor/oracle load error.
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
        }
    }

    /// Construct a new internal invariant-violation error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            backtrace: capture_backtrace(),
        }
    }

    /// Return the captured backtrace, if any.
    pub fn backtrace(&self) -> Option<&Backtrace> {
        match self {
            Error::Internal { backtrace, .. } => backtrace.as_ref(),
            _ => None,
        }
    }
}

fn capture_backtrace() -> Option<Backtrace> {
    if cfg!(debug_assertions) {
        Some(Backtrace::force_capture())
    } else {
        None
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {err}"),
            Error::Cli(err) => write!(f, "{err}"),
            Error::Load { message } => write!(f, "load error: {message}"),
            Error::Internal { message, .. } => write!(f, "internal error: {message}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Cli(err) => Some(err),
            Error::Load { .. } | Error::Internal { .. } => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<CliError> for Error {
    fn from(error: CliError) -> Self {
        Error::Cli(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_variants() {
        let io_error = Error::from(io::Error::new(io::ErrorKind::Other, "disk error"));
        assert_eq!(io_error.to_string(), "I/O error: disk error");

        let cli_error = Error::from(CliError::new("bad args"));
        assert_eq!(cli_error.to_string(), "bad args");

        let load_error = Error::load("no descriptor");
        assert_eq!(load_error.to_string(), "load error: no descriptor");

        let internal_error = Error::internal("qualifier clash");
        assert_eq!(
            internal_error.to_string(),
            "internal error: qualifier clash"
        );
    }

    #[test]
    fn source_exposes_wrapped_errors() {
        let io_error = Error::from(io::Error::new(io::ErrorKind::Other, "boom"));
        let source = io_error.source().expect("io source");
        assert!(source.downcast_ref::<io::Error>().is_some());

        let cli_error = Error::from(CliError::new("oops"));
        let source = cli_error.source().expect("cli source");
        assert!(source.downcast_ref::<CliError>().is_some());

        assert!(Error::load("missing").source().is_none());
        assert!(Error::internal("bug").source().is_none());
    }

    #[test]
    fn debug_builds_capture_backtrace() {
        if cfg!(debug_assertions) {
            let err = Error::internal("capture");
            assert!(err.backtrace().is_some());
        }
    }
}
