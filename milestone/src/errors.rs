use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

/// Error kinds for migration operations
///
/// Each kind describes a category of failure so callers can decide whether a
/// failed migration is worth retrying on the next launch.
///
/// # Examples
///
/// ```rust
/// use milestone::errors::{ErrorKind, MilestoneError, MilestoneResult};
///
/// fn example() -> MilestoneResult<()> {
///     Err(MilestoneError::new("component 'x' is not a number", ErrorKind::InvalidVersionFormat))
/// }
/// assert!(example().is_err());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Version Errors
    /// A version identifier is empty or has a non-numeric component
    InvalidVersionFormat,

    // Execution Errors
    /// The host supplied action returned an error
    ActionFailure,

    // Storage Errors
    /// Reading or writing the persisted watermark failed
    PersistenceFailure,
    /// Error reported by a storage engine
    BackendError,
    /// Generic IO error
    IOError,
    /// Stored bytes could not be decoded
    EncodingError,

    // Configuration Errors
    /// Invalid configuration such as an empty namespace
    ValidationError,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidVersionFormat => write!(f, "Invalid version format"),
            ErrorKind::ActionFailure => write!(f, "Action failure"),
            ErrorKind::PersistenceFailure => write!(f, "Persistence failure"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type for all milestone operations.
///
/// `MilestoneError` carries a message, a kind and an optional cause. A backtrace
/// is captured on creation and printed by the `Debug` implementation when the
/// error has no cause.
///
/// # Examples
///
/// ```rust
/// use milestone::errors::{ErrorKind, MilestoneError};
///
/// let cause = MilestoneError::new("disk unplugged", ErrorKind::IOError);
/// let err = MilestoneError::new_with_cause(
///     "Failed to write watermark",
///     ErrorKind::PersistenceFailure,
///     cause,
/// );
/// assert_eq!(err.kind(), &ErrorKind::PersistenceFailure);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct MilestoneError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<MilestoneError>>,
    backtrace: Backtrace,
}

impl MilestoneError {
    /// Creates a new `MilestoneError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        MilestoneError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Backtrace::new(),
        }
    }

    /// Creates a new `MilestoneError` chained to the error that caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: MilestoneError) -> Self {
        MilestoneError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Backtrace::new(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&MilestoneError> {
        self.cause.as_deref()
    }
}

impl Display for MilestoneError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for MilestoneError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for MilestoneError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for milestone operations.
pub type MilestoneResult<T> = Result<T, MilestoneError>;

impl From<std::io::Error> for MilestoneError {
    fn from(err: std::io::Error) -> Self {
        MilestoneError::new(&format!("IO error: {}", err), ErrorKind::IOError)
    }
}

impl From<std::string::FromUtf8Error> for MilestoneError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        MilestoneError::new(
            &format!("UTF-8 encoding error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<std::num::ParseIntError> for MilestoneError {
    fn from(err: std::num::ParseIntError) -> Self {
        MilestoneError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::InvalidVersionFormat,
        )
    }
}

impl From<String> for MilestoneError {
    fn from(msg: String) -> Self {
        MilestoneError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for MilestoneError {
    fn from(msg: &str) -> Self {
        MilestoneError::new(msg, ErrorKind::InternalError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milestone_error_new_creates_error() {
        let error = MilestoneError::new("An error occurred", ErrorKind::IOError);
        assert_eq!(error.message(), "An error occurred");
        assert_eq!(error.kind(), &ErrorKind::IOError);
        assert!(error.cause().is_none());
        assert!(error.source().is_none());
    }

    #[test]
    fn milestone_error_with_cause_exposes_source() {
        let error = MilestoneError::new_with_cause(
            "Failed to write watermark",
            ErrorKind::PersistenceFailure,
            MilestoneError::new("disk full", ErrorKind::IOError),
        );
        assert_eq!(error.kind(), &ErrorKind::PersistenceFailure);
        assert_eq!(error.cause().map(|c| c.kind()), Some(&ErrorKind::IOError));
        assert!(error.source().is_some());
    }

    #[test]
    fn milestone_error_display_is_message_only() {
        let error = MilestoneError::new("An error occurred", ErrorKind::ActionFailure);
        assert_eq!(format!("{}", error), "An error occurred");
    }

    #[test]
    fn milestone_error_debug_formats_with_cause() {
        let error = MilestoneError::new_with_cause(
            "Migration to 2.0 failed",
            ErrorKind::ActionFailure,
            MilestoneError::new("table locked", ErrorKind::InternalError),
        );
        let formatted = format!("{:?}", error);
        assert!(formatted.contains("Migration to 2.0 failed"));
        assert!(formatted.contains("Caused by:"));
        assert!(formatted.contains("table locked"));
    }

    #[test]
    fn milestone_error_debug_without_cause_prints_backtrace() {
        let error = MilestoneError::new("store unavailable", ErrorKind::BackendError);
        let cloned = error.clone();
        let formatted = format!("{:?}", cloned);
        assert!(formatted.starts_with("store unavailable\n"));
        assert!(formatted.len() > "store unavailable\n".len());
    }

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::InvalidVersionFormat.to_string(),
            "Invalid version format"
        );
        assert_eq!(ErrorKind::PersistenceFailure.to_string(), "Persistence failure");
        assert_eq!(ErrorKind::ActionFailure.to_string(), "Action failure");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::other("unknown io error");
        let err: MilestoneError = io_err.into();
        assert_eq!(err.kind(), &ErrorKind::IOError);
        assert!(err.message().contains("IO error"));
    }

    #[test]
    fn test_from_utf8_error() {
        let utf8_err = String::from_utf8(vec![0xFF, 0xFE]).unwrap_err();
        let err: MilestoneError = utf8_err.into();
        assert_eq!(err.kind(), &ErrorKind::EncodingError);
    }

    #[test]
    fn test_question_mark_with_parse_error() {
        fn parse_component() -> MilestoneResult<u64> {
            let num: u64 = "beta".parse()?;
            Ok(num)
        }

        let err = parse_component().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidVersionFormat);
    }

    #[test]
    fn test_from_str_and_string() {
        let err: MilestoneError = "boom".into();
        assert_eq!(err.kind(), &ErrorKind::InternalError);
        let err: MilestoneError = String::from("boom").into();
        assert_eq!(err.message(), "boom");
    }
}
