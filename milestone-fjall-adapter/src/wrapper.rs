use milestone::errors::{ErrorKind, MilestoneError};
use std::error::Error;
use thiserror::Error;

/// Error decoding a value read back from a fjall partition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FjallValueError {
    #[error("Stored value under '{key}' is not valid UTF-8: {reason}")]
    InvalidUtf8 { key: String, reason: String },
}

impl From<FjallValueError> for MilestoneError {
    fn from(err: FjallValueError) -> Self {
        MilestoneError::new(&err.to_string(), ErrorKind::EncodingError)
    }
}

/// Decodes a stored value as UTF-8 text.
pub(crate) fn decode_value(key: &str, bytes: &[u8]) -> Result<String, FjallValueError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| FjallValueError::InvalidUtf8 {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Converts fjall errors to milestone errors.
///
/// Maps error message patterns to error kinds:
/// - "permission" → IOError
/// - "corrupt" / "checksum" → EncodingError
/// - Other → BackendError
pub(crate) fn to_milestone_error(error: impl Error) -> MilestoneError {
    let error_msg = error.to_string();
    let lowered = error_msg.to_lowercase();
    let error_kind = if lowered.contains("permission") || lowered.contains("io error") {
        ErrorKind::IOError
    } else if lowered.contains("corrupt") || lowered.contains("checksum") {
        ErrorKind::EncodingError
    } else {
        ErrorKind::BackendError
    };
    MilestoneError::new(&format!("Fjall Error: {}", error_msg), error_kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_value() {
        assert_eq!(decode_value("k", b"1.4.2"), Ok("1.4.2".to_string()));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let err = decode_value("app.lastMigratedVersion", &[0xFF, 0xFE]).unwrap_err();
        let err: MilestoneError = err.into();
        assert_eq!(err.kind(), &ErrorKind::EncodingError);
        assert!(err.message().contains("app.lastMigratedVersion"));
    }

    #[test]
    fn test_error_kind_mapping() {
        let err = to_milestone_error(std::io::Error::other("Permission denied"));
        assert_eq!(err.kind(), &ErrorKind::IOError);

        let err = to_milestone_error(std::io::Error::other("block checksum mismatch"));
        assert_eq!(err.kind(), &ErrorKind::EncodingError);

        let err = to_milestone_error(std::io::Error::other("partition deleted"));
        assert_eq!(err.kind(), &ErrorKind::BackendError);
        assert!(err.message().starts_with("Fjall Error:"));
    }
}
