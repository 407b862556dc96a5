//! Error types and exit codes for tugstyle.
//!
//! `TugstyleError` is the single error type the binary reports. Subsystem
//! errors are bridged into it with `From`, and every variant maps to a
//! stable process exit code through [`OutputErrorCode`]:
//!
//! - `2`: invalid arguments (bad input from the caller)
//! - `3`: configuration errors (unreadable or invalid rule configuration)
//! - `4`: apply errors (a fixed file could not be written)
//! - `10`: internal errors

use std::fmt;
use std::io;

use thiserror::Error;
use tugstyle_checks::ConfigError;

use crate::files::FileError;

// ============================================================================
// Output Error Codes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad path, bad glob, missing config).
    InvalidArguments = 2,
    /// The rule configuration could not be read or is invalid.
    ConfigError = 3,
    /// A fixed file could not be written back.
    ApplyError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum TugstyleError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// A configuration file could not be read.
    #[error("cannot read configuration {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The configuration was read but is not valid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Writing a fixed file failed. Files after it were not processed.
    #[error("failed to write {path}: {source}")]
    ApplyError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

impl TugstyleError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        TugstyleError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        TugstyleError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

impl From<&TugstyleError> for OutputErrorCode {
    fn from(err: &TugstyleError) -> Self {
        match err {
            TugstyleError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            TugstyleError::ConfigRead { .. } => OutputErrorCode::ConfigError,
            TugstyleError::Config(_) => OutputErrorCode::ConfigError,
            TugstyleError::ApplyError { .. } => OutputErrorCode::ApplyError,
            TugstyleError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

// ============================================================================
// Bridge: FileError -> TugstyleError
// ============================================================================

impl From<FileError> for TugstyleError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::NotFound { .. } | FileError::InvalidGlob { .. } => {
                TugstyleError::invalid_args(err.to_string())
            }
            FileError::Io(_) | FileError::Walk(_) => TugstyleError::internal(err.to_string()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(TugstyleError::invalid_args("x").error_code().code(), 2);
        let config = ConfigError::MissingAttribute {
            module: "RightCurly".to_string(),
            attribute: "value",
        };
        assert_eq!(TugstyleError::from(config).error_code().code(), 3);
        let apply = TugstyleError::ApplyError {
            path: "A.java".to_string(),
            source: io::Error::other("disk full"),
        };
        assert_eq!(apply.error_code(), OutputErrorCode::ApplyError);
        assert_eq!(apply.to_string(), "failed to write A.java: disk full");
        assert_eq!(TugstyleError::internal("x").error_code().to_string(), "10");
    }

    #[test]
    fn file_errors_bridge_to_invalid_arguments() {
        let err = TugstyleError::from(FileError::NotFound {
            path: "missing".to_string(),
        });
        assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
        assert_eq!(err.to_string(), "invalid arguments: path not found: missing");
    }
}
