//! Error types for the bytelit-core library.
//!
//! Rendering itself never fails: every byte value and every input length has
//! a literal form in every target. The variants below cover the collaborators
//! around the encoder (reading input, validating configuration) and the
//! literal decoder used for verification.

use crate::format::Format;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bytelit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all bytelit operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// I/O error while streaming a rendering
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The input contained no data
    #[error("input '{path}' is empty")]
    EmptyInput {
        /// Path to the empty input
        path: PathBuf,
    },

    /// The input exceeds the configured size limit
    #[error("input '{path}' is {size} bytes, larger than the limit of {max} bytes")]
    InputTooLarge {
        /// Path to the oversized input
        path: PathBuf,
        /// Size of the input in bytes
        size: u64,
        /// Configured limit in bytes
        max: u64,
    },

    /// Variable name is not an identifier in every target language
    #[error("invalid variable name '{name}': expected an ASCII letter or '_' followed by letters, digits or '_', and not a reserved word")]
    InvalidIdentifier {
        /// The rejected name
        name: String,
    },

    /// Encoder configuration is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Format name could not be parsed
    #[error("unknown format '{name}'")]
    UnknownFormat {
        /// The unrecognized name
        name: String,
    },

    /// Text is not a literal of the expected format
    #[error("invalid {format} literal: {details}")]
    InvalidLiteral {
        /// Format the text was parsed as
        format: Format,
        /// Detailed description of the issue
        details: String,
    },

    /// A rendering did not decode back to its input
    #[error("{format} rendering does not reproduce the input: {details}")]
    VerificationFailed {
        /// Format whose rendering failed verification
        format: Format,
        /// Where the decoded bytes diverge
        details: String,
    },
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new empty input error
    pub fn empty_input(path: impl Into<PathBuf>) -> Self {
        Self::EmptyInput { path: path.into() }
    }

    /// Creates a new invalid identifier error
    pub fn invalid_identifier(name: impl Into<String>) -> Self {
        Self::InvalidIdentifier { name: name.into() }
    }

    /// Creates a new configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Creates a new unknown format error
    pub fn unknown_format(name: impl Into<String>) -> Self {
        Self::UnknownFormat { name: name.into() }
    }

    /// Creates a new literal parse error
    pub fn invalid_literal(format: Format, details: impl Into<String>) -> Self {
        Self::InvalidLiteral {
            format,
            details: details.into(),
        }
    }

    /// Creates a new verification error
    pub fn verification_failed(format: Format, details: impl Into<String>) -> Self {
        Self::VerificationFailed {
            format,
            details: details.into(),
        }
    }

    /// Returns true if the error concerns a single input and the caller may
    /// move on to the next one
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::FileRead { .. } | Self::EmptyInput { .. } | Self::InputTooLarge { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::empty_input("/tmp/blob.bin");
        assert!(err.to_string().contains("empty"));
        assert!(err.to_string().contains("/tmp/blob.bin"));

        let err = Error::invalid_literal(Format::Python, "missing closing quote");
        assert_eq!(
            err.to_string(),
            "invalid Python literal: missing closing quote"
        );
    }

    #[test]
    fn test_is_input_error() {
        assert!(Error::empty_input("x").is_input_error());
        assert!(Error::file_read(
            "x",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone")
        )
        .is_input_error());
        assert!(!Error::invalid_identifier("1abc").is_input_error());
        assert!(!Error::invalid_config("zero").is_input_error());
    }
}
