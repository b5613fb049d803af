//! Error types for psincluderes.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::model::ResourceReference;

/// Result type alias for psincluderes operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while inlining resources.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error outside the document stream (e.g. opening files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input document could not be read.
    #[error("cannot read input: {0}")]
    InputRead(#[source] io::Error),

    /// The output document could not be written.
    #[error("cannot write output: {0}")]
    OutputWrite(#[source] io::Error),

    /// No file in the search path matches the resource.
    #[error("resource `{0}` not found")]
    ResourceNotFound(ResourceReference),

    /// A resource file was located but could not be read.
    #[error("cannot read resource file `{}`: {source}", path.display())]
    ResourceRead {
        /// Located resource file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The input is a known format this filter cannot process.
    #[error("incompatible file type: {0}")]
    IncompatibleInput(String),

    /// The input does not start with a PostScript header.
    #[error("Unknown file format: not a PostScript document")]
    UnknownFormat,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the error only concerns one resource and a run may carry on
    /// by passing the directive through.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::ResourceNotFound(_) | Error::ResourceRead { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResourceType;

    #[test]
    fn test_error_display() {
        let err = Error::ResourceNotFound(ResourceReference::new(ResourceType::Font, "NoSuchFont"));
        assert_eq!(err.to_string(), "resource `font NoSuchFont` not found");

        let err = Error::IncompatibleInput("PDF".to_string());
        assert_eq!(err.to_string(), "incompatible file type: PDF");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_recoverable() {
        let missing = Error::ResourceNotFound(ResourceReference::new(ResourceType::ProcSet, "X"));
        assert!(missing.is_recoverable());

        let unreadable = Error::ResourceRead {
            path: PathBuf::from("X.ps"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(unreadable.is_recoverable());

        let input = Error::InputRead(io::Error::new(io::ErrorKind::Other, "gone"));
        assert!(!input.is_recoverable());
    }
}
