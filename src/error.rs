//! Error types for finstyle library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for finstyle operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, formatting or saving a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input document does not exist.
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The data is not a word-processing package.
    #[error("Unknown file format: not a valid DOCX package")]
    UnknownFormat,

    /// The zip container could not be read or written.
    #[error("Package error: {0}")]
    Package(String),

    /// A package part is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// A required package part is missing.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// The path does not carry the expected `.docx` extension.
    #[error("Invalid file extension: {} (expected .docx)", .0.display())]
    InvalidExtension(PathBuf),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Package(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(err.to_string(), "Unknown file format: not a valid DOCX package");

        let err = Error::MissingPart("word/document.xml".into());
        assert_eq!(err.to_string(), "Missing package part: word/document.xml");

        let err = Error::NotFound(PathBuf::from("report.docx"));
        assert_eq!(err.to_string(), "Input file not found: report.docx");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_zip_error_conversion() {
        let err: Error = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, Error::Package(_)));
    }
}
