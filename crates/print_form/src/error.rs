//! Error types for print form operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort a print form run
#[derive(Debug, Error)]
pub enum PrintFormError {
    /// The configuration file does not exist
    #[error("JSON file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The directory holding the configuration file cannot be determined
    #[error("Path of JSON file not found: {}", .0.display())]
    ConfigDirectoryUnresolvable(PathBuf),

    /// Malformed relaxed JSON, missing required fields or a violated invariant
    #[error("JSON parsing error: {0}")]
    ConfigParse(String),

    /// A document listed in the configuration does not exist
    #[error("File not found: {0}")]
    SourceDocumentNotFound(String),

    /// A section file is not part of the unpacked document
    #[error("Section file not found in {document}: {file}")]
    SectionFileNotFound { document: String, file: String },

    /// The print form path cannot be derived from the source path
    #[error("Target folder path not found: {}", .0.display())]
    OutputPathUnresolvable(PathBuf),

    /// A rule carries a regex fragment that does not compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: fancy_regex::Error,
    },

    /// A rule pattern compiled but could not be run over a file, typically
    /// because its backtracking limit was exceeded
    #[error("Pattern '{pattern}' failed: {source}")]
    PatternFailed {
        pattern: String,
        #[source]
        source: fancy_regex::Error,
    },

    /// IO error (permission denied, disk full, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Error while walking the working directory
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl From<deser_hjson::Error> for PrintFormError {
    fn from(err: deser_hjson::Error) -> Self {
        PrintFormError::ConfigParse(err.to_string())
    }
}

impl PrintFormError {
    pub(crate) fn invalid_pattern(pattern: &str, source: fancy_regex::Error) -> Self {
        PrintFormError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
    }

    pub(crate) fn pattern_failed(pattern: &str, source: fancy_regex::Error) -> Self {
        PrintFormError::PatternFailed {
            pattern: pattern.to_string(),
            source,
        }
    }
}

/// Result type for print form operations
pub type Result<T> = std::result::Result<T, PrintFormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_human_readable() {
        let err = PrintFormError::SourceDocumentNotFound("forms/a.docx".to_string());
        assert_eq!(err.to_string(), "File not found: forms/a.docx");

        let err = PrintFormError::ConfigNotFound(PathBuf::from("missing.hjson"));
        assert_eq!(err.to_string(), "JSON file not found: missing.hjson");
    }

    #[test]
    fn test_invalid_pattern_keeps_fragment() {
        let source = fancy_regex::Regex::new("(").unwrap_err();
        let err = PrintFormError::invalid_pattern("(", source);
        assert!(err.to_string().starts_with("Invalid pattern '(':"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
