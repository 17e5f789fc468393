//! Error types for a generation run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a generation run.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// No input paths were given.
    #[error("no starting paths")]
    NoInputPaths,

    /// An input path could not be stat'ed.
    #[error("couldn't stat {}: {source}", path.display())]
    Stat { path: PathBuf, source: io::Error },

    /// An input file could not be read.
    #[error("couldn't read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// An input file is not valid Rust.
    #[error("syntax error in {}: {source}", path.display())]
    Syntax { path: PathBuf, source: syn::Error },

    /// None of the inputs declared a usable struct.
    #[error("no structs found")]
    NoTypesFound,

    /// The template could not be filled in.
    #[error("couldn't render module: {0}")]
    Render(String),

    /// The rendered text is not valid Rust.
    #[error("generated code doesn't parse: {0}")]
    Format(#[source] syn::Error),

    /// The output file could not be written.
    #[error("couldn't write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// Writing generated code to a caller-supplied writer failed.
    #[error("couldn't write generated code: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_error_names_path() {
        let err = CodegenError::Stat {
            path: PathBuf::from("missing/model.rs"),
            source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
        };

        let message = err.to_string();
        assert!(message.contains("missing/model.rs"));
        assert!(message.contains("file not found"));
    }

    #[test]
    fn test_syntax_error_names_path() {
        let source = syn::parse_file("struct {").unwrap_err();
        let err = CodegenError::Syntax {
            path: PathBuf::from("src/broken.rs"),
            source,
        };

        assert!(err.to_string().starts_with("syntax error in src/broken.rs"));
    }

    #[test]
    fn test_no_types_found_message() {
        assert_eq!(CodegenError::NoTypesFound.to_string(), "no structs found");
    }
}
