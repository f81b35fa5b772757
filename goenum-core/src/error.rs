//! Typed error handling for goenum.
//!
//! Authoring mistakes in enum declarations, parse failures and I/O problems
//! all surface as [`GoenumError`] so the driver can report the offending file
//! and library consumers can match on the kind.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for goenum operations.
#[derive(Error, Debug)]
pub enum GoenumError {
    /// A second `//#null` marker was found for the same enum type
    #[error("second //#null enum encountered {member} for type {type_name}")]
    DuplicateNullMarker {
        type_name: String,
        member: String,
        /// Member already recorded as null
        existing: String,
    },

    /// `//#null` attached to a value spec that binds several names
    #[error("cant use //#null for multiple enums: {names:?}")]
    MultiNameNullMarker { type_name: String, names: Vec<String> },

    /// `//#null` attached to the blank identifier, which is never a member
    #[error("cant use //#null on blank constant of type {type_name}")]
    BlankNullMarker { type_name: String },

    /// Marked enum type without any typed constant
    #[error("enum type {package}.{type_name} in {file}:{line} has no typed const enum values")]
    EmptyEnum {
        package: String,
        type_name: String,
        file: String,
        line: usize,
    },

    /// I/O error when reading/writing files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Syntax error when parsing Go source
    #[error("Parse error in {path}: {message}")]
    Parse {
        path: PathBuf,
        message: String,
        /// Line number (1-indexed) if available
        line: Option<usize>,
        /// Column number (1-indexed) if available
        column: Option<usize>,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Method rendering failed
    #[error("Render error for {type_name}: {message}")]
    Render { type_name: String, message: String },

    /// Patch plan could not be applied
    #[error("Patch error: {message}")]
    Patch { message: String },

    /// External formatter failed
    #[error("Format error: {message}")]
    Format { message: String },
}

impl GoenumError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a parse error without location.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Create a parse error with line/column info.
    pub fn parse_at(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a render error.
    pub fn render(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create a patch error.
    pub fn patch(message: impl Into<String>) -> Self {
        Self::Patch {
            message: message.into(),
        }
    }

    /// Create a format error.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Check if this error stems from how the enum was written in the source,
    /// as opposed to an environment or internal failure.
    pub fn is_authoring_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateNullMarker { .. }
                | Self::MultiNameNullMarker { .. }
                | Self::BlankNullMarker { .. }
                | Self::EmptyEnum { .. }
        )
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Parse { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for goenum results.
pub type GoenumResult<T> = Result<T, GoenumError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> GoenumResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> GoenumResult<T> {
        self.map_err(|e| GoenumError::io(path, e))
    }
}
