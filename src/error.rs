//! Error types for SdkGate.
//!
//! This module defines the error hierarchy using `thiserror`. Errors only
//! arise at the edges of the crate: loading configuration, ingesting
//! declaration facts, and writing reports. The resolution engine itself
//! (intervals, resolver, merger, renderer) is infallible; absent versions
//! are data, never failures.
//!
//! # Error Categories
//!
//! - **IO errors**: reading fact files and configuration, writing reports
//! - **Version errors**: malformed version strings in facts or configuration
//! - **Config errors**: invalid configuration files or CLI overrides
//! - **Ingestion errors**: malformed declaration fact documents
//!
//! # Example
//!
//! ```rust
//! use sdkgate::error::{SdkGateError, Result};
//!
//! fn read_facts(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).map_err(|e| SdkGateError::Io {
//!         path: path.into(),
//!         source: e,
//!         src_path: file!(),
//!         src_line: line!(),
//!     })
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Macro to create errors with automatic source location tracking.
///
/// Usage:
/// ```ignore
/// return Err(err!(ConfigMissing { key: "targets".to_string() }));
/// ```
#[macro_export]
macro_rules! err {
    ($variant:ident { $($field:ident: $value:expr),* $(,)? }) => {
        $crate::error::SdkGateError::$variant {
            $($field: $value,)*
            src_path: file!(),
            src_line: line!(),
        }
    };
}

/// A specialized Result type for SdkGate operations.
pub type Result<T> = std::result::Result<T, SdkGateError>;

/// The main error type for SdkGate.
#[derive(Error, Debug)]
pub enum SdkGateError {
    // =========================================================================
    // I/O and File System Errors
    // =========================================================================
    /// I/O error with path context.
    #[error("I/O error at '{path}' ({src_path}:{src_line}): {source}")]
    Io {
        /// The path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// File not found.
    #[error("File not found: {path} ({src_path}:{src_line})")]
    FileNotFound {
        /// The missing file path
        path: PathBuf,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Version Errors
    // =========================================================================
    /// Version parsing error.
    #[error("Failed to parse version '{version}' ({src_path}:{src_line}): {source}")]
    VersionParse {
        /// The version string that failed to parse
        version: String,
        /// The underlying semver error
        #[source]
        source: semver::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Version string that parses but is not a plain release triple.
    #[error("Invalid version '{version}' ({src_path}:{src_line}): {message}")]
    InvalidVersion {
        /// The offending version string
        version: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Unrecognized platform identifier.
    #[error("Unknown platform '{platform}' ({src_path}:{src_line})")]
    UnknownPlatform {
        /// The identifier as written
        platform: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration parsing error.
    #[error("Failed to parse configuration ({src_path}:{src_line}): {message}")]
    ConfigParse {
        /// Error message
        message: String,
        /// The underlying error (if any)
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}' ({src_path}:{src_line}): {message}")]
    ConfigValue {
        /// The configuration key
        key: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Ingestion Errors
    // =========================================================================
    /// Declaration fact document could not be decoded.
    #[error("Failed to parse declaration facts in '{file}' ({src_path}:{src_line}): {message}")]
    FactsParse {
        /// The file being parsed
        file: PathBuf,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// A single declaration record carries invalid data.
    #[error("Invalid declaration '{name}' ({src_path}:{src_line}): {message}")]
    InvalidDeclaration {
        /// Declaration name
        name: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// A declaration referenced by name does not exist.
    #[error("Unknown declaration '{name}' ({src_path}:{src_line})")]
    UnknownDeclaration {
        /// Declaration name
        name: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Report Errors
    // =========================================================================
    /// Report generation error.
    #[error("Failed to generate report ({src_path}:{src_line}): {message}")]
    ReportGeneration {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Multiple errors occurred.
    #[error("Multiple errors occurred ({count} total)")]
    Multiple {
        /// Number of errors
        count: usize,
        /// The individual errors
        errors: Vec<SdkGateError>,
    },
}

impl SdkGateError {
    /// Creates an `Io` error.
    #[must_use]
    pub fn io(
        path: impl Into<PathBuf>,
        source: std::io::Error,
        src_path: &'static str,
        src_line: u32,
    ) -> Self {
        Self::Io { path: path.into(), source, src_path, src_line }
    }

    /// Returns the appropriate exit code for the error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied => 13,
            Self::FileNotFound { .. } => 14,
            Self::VersionParse { .. } | Self::InvalidVersion { .. } => 15,
            Self::UnknownPlatform { .. } => 16,
            Self::FactsParse { .. } | Self::InvalidDeclaration { .. } => 17,
            Self::ConfigParse { .. } => 18,
            Self::ConfigValue { .. } => 19,
            Self::UnknownDeclaration { .. } => 20,
            Self::Multiple { .. } => 21,
            _ => 1,
        }
    }

    /// Consolidates multiple errors into a single `SdkGateError::Multiple`
    /// if there's more than one. Otherwise, returns the single error or
    /// `Ok(())` if no errors.
    ///
    /// # Errors
    ///
    /// Returns the collected error(s), if any.
    pub fn collect(errors: Vec<Self>) -> Result<()> {
        let mut iter = errors.into_iter();
        match (iter.next(), iter.next()) {
            (None, _) => Ok(()),
            (Some(only), None) => Err(only),
            (Some(first), Some(second)) => {
                let mut errors = vec![first, second];
                errors.extend(iter);
                Err(Self::Multiple {
                    count: errors.len(),
                    errors,
                })
            }
        }
    }
}

/// Extension trait for `Result` to add context to errors.
pub trait ResultExt<T, E> {
    /// Adds a file path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            let path = path.into();
            let source = match e.into().downcast::<std::io::Error>() {
                Ok(io) => *io,
                Err(other) => std::io::Error::other(other),
            };
            if source.kind() == std::io::ErrorKind::NotFound {
                SdkGateError::FileNotFound { path, src_path: file!(), src_line: line!() }
            } else {
                SdkGateError::io(path, source, file!(), line!())
            }
        })
    }
}

impl From<std::io::Error> for SdkGateError {
    fn from(source: std::io::Error) -> Self {
        // Prefer `ResultExt::with_path` when the path is known
        Self::Io {
            path: PathBuf::new(),
            source,
            src_path: file!(),
            src_line: line!(),
        }
    }
}

impl From<serde_json::Error> for SdkGateError {
    fn from(source: serde_json::Error) -> Self {
        Self::ReportGeneration {
            message: format!("JSON serialization error: {source}"),
            src_path: file!(),
            src_line: line!(),
        }
    }
}

/// A utility for collecting multiple errors during ingestion.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<SdkGateError>,
}

impl ErrorCollector {
    /// Create a new error collector.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection.
    pub fn add(&mut self, error: SdkGateError) {
        self.errors.push(error);
    }

    /// Get the number of collected errors.
    #[must_use]
    pub fn count(&self) -> usize {
        self.errors.len()
    }

    /// Convert to a Result, returning Multiple error if there are any errors.
    pub fn into_result(self) -> Result<()> {
        SdkGateError::collect(self.errors)
    }
}
