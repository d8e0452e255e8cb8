//! # Error Handling
//!
//! This module provides the error type for the splitter library: a single
//! hierarchical enum whose variants each carry an [`ErrorContext`] with
//! operation, free-form context, recovery suggestion, severity and metadata.
//!
//! ## Taxonomy
//!
//! - `InvalidGrid`: a tile count was zero
//! - `DegenerateSize`: an intermediate dimension rounded to zero
//! - `UnsupportedFormat`: the input could not be decoded as a supported format
//! - `Config`, `Io`, `Codec`, `Resize`: the surrounding I/O and resampling glue
//! - `Aborted`: the caller declined the preview
//!
//! Every variant is terminal for the current invocation. Nothing in the crate
//! retries; tiles written before a failure are left on disk.
//!
//! ## Usage
//!
//! ```rust
//! use grid_splitter::error::{HasRecoverySuggestion, SplitError};
//!
//! let error = SplitError::invalid_grid(0, 4)
//!     .with_context("parsing command line")
//!     .with_recovery_suggestion("Use at least one tile per axis");
//!
//! assert_eq!(error.category(), "invalid_grid");
//! assert!(error.recovery_suggestion().is_some());
//! ```

use std::{error::Error as StdError, fmt};

use grid_scale::cpu::ScaleError;

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, e.g. the user declined the preview
    Info,
    /// Warnings that may indicate potential issues
    Warning,
    /// Errors that stop the current invocation
    Error,
    /// Errors caused by invalid input that will fail again unchanged
    Fatal,
}

/// Metadata about where an error occurred
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    /// Additional context about the error
    pub context: Option<String>,
    /// Suggested recovery action
    pub recovery_suggestion: Option<String>,
    /// Error severity level
    pub severity: ErrorSeverity,
    /// Additional metadata as key-value pairs
    pub metadata: std::collections::BTreeMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            operation: None,
            context: None,
            recovery_suggestion: None,
            severity: ErrorSeverity::Error,
            metadata: std::collections::BTreeMap::new(),
        }
    }
}

impl ErrorContext {
    /// Create a new error context
    pub fn new() -> Self {
        Self::default()
    }

    fn fatal() -> Self {
        Self {
            severity: ErrorSeverity::Fatal,
            ..Self::default()
        }
    }
}

/// Base error type for the splitter library
#[derive(Debug)]
pub enum SplitError {
    /// Zero tiles requested on an axis
    InvalidGrid {
        tiles_x: u32,
        tiles_y: u32,
        context: ErrorContext,
    },
    /// A computed width or height rounded to zero
    DegenerateSize {
        stage: String,
        width: u32,
        height: u32,
        context: ErrorContext,
    },
    /// Input file type is not one the decoder handles
    UnsupportedFormat {
        path: Option<String>,
        format: String,
        context: ErrorContext,
    },
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
    /// I/O errors
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
    /// Decode or encode failures from the `image` crate
    Codec {
        operation: String,
        source: image::ImageError,
        context: ErrorContext,
    },
    /// Resampling or buffer errors from the geometry core
    Resize {
        source: ScaleError,
        context: ErrorContext,
    },
    /// The caller declined to continue
    Aborted {
        stage: String,
        context: ErrorContext,
    },
}

impl SplitError {
    /// Create an invalid grid error
    pub fn invalid_grid(tiles_x: u32, tiles_y: u32) -> Self {
        Self::InvalidGrid {
            tiles_x,
            tiles_y,
            context: ErrorContext::fatal(),
        }
    }

    /// Create a degenerate size error
    pub fn degenerate_size(stage: impl Into<String>, width: u32, height: u32) -> Self {
        Self::DegenerateSize {
            stage: stage.into(),
            width,
            height,
            context: ErrorContext::fatal(),
        }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: None,
            format: format.into(),
            context: ErrorContext::fatal(),
        }
    }

    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::fatal(),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: None,
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create a codec error
    pub fn codec(operation: impl Into<String>, source: image::ImageError) -> Self {
        Self::Codec {
            operation: operation.into(),
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create an aborted error
    pub fn aborted(stage: impl Into<String>) -> Self {
        Self::Aborted {
            stage: stage.into(),
            context: ErrorContext {
                severity: ErrorSeverity::Info,
                ..ErrorContext::default()
            },
        }
    }

    /// Attach a path to I/O and format errors; other variants record it as metadata.
    pub fn with_path(mut self, p: impl AsRef<std::path::Path>) -> Self {
        let shown = p.as_ref().display().to_string();
        if let Self::Io { path, .. } | Self::UnsupportedFormat { path, .. } = &mut self {
            *path = Some(shown);
            return self;
        }
        self.context_mut().metadata.insert("path".to_string(), shown);
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_mut().context = Some(context.into());
        self
    }

    /// Add operation context
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add recovery suggestion
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_mut().metadata.insert(key.into(), value.into());
        self
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::InvalidGrid { context, .. } => context,
            Self::DegenerateSize { context, .. } => context,
            Self::UnsupportedFormat { context, .. } => context,
            Self::Config { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Codec { context, .. } => context,
            Self::Resize { context, .. } => context,
            Self::Aborted { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::InvalidGrid { context, .. } => context,
            Self::DegenerateSize { context, .. } => context,
            Self::UnsupportedFormat { context, .. } => context,
            Self::Config { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Codec { context, .. } => context,
            Self::Resize { context, .. } => context,
            Self::Aborted { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidGrid { .. } => "invalid_grid",
            Self::DegenerateSize { .. } => "degenerate_size",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::Config { .. } => "config",
            Self::Io { .. } => "io",
            Self::Codec { .. } => "codec",
            Self::Resize { .. } => "resize",
            Self::Aborted { .. } => "aborted",
        }
    }
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitError::InvalidGrid {
                tiles_x, tiles_y, ..
            } => {
                write!(
                    f,
                    "Invalid grid {}x{}: tile counts must be at least 1",
                    tiles_x, tiles_y
                )
            }
            SplitError::DegenerateSize {
                stage,
                width,
                height,
                ..
            } => {
                write!(
                    f,
                    "Degenerate size {}x{} computed during {}",
                    width, height, stage
                )
            }
            SplitError::UnsupportedFormat { path, format, .. } => {
                if let Some(path) = path {
                    write!(f, "Unsupported image format '{}' for '{}'", format, path)
                } else {
                    write!(f, "Unsupported image format '{}'", format)
                }
            }
            SplitError::Config {
                field,
                value,
                reason,
                ..
            } => {
                write!(
                    f,
                    "Configuration error in '{}': {} (value: {})",
                    field, reason, value
                )
            }
            SplitError::Io {
                operation,
                path,
                source,
                ..
            } => {
                if let Some(path) = path {
                    write!(
                        f,
                        "I/O error during {} on '{}': {}",
                        operation, path, source
                    )
                } else {
                    write!(f, "I/O error during {}: {}", operation, source)
                }
            }
            SplitError::Codec {
                operation, source, ..
            } => {
                write!(f, "Image codec error during {}: {}", operation, source)
            }
            SplitError::Resize { source, .. } => write!(f, "Resampling failed: {}", source),
            SplitError::Aborted { stage, .. } => write!(f, "Aborted by user at {}", stage),
        }
    }
}

impl StdError for SplitError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Codec { source, .. } => Some(source),
            Self::Resize { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias using our custom error type
pub type SplitResult<T> = Result<T, SplitError>;

/// Trait for errors with severity levels
pub trait HasSeverity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for SplitError {
    fn severity(&self) -> ErrorSeverity {
        self.context().severity
    }
}

/// Trait for errors that provide recovery suggestions
pub trait HasRecoverySuggestion {
    /// Get recovery suggestion for this error
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for SplitError {
    fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion.as_deref()
    }
}

/// Error classification utilities
pub mod classify {
    use super::*;

    /// Input errors that will fail the same way if re-run unchanged
    pub fn is_fatal(error: &SplitError) -> bool {
        error.severity() == ErrorSeverity::Fatal
    }

    /// The user chose to stop; not a failure worth a non-zero exit
    pub fn is_user_abort(error: &SplitError) -> bool {
        matches!(error, SplitError::Aborted { .. })
    }
}

impl From<ScaleError> for SplitError {
    fn from(error: ScaleError) -> Self {
        match error {
            ScaleError::InvalidGrid { tiles_x, tiles_y } => Self::invalid_grid(tiles_x, tiles_y)
                .with_recovery_suggestion("Use at least one tile horizontally and vertically"),
            ScaleError::DegenerateSize { stage, w, h } => Self::degenerate_size(stage, w, h)
                .with_recovery_suggestion("Use fewer tiles or a larger source image"),
            ScaleError::InvalidRatio(_) => Self::Resize {
                source: error,
                context: ErrorContext::fatal(),
            }
            .with_recovery_suggestion("Use a positive, finite width:height ratio"),
            other => Self::Resize {
                source: other,
                context: ErrorContext::new(),
            },
        }
    }
}

impl From<std::io::Error> for SplitError {
    fn from(error: std::io::Error) -> Self {
        Self::io("unknown", error)
    }
}

impl From<image::ImageError> for SplitError {
    fn from(error: image::ImageError) -> Self {
        match error {
            image::ImageError::Unsupported(e) => Self::unsupported_format(e.to_string()),
            image::ImageError::IoError(e) => Self::io("image codec", e),
            other => Self::codec("image codec", other),
        }
    }
}
