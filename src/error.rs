//! Error hierarchy for fitrs
//!
//! The analytics engine itself never fails: invalid numeric inputs fall back
//! to safe defaults. Errors only arise at the edges (configuration files,
//! CSV input, strict name parsing) and are mapped to a boundary status through
//! a single table keyed on [`ErrorKind`].

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all fitrs operations
#[derive(Debug, Error)]
pub enum FitRsError {
    /// A name did not match any known variant of an enumeration
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    /// Malformed input record (CSV row, date, number)
    #[error("Parse error at {location}: {reason}")]
    Parse { location: String, reason: String },

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input file could not be found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for fitrs operations
pub type Result<T> = std::result::Result<T, FitRsError>;

/// Closed classification of every error the crate can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Configuration,
    Io,
    Internal,
}

/// How an error kind is reported at the system boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryMapping {
    pub kind: ErrorKind,
    pub status: u16,
    pub message: &'static str,
}

/// One row per [`ErrorKind`], in declaration order.
const BOUNDARY_TABLE: [BoundaryMapping; 5] = [
    BoundaryMapping {
        kind: ErrorKind::InvalidInput,
        status: 400,
        message: "The request contained invalid input",
    },
    BoundaryMapping {
        kind: ErrorKind::NotFound,
        status: 404,
        message: "The requested resource was not found",
    },
    BoundaryMapping {
        kind: ErrorKind::Configuration,
        status: 500,
        message: "The service is misconfigured",
    },
    BoundaryMapping {
        kind: ErrorKind::Io,
        status: 503,
        message: "A storage operation failed",
    },
    BoundaryMapping {
        kind: ErrorKind::Internal,
        status: 500,
        message: "An unexpected error occurred",
    },
];

impl ErrorKind {
    /// Look up the boundary status and message for this kind
    pub fn boundary(self) -> &'static BoundaryMapping {
        &BOUNDARY_TABLE[self as usize]
    }

    pub fn status(self) -> u16 {
        self.boundary().status
    }

    pub fn all() -> [ErrorKind; 5] {
        [
            ErrorKind::InvalidInput,
            ErrorKind::NotFound,
            ErrorKind::Configuration,
            ErrorKind::Io,
            ErrorKind::Internal,
        ]
    }
}

impl FitRsError {
    /// Parse error helper
    pub fn parse(location: impl Into<String>, reason: impl Into<String>) -> Self {
        FitRsError::Parse {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FitRsError::UnknownVariant { .. }
            | FitRsError::Parse { .. }
            | FitRsError::Validation(_)
            | FitRsError::Csv(_) => ErrorKind::InvalidInput,
            FitRsError::FileNotFound { .. } => ErrorKind::NotFound,
            FitRsError::Configuration(_) => ErrorKind::Configuration,
            FitRsError::Io(_) => ErrorKind::Io,
            FitRsError::Serialization(_) | FitRsError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            ErrorKind::InvalidInput | ErrorKind::NotFound => ErrorSeverity::Warning,
            ErrorKind::Configuration | ErrorKind::Io => ErrorSeverity::Error,
            ErrorKind::Internal => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            FitRsError::FileNotFound { path } => {
                format!("Could not find input file: {}", path.display())
            }
            FitRsError::UnknownVariant { kind, value } => {
                format!("'{}' is not a recognised {}", value, kind)
            }
            FitRsError::Parse { location, reason } => {
                format!("Could not read {}: {}", location, reason)
            }
            _ => self.kind().boundary().message.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical error requiring immediate attention
    Critical,
    /// Error that prevents the operation
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
