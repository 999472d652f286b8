//! Centralized error handling for vic_batch
//!
//! Every fallible operation in the crate returns [`DriverError`] through the
//! [`Result`] alias so the CLI can report a single, readable failure.

use std::fmt;
use std::path::PathBuf;

/// Main error type for batch conversion runs
#[derive(Debug)]
pub enum DriverError {
    /// I/O operation errors
    IoError(std::io::Error),

    /// First year comes after the last year
    InvalidYearRange { begin: i32, end: i32 },

    /// Zero workers (or otherwise unusable worker count) requested
    InvalidWorkerCount(usize),

    /// Base control file could not be found
    TemplateNotFound { path: PathBuf },

    /// Converter command line is empty or malformed
    InvalidCommand(String),

    /// Converter process could not be started
    WorkerSpawn {
        program: String,
        source: std::io::Error,
    },

    /// Converter process exited unsuccessfully
    WorkerFailed { config: PathBuf, status: String },

    /// One or more workers failed during a batch
    BatchFailed { failed: usize, total: usize },

    /// Thread pool configuration error
    ThreadPoolError(String),

    /// Generic error for ad-hoc messages
    Generic(String),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::IoError(e) => write!(f, "I/O error: {}", e),
            DriverError::InvalidYearRange { begin, end } => {
                write!(f, "Invalid year range: {} is after {}", begin, end)
            }
            DriverError::InvalidWorkerCount(n) => {
                write!(f, "Invalid worker count: {} (need at least one)", n)
            }
            DriverError::TemplateNotFound { path } => {
                write!(f, "Control file template '{}' not found", path.display())
            }
            DriverError::InvalidCommand(msg) => write!(f, "Invalid converter command: {}", msg),
            DriverError::WorkerSpawn { program, source } => {
                write!(f, "Failed to start converter '{}': {}", program, source)
            }
            DriverError::WorkerFailed { config, status } => {
                write!(f, "Converter failed on '{}': {}", config.display(), status)
            }
            DriverError::BatchFailed { failed, total } => {
                write!(f, "{} of {} workers failed", failed, total)
            }
            DriverError::ThreadPoolError(msg) => write!(f, "Thread pool error: {}", msg),
            DriverError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::IoError(e) => Some(e),
            DriverError::WorkerSpawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DriverError {
    fn from(error: std::io::Error) -> Self {
        DriverError::IoError(error)
    }
}

/// Result type alias for vic_batch operations
pub type Result<T> = std::result::Result<T, DriverError>;
