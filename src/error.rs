//! Error types for the MeshStream engine
//!
//! This module defines the error types used throughout the engine,
//! including spatial indexing, persistence, and streaming reconciliation.

use std::fmt;

/// Result type for MeshStream engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// MeshStream engine errors
#[derive(Debug)]
pub enum Error {
    /// A required collection is missing or empty at load time
    NotFound(String),

    /// Malformed individual record (bad geometry/material descriptor)
    StructuralError(String),

    /// A hit-set mesh id has no corresponding mesh record
    LookupMiss(String),

    /// Insertion point not claimed by any child cube during subdivision
    ContainmentMiss(String),

    /// Invalid configuration (zero step, non-positive size, etc.)
    InvalidConfig(String),

    /// Initialization failed (engine, store, subsystems)
    InitializationFailed(String),

    /// Underlying storage I/O failure
    Io(std::io::Error),

    /// Record encode/decode failure in the storage layer
    Codec(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::StructuralError(msg) => write!(f, "Structural error: {}", msg),
            Error::LookupMiss(msg) => write!(f, "Lookup miss: {}", msg),
            Error::ContainmentMiss(msg) => write!(f, "Containment miss: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Codec(msg) => write!(f, "Codec error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

// ===== ERROR MACROS =====

/// Construct an Error variant and log it with file:line information.
///
/// # Example
///
/// ```ignore
/// let err = engine_err!(StructuralError, "meshstream::MeshStore",
///     "record {} has no geometry type", id);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($variant:ident, $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::meshstream::Engine::log_detailed(
            $crate::meshstream::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::meshstream::Error::$variant(message)
    }};
}

/// Log an Error variant and return it from the enclosing function.
///
/// # Example
///
/// ```ignore
/// if record.entries.is_empty() && record.child_ids.is_none() {
///     engine_bail!(StructuralError, "meshstream::IndexStore",
///         "node {} is empty and has no children", record.id);
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($variant:ident, $source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($variant, $source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
