//! Error types for the script subsystem.

use thiserror::Error;

/// Errors that can occur in the script store, runner, or installer.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// A payload failed validation. User-correctable.
    #[error("Invalid script: {0}")]
    InvalidScript(String),

    /// An operation referenced an unknown script id.
    #[error("Script '{0}' not found")]
    NotFound(String),

    /// Script code failed while running. Contained at the runner boundary.
    #[error("Script '{name}' failed: {message}")]
    ExecutionFailure { name: String, message: String },

    /// Storage read/write failure. Always soft — logged, never fatal.
    #[error("Persistence error: {0}")]
    PersistenceFailure(String),
}

/// Result type alias for script operations.
pub type ScriptResult<T> = Result<T, ScriptError>;
