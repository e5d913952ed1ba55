use thiserror::Error;

/// Unified error type for deploy operations
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("No hosts configured for role '{0}'")]
    NoHosts(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Step {index} ({description}) failed on {host} with exit code {code}: {stderr}")]
    StepFailed {
        index: usize,
        description: String,
        host: String,
        code: i32,
        stderr: String,
    },

    #[error("Cannot find revision '{name}': {reason}")]
    RevisionNotFound { name: String, reason: String },

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in solebtc-deploy
pub type Result<T> = std::result::Result<T, DeployError>;

impl DeployError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        DeployError::Config(msg.into())
    }

    /// Create a template error with context
    pub fn template(msg: impl Into<String>) -> Self {
        DeployError::Template(msg.into())
    }

    /// Create a not-implemented error naming the missing procedure
    pub fn not_implemented(msg: impl Into<String>) -> Self {
        DeployError::NotImplemented(msg.into())
    }

    /// Create an error for a branch or revision that does not exist
    pub fn revision_not_found(name: impl Into<String>, reason: impl Into<String>) -> Self {
        DeployError::RevisionNotFound {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Index of the failing step, if this error came from a step
    pub fn failed_step(&self) -> Option<usize> {
        match self {
            DeployError::StepFailed { index, .. } => Some(*index),
            _ => None,
        }
    }
}
