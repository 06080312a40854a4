//! Error types for the Jargal generator toolkit.

use std::path::PathBuf;
use thiserror::Error;

/// Template registry and rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Registry name must be a non-empty string")]
    EmptyName,

    #[error("A {scope} named '{name}' is already registered (set override to replace it)")]
    Duplicate { scope: &'static str, name: String },

    #[error("Invalid template: {0}")]
    Template(String),

    #[error("Render failed: {0}")]
    Render(String),
}

impl From<handlebars::TemplateError> for RenderError {
    fn from(err: handlebars::TemplateError) -> Self {
        RenderError::Template(err.to_string())
    }
}

impl From<handlebars::RenderError> for RenderError {
    fn from(err: handlebars::RenderError) -> Self {
        RenderError::Render(err.to_string())
    }
}

/// Errors raised while an action executes
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("File already exists\n -> {}", .0.display())]
    Conflict(PathBuf),

    /// A user callback failed; surfaced as-is.
    #[error(transparent)]
    Callback(#[from] anyhow::Error),

    #[error("Context update must be an object, got {0}")]
    InvalidPatch(String),

    #[error("Template error: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to walk directory: {0}")]
    Walk(String),

    #[error("Generator selection failed: {0}")]
    Selection(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for action execution
pub type Result<T> = std::result::Result<T, ActionError>;

/// Top-level errors surfaced to callers of `run`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError::Action(ActionError::Render(err))
    }
}
