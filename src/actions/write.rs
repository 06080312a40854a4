//! File write action
//!
//! Destination and content are resolved from, in order of precedence: the action's own
//! configuration, the per-call [`WriteInput`] handed over by a render step, then the
//! `destination`/`content` string fields of the context.

use crate::action::{Action, ActionParams, ActionRef, HookChange, HookFailure, Outcome};
use crate::error::{ActionError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// What to do when the destination already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Fail with a conflict error
    #[default]
    Fail,
    /// Remove the existing entry and write
    Force,
    /// Leave the existing entry alone and report it
    SkipIfExists,
}

impl FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "force" => Ok(WriteMode::Force),
            "skip-if-exists" => Ok(WriteMode::SkipIfExists),
            "" | "fail" => Ok(WriteMode::Fail),
            other => Err(format!(
                "unknown write mode '{}' (expected force or skip-if-exists)",
                other
            )),
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::Fail => write!(f, "fail"),
            WriteMode::Force => write!(f, "force"),
            WriteMode::SkipIfExists => write!(f, "skip-if-exists"),
        }
    }
}

/// Values supplied at call time, typically by a render step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteInput {
    pub content: Option<String>,
    pub destination: Option<PathBuf>,
}

impl WriteInput {
    pub fn new(content: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            content: Some(content.into()),
            destination: Some(destination.into()),
        }
    }
}

/// Write action configuration
#[derive(Debug, Clone, Default)]
pub struct Write {
    pub destination: Option<PathBuf>,
    pub content: Option<String>,
    pub mode: WriteMode,
    input: WriteInput,
}

impl Write {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    /// Copy of this action carrying per-call values.
    pub fn with_input(&self, input: WriteInput) -> Self {
        Self {
            input,
            ..self.clone()
        }
    }

    fn resolve(&self, params: &ActionParams<'_>) -> Result<(PathBuf, String)> {
        let destination = self
            .destination
            .clone()
            .or_else(|| self.input.destination.clone())
            .or_else(|| context_string(params, "destination").map(PathBuf::from))
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or_else(|| ActionError::Precondition("must provide `destination`".to_string()))?;

        let content = self
            .content
            .clone()
            .or_else(|| self.input.content.clone())
            .or_else(|| context_string(params, "content"))
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ActionError::Precondition("must provide `content`".to_string()))?;

        Ok((destination, content))
    }
}

fn context_string(params: &ActionParams<'_>, key: &str) -> Option<String> {
    params
        .context
        .get(key)
        .and_then(|value| value.as_str())
        .map(str::to_string)
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[async_trait]
impl Action for Write {
    fn name(&self) -> &str {
        "write"
    }

    async fn execute(&self, params: &mut ActionParams<'_>) -> Result<Outcome> {
        let (destination, content) = self.resolve(params)?;

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            params.fs.create_dir_all(parent).await?;
        }

        if params.fs.exists(&destination).await? {
            match self.mode {
                WriteMode::Force => {
                    debug!(path = %destination.display(), "Removing existing entry");
                    params.fs.remove_all(&destination).await?;
                }
                WriteMode::SkipIfExists => {
                    warn!(path = %destination.display(), "Destination exists, skipping");
                    params
                        .hooks
                        .on_comment(&format!("[SKIPPED] {} (exists)", display(&destination)));
                    return Ok(Outcome::Done);
                }
                WriteMode::Fail => {
                    let err = ActionError::Conflict(destination.clone());
                    params.hooks.on_failure(&HookFailure {
                        path: display(&destination),
                        error: err.to_string(),
                    });
                    return Err(err);
                }
            }
        }

        params.fs.write(&destination, content.as_bytes()).await?;
        params.hooks.on_success(&HookChange {
            path: display(&destination),
        });
        Ok(Outcome::Done)
    }
}

/// Shared write action for a fixed destination and content.
pub fn write(
    destination: impl Into<PathBuf>,
    content: impl Into<String>,
    mode: WriteMode,
) -> ActionRef {
    Arc::new(Write::new().destination(destination).content(content).mode(mode))
}
