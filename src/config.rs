//! Configuration System
//!
//! Settings are layered, lowest precedence first: built-in defaults, the global file
//! (`$XDG_CONFIG_HOME/jargal/config.toml`), the workspace file (`<workspace>/jargal.toml`,
//! then `jargal.<JARGAL_ENV>.toml`), and `JARGAL__*` environment variables.
//!
//! Besides logging and template settings the file declares generators as
//! [`GeneratorManifest`]s, which [`JargalConfig::run_config`] turns into runnable
//! [`Generator`](crate::generator::Generator)s.

use crate::actions::write::WriteMode;
use crate::error::ApiError;
use crate::generator::RunConfig;
use crate::logging::LoggingConfig;
use crate::prompt::{PromptKind, Prompter};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

mod facade;
mod manifest;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use manifest::GeneratorManifest;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JargalConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub templates: TemplateSettings,

    #[serde(default)]
    pub generators: Vec<GeneratorManifest>,
}

/// How template directories are read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSettings {
    /// Stripped from template keys; empty keeps file names unchanged
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Keep `_`-prefixed files out of the rendered set
    #[serde(default = "default_exclude_partials")]
    pub exclude_partials: bool,
}

fn default_extension() -> String {
    ".hbs".to_string()
}

fn default_exclude_partials() -> bool {
    true
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            exclude_partials: default_exclude_partials(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Generator(String, String),
    Templates(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Generator(name, msg) => write!(f, "Generator '{}': {}", name, msg),
            ValidationError::Templates(msg) => write!(f, "Templates: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl TemplateSettings {
    pub fn validate(&self) -> Result<(), String> {
        if !self.extension.is_empty() && !self.extension.starts_with('.') {
            return Err(format!(
                "Extension '{}' must start with a dot",
                self.extension
            ));
        }
        Ok(())
    }
}

impl GeneratorManifest {
    /// Check one manifest in isolation
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name cannot be empty".to_string());
        }
        if self.templates.as_os_str().is_empty() {
            return Err("Template directory cannot be empty".to_string());
        }
        if self.destination.trim().is_empty() {
            return Err("Destination cannot be empty".to_string());
        }
        for prompt in &self.prompts {
            if prompt.name.trim().is_empty() {
                return Err("Prompt name cannot be empty".to_string());
            }
            if matches!(prompt.kind, PromptKind::Select | PromptKind::MultiSelect)
                && prompt.choices.is_empty()
            {
                return Err(format!("Prompt '{}' needs at least one choice", prompt.name));
            }
        }
        Ok(())
    }
}

impl JargalConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.templates.validate() {
            errors.push(ValidationError::Templates(e));
        }

        let mut seen = HashSet::new();
        for manifest in &self.generators {
            if let Err(e) = manifest.validate() {
                errors.push(ValidationError::Generator(manifest.name.clone(), e));
            }
            // Selection by name only picks the first of several with the same name
            if !seen.insert(manifest.name.as_str()) {
                warn!(generator = %manifest.name, "Duplicate generator name");
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn find(&self, name: &str) -> Option<&GeneratorManifest> {
        self.generators.iter().find(|g| g.name == name)
    }

    /// Build runnable generators. Relative template and destination paths resolve
    /// against `workspace`; `mode` overrides every manifest's write mode.
    pub fn run_config(
        &self,
        workspace: &Path,
        prompter: Arc<dyn Prompter>,
        mode: Option<WriteMode>,
    ) -> Result<RunConfig, ApiError> {
        self.validate().map_err(|errors| {
            ApiError::ConfigError(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;

        let generators = self
            .generators
            .iter()
            .map(|manifest| {
                manifest.to_generator(&self.templates, workspace, prompter.clone(), mode)
            })
            .collect();
        Ok(RunConfig::new(generators))
    }
}
