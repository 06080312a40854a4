//! CLI route: single route table and run context.

use crate::action::CollectingHooks;
use crate::actions::write::WriteMode;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_generator_list_json, format_generator_list_text, format_run_summary,
};
use crate::config::{ConfigLoader, JargalConfig};
use crate::context::Context;
use crate::engine::Runner;
use crate::error::ApiError;
use crate::prompt::{DialoguerPrompter, FixedPrompter, Prompter};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Runtime context for CLI execution: workspace and loaded configuration.
#[derive(Debug, Clone)]
pub struct RunContext {
    workspace_root: PathBuf,
    config: JargalConfig,
    color: bool,
}

impl RunContext {
    /// Load configuration for `workspace_root`, or from `config_path` when given.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let loader = ConfigLoader::new();
        let config = match config_path {
            Some(ref path) => loader.load_from_file(path)?,
            None => loader.load(&workspace_root)?,
        };
        Ok(Self::from_config(workspace_root, config))
    }

    pub fn from_config(workspace_root: PathBuf, config: JargalConfig) -> Self {
        let color = config.logging.color;
        Self {
            workspace_root,
            config,
            color,
        }
    }

    pub fn config(&self) -> &JargalConfig {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Execute a command and return its output.
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let start = Instant::now();
        let result = match command {
            Commands::Run {
                name,
                answers,
                mode,
                no_input,
            } => {
                self.handle_run(name.as_deref(), answers, mode.as_deref(), *no_input)
                    .await
            }
            Commands::List { format } => self.handle_list(format),
        };
        info!(
            ok = result.is_ok(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn handle_list(&self, format: &str) -> Result<String, ApiError> {
        match format {
            "json" => format_generator_list_json(&self.config),
            "text" => Ok(format_generator_list_text(&self.config)),
            other => Err(ApiError::ConfigError(format!(
                "Invalid format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }

    async fn handle_run(
        &self,
        name: Option<&str>,
        answers: &[String],
        mode: Option<&str>,
        no_input: bool,
    ) -> Result<String, ApiError> {
        let mode = mode
            .map(|m| m.parse::<WriteMode>())
            .transpose()
            .map_err(ApiError::ConfigError)?;

        let prompter: Arc<dyn Prompter> = if no_input {
            Arc::new(FixedPrompter::new())
        } else {
            Arc::new(DialoguerPrompter)
        };
        let run_config = self
            .config
            .run_config(&self.workspace_root, prompter, mode)?;

        let mut context = Context::new();
        for raw in answers {
            let (key, value) = self.parse_answer(name, raw)?;
            context.set_answer(key, value);
        }

        let hooks = Arc::new(CollectingHooks::new());
        let runner = Runner::new().with_hooks(hooks.clone());

        match name {
            Some(name) => {
                let generator = run_config.find(name).ok_or_else(|| {
                    ApiError::ConfigError(format!("No generator named '{}'", name))
                })?;
                runner.run_generator_with(generator, &mut context).await?;
            }
            None if no_input && run_config.generators.len() > 1 => {
                return Err(ApiError::ConfigError(
                    "Several generators are configured; name one to run without input"
                        .to_string(),
                ));
            }
            None => runner.run_with(&run_config, &mut context).await?,
        }

        Ok(format_run_summary(name, &hooks.events(), self.color))
    }

    /// `key=value`, typed by the matching prompt when one is declared.
    fn parse_answer(
        &self,
        generator: Option<&str>,
        raw: &str,
    ) -> Result<(String, Value), ApiError> {
        let (key, value) = raw.split_once('=').ok_or_else(|| {
            ApiError::ConfigError(format!("Invalid answer '{}' (expected KEY=VALUE)", raw))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ApiError::ConfigError(format!(
                "Invalid answer '{}' (empty key)",
                raw
            )));
        }

        let spec = self
            .config
            .generators
            .iter()
            .filter(|g| generator.map_or(true, |name| g.name == name))
            .flat_map(|g| g.prompts.iter())
            .find(|p| p.name == key);

        let value = match spec {
            Some(spec) => spec.coerce(value)?,
            None => Value::String(value.to_string()),
        };
        Ok((key.to_string(), value))
    }
}
