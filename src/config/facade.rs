//! Loader facade over the `config` crate layers.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::JargalConfig;
use crate::error::ApiError;
use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`JargalConfig`] from layered sources
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    global_file: Option<PathBuf>,
    use_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Global file at the XDG location, environment overrides enabled.
    pub fn new() -> Self {
        Self {
            global_file: global_file::global_config_path(),
            use_env: true,
        }
    }

    /// Read the global layer from `path` instead of the XDG location.
    pub fn with_global_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_file = Some(path.into());
        self
    }

    pub fn without_global_file(mut self) -> Self {
        self.global_file = None;
        self
    }

    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Defaults, global file, workspace files, environment.
    pub fn load(&self, workspace_root: &Path) -> Result<JargalConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder, self.global_file.as_deref());
        let builder = workspace_file::add_to_builder(builder, workspace_root);
        debug!(workspace = %workspace_root.display(), "Loading configuration");
        self.finish(builder)
    }

    /// Defaults, then exactly `path`, then environment. The file must exist.
    pub fn load_from_file(&self, path: &Path) -> Result<JargalConfig, ApiError> {
        if !path.is_file() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).format(FileFormat::Toml));
        debug!(config_path = %path.display(), "Loading configuration file");
        self.finish(builder)
    }

    fn finish(&self, builder: ConfigBuilder<DefaultState>) -> Result<JargalConfig, ApiError> {
        let builder = if self.use_env {
            environment::add_to_builder(builder)
        } else {
            builder
        };
        let config: JargalConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }
}
