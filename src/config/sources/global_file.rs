//! Global config file source: $XDG_CONFIG_HOME/jargal/config.toml or ~/.config/jargal/config.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use directories::BaseDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path of the global config file, if a home directory can be determined.
pub fn global_config_path() -> Option<PathBuf> {
    let config_dir = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf()))?;
    Some(config_dir.join("jargal").join("config.toml"))
}

/// Add the global config file to the builder if it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: Option<&Path>,
) -> ConfigBuilder<DefaultState> {
    match path {
        Some(path) if path.is_file() => {
            let canonical = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            debug!(config_path = %canonical.display(), "Using global configuration");
            builder.add_source(File::from(canonical).format(FileFormat::Toml).required(false))
        }
        Some(path) => {
            debug!(config_path = %path.display(), "No global configuration file");
            builder
        }
        None => builder,
    }
}
