//! Workspace config file source: jargal.toml and jargal.{JARGAL_ENV}.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use std::path::{Path, PathBuf};

pub const WORKSPACE_FILE: &str = "jargal.toml";

/// Workspace files in precedence order: base file, then the environment-specific one.
pub fn workspace_config_paths(workspace_root: &Path, env_name: Option<&str>) -> Vec<PathBuf> {
    let mut paths = vec![workspace_root.join(WORKSPACE_FILE)];
    if let Some(env_name) = env_name.filter(|name| !name.is_empty()) {
        paths.push(workspace_root.join(format!("jargal.{}.toml", env_name)));
    }
    paths
}

/// Add existing workspace config files to the builder.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> ConfigBuilder<DefaultState> {
    let env_name = std::env::var("JARGAL_ENV").ok();
    for path in workspace_config_paths(workspace_root, env_name.as_deref()) {
        if path.is_file() {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
    }
    builder
}
