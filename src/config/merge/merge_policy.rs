//! Merge rules: defaults and override order.
//!
//! Later sources replace earlier ones key by key; tables merge, arrays (such as
//! `generators`) are replaced as a whole.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Create a Config builder with the built-in defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("logging.level", "warn")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")?
        .set_default("templates.extension", ".hbs")?
        .set_default("templates.exclude_partials", true)
}
