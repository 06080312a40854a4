//! Logging setup
//!
//! Structured logging through `tracing`. Level, format and destination come from, highest
//! priority first: the `JARGAL_LOG*` environment variables, the `[logging]` table of the
//! settings file, then the defaults (warn, text, stderr). Generated output goes to stdout
//! so logs default to stderr.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub const LOG_ENV: &str = "JARGAL_LOG";
pub const LOG_FORMAT_ENV: &str = "JARGAL_LOG_FORMAT";
pub const LOG_OUTPUT_ENV: &str = "JARGAL_LOG_OUTPUT";
pub const LOG_MODULES_ENV: &str = "JARGAL_LOG_MODULES";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// json or text
    #[serde(default = "default_format")]
    pub format: String,

    /// stdout, stderr or file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file when `output = "file"`
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Colored text output on terminals
    #[serde(default = "default_true")]
    pub color: bool,

    /// Per-module levels, e.g. `"jargal::engine" = "debug"`
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Output {
    Stdout,
    Stderr,
    File(PathBuf),
}

/// Initialize the global subscriber. Fails if one is already installed.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let env = |key: &str| std::env::var(key).ok();
    let filter = build_env_filter(config, env)?;
    let format = determine_format(config, env)?;
    let output = determine_output(config, env)?;
    let use_color = config.map(|c| c.color).unwrap_or(true);

    let (writer, ansi) = match output {
        Output::Stdout => (BoxMakeWriter::new(std::io::stdout), use_color),
        Output::Stderr => (BoxMakeWriter::new(std::io::stderr), use_color),
        Output::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ApiError::Logging(format!("Failed to create log directory: {}", e))
                })?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    ApiError::Logging(format!("Failed to open log file {:?}: {}", path, e))
                })?;
            (BoxMakeWriter::new(std::sync::Mutex::new(file)), false)
        }
    };

    let subscriber = Registry::default().with(filter);
    let result = match format {
        Format::Json => subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init(),
        Format::Text => subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init(),
    };

    result.map_err(|e| ApiError::Logging(e.to_string()))
}

fn build_env_filter<E>(config: Option<&LoggingConfig>, env: E) -> Result<EnvFilter, ApiError>
where
    E: Fn(&str) -> Option<String>,
{
    if let Some(spec) = env(LOG_ENV).filter(|s| !s.trim().is_empty()) {
        return EnvFilter::try_new(&spec)
            .map_err(|e| ApiError::Logging(format!("Invalid {} value '{}': {}", LOG_ENV, spec, e)));
    }

    let level = config.map(|c| c.level.as_str()).unwrap_or("warn");
    if level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::try_new(level)
        .map_err(|e| ApiError::Logging(format!("Invalid log level '{}': {}", level, e)))?;

    let mut directives: Vec<String> = config
        .map(|c| {
            c.modules
                .iter()
                .map(|(module, level)| format!("{}={}", module, level))
                .collect()
        })
        .unwrap_or_default();

    if let Some(modules) = env(LOG_MODULES_ENV) {
        directives.extend(modules.split(',').filter_map(|spec| {
            spec.split_once('=')
                .map(|(module, level)| format!("{}={}", module.trim(), level.trim()))
        }));
    }

    for directive in directives {
        let parsed: Directive = directive.parse().map_err(|e| {
            ApiError::Logging(format!("Invalid log directive '{}': {}", directive, e))
        })?;
        filter = filter.add_directive(parsed);
    }

    Ok(filter)
}

fn determine_format<E>(config: Option<&LoggingConfig>, env: E) -> Result<Format, ApiError>
where
    E: Fn(&str) -> Option<String>,
{
    let format = env(LOG_FORMAT_ENV)
        .or_else(|| config.map(|c| c.format.clone()))
        .unwrap_or_else(default_format);

    match format.as_str() {
        "text" => Ok(Format::Text),
        "json" => Ok(Format::Json),
        other => Err(ApiError::Logging(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

fn determine_output<E>(config: Option<&LoggingConfig>, env: E) -> Result<Output, ApiError>
where
    E: Fn(&str) -> Option<String>,
{
    let output = env(LOG_OUTPUT_ENV)
        .or_else(|| config.map(|c| c.output.clone()))
        .unwrap_or_else(default_output);

    match output.as_str() {
        "stdout" => Ok(Output::Stdout),
        "stderr" => Ok(Output::Stderr),
        "file" => config
            .and_then(|c| c.file.clone())
            .map(Output::File)
            .ok_or_else(|| {
                ApiError::Logging("Log output 'file' requires logging.file to be set".to_string())
            }),
        other => Err(ApiError::Logging(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr' or 'file')",
            other
        ))),
    }
}
