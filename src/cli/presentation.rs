//! Presentation: generator listings and run summaries.

use crate::action::HookEvent;
use crate::config::JargalConfig;
use crate::error::ApiError;
use comfy_table::Table;
use owo_colors::OwoColorize;

pub fn format_generator_list_text(config: &JargalConfig) -> String {
    if config.generators.is_empty() {
        return "No generators configured.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Name", "Description", "Templates", "Destination"]);
    for generator in &config.generators {
        table.add_row(vec![
            generator.name.clone(),
            generator.description.clone().unwrap_or_else(|| "-".to_string()),
            generator.templates.display().to_string(),
            generator.destination.clone(),
        ]);
    }
    table.to_string()
}

pub fn format_generator_list_json(config: &JargalConfig) -> Result<String, ApiError> {
    let generators: Vec<serde_json::Value> = config
        .generators
        .iter()
        .map(|g| {
            serde_json::json!({
                "name": g.name,
                "description": g.description,
                "templates": g.templates,
                "destination": g.destination,
                "scope": g.scope_name(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&generators)
        .map_err(|e| ApiError::ConfigError(format!("Failed to encode generator list: {}", e)))
}

/// One line per hook event, then a count of written files.
pub fn format_run_summary(generator: Option<&str>, events: &[HookEvent], color: bool) -> String {
    let mut lines = Vec::with_capacity(events.len() + 1);
    let mut written = 0usize;
    for event in events {
        match event {
            HookEvent::Success(change) => {
                written += 1;
                let label = if color {
                    "created".green().to_string()
                } else {
                    "created".to_string()
                };
                lines.push(format!("  {} {}", label, change.path));
            }
            HookEvent::Comment(message) => lines.push(format!("  {}", message)),
            HookEvent::Failure(failure) => {
                let label = if color {
                    "failed".red().to_string()
                } else {
                    "failed".to_string()
                };
                lines.push(format!("  {} {}", label, failure.path));
            }
        }
    }
    let noun = if written == 1 { "file" } else { "files" };
    lines.push(match generator {
        Some(name) => format!("Generator '{}' wrote {} {}", name, written, noun),
        None => format!("Wrote {} {}", written, noun),
    });
    lines.join("\n")
}
