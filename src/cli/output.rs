//! CLI output: error mapping from domain errors to the CLI surface.

use crate::error::ApiError;

/// One-line message for a failed command. Multi-line errors (such as write conflicts)
/// are folded onto one line.
pub fn map_error(e: &ApiError) -> String {
    let message = e
        .to_string()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    format!("Error: {}", message)
}
