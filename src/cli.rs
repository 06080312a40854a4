//! CLI domain: parse, route, output and presentation only.
//! No generation logic; the route table dispatches to the config and engine modules.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_generator_list_json, format_generator_list_text, format_run_summary};
pub use route::RunContext;
