//! Integration tests for the Jargal generator toolkit

mod cli_run;
mod config_generators;
mod runner_scenarios;
mod template_pipeline;
mod test_utils;
