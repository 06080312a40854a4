//! Jargal: composable actions and generators
//!
//! A generator is an ordered list of [`action::Action`]s run against one shared
//! [`context::Context`]. Actions may finish, or hand back more actions to run in their
//! place; the [`engine::Runner`] expands these depth-first, left to right, without growing
//! the call stack. Combinators in [`actions`] cover context updates, grouping, template
//! loading, rendering and writing files.

pub mod action;
pub mod actions;
pub mod cli;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod fs;
pub mod generator;
pub mod logging;
pub mod prompt;
pub mod renderer;

pub use action::{Action, ActionHooks, ActionParams, ActionRef, Outcome};
pub use context::{Context, ContextView};
pub use engine::{run, Runner};
pub use error::{ActionError, ApiError, RenderError};
pub use generator::{Generator, RunConfig};
pub use renderer::Renderer;
