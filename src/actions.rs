//! Action combinators
//!
//! Higher-order constructors that build actions out of callbacks, templates and other
//! actions. Each returns an [`ActionRef`](crate::action::ActionRef) ready to be placed in a
//! generator.

pub mod combine;
pub mod context;
pub mod echo;
pub mod prompt;
pub mod render;
pub mod select;
pub mod templates;
pub mod write;

pub use combine::combine;
pub use context::{context, context_async, set_context};
pub use echo::echo;
pub use prompt::prompt;
pub use render::{render_scope, render_template, RenderScope, RenderSink, RenderTemplate};
pub use select::select_generator;
pub use templates::{load_templates, TemplateLoader, TemplateRecord, TemplatesMap};
pub use write::{write, Write, WriteInput, WriteMode};
