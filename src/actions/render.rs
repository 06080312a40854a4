//! Template rendering combinators
//!
//! [`RenderTemplate`] renders one content template and one destination template against
//! the context (or a selected slice of it) and hands the result to its sink.
//! [`RenderScope`] does the same for every template of a loaded scope and expands into one
//! write per template.

use crate::action::{from_fn, Action, ActionParams, ActionRef, Outcome};
use crate::actions::templates::{TemplatesMap, TEMPLATES_KEY};
use crate::actions::write::{Write, WriteInput, WriteMode};
use crate::context::ContextView;
use crate::error::{ActionError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Picks the render data out of the context
pub type DataSelector = Arc<dyn Fn(&ContextView) -> anyhow::Result<Value> + Send + Sync>;

/// Where a rendered template goes
#[derive(Debug, Clone, Default)]
pub enum RenderSink {
    /// Render only
    #[default]
    None,
    /// Continue with this write, given the rendered content and destination
    Write(Write),
    /// Append `{ savePath, content }` to the context array under this key
    Context(String),
}

/// Render a single template
#[derive(Clone)]
pub struct RenderTemplate {
    template: String,
    destination: String,
    data: Option<DataSelector>,
    sink: RenderSink,
}

impl std::fmt::Debug for RenderTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderTemplate")
            .field("destination", &self.destination)
            .field("data", &self.data.is_some())
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

fn select_data(selector: Option<&DataSelector>, params: &ActionParams<'_>) -> Result<Value> {
    match selector {
        Some(select) => Ok(select(&params.context.view())?),
        None => Ok(params.context.to_value()),
    }
}

impl RenderTemplate {
    pub fn new(template: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            destination: destination.into(),
            data: None,
            sink: RenderSink::None,
        }
    }

    /// Render against the selector's output instead of the whole context.
    pub fn data<F>(mut self, select: F) -> Self
    where
        F: Fn(&ContextView) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.data = Some(Arc::new(select));
        self
    }

    pub fn sink(mut self, sink: RenderSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn into_write(self, write: Write) -> Self {
        self.sink(RenderSink::Write(write))
    }

    pub fn into_context(self, key: impl Into<String>) -> Self {
        self.sink(RenderSink::Context(key.into()))
    }

    /// Shared action; an empty template yields a no-op.
    pub fn into_action(self) -> ActionRef {
        if self.template.is_empty() {
            return from_fn("render-template", |_| Ok(Outcome::Done));
        }
        Arc::new(self)
    }
}

#[async_trait]
impl Action for RenderTemplate {
    fn name(&self) -> &str {
        "render-template"
    }

    async fn execute(&self, params: &mut ActionParams<'_>) -> Result<Outcome> {
        if self.template.is_empty() {
            return Ok(Outcome::Done);
        }

        let data = select_data(self.data.as_ref(), params)?;
        let content = params.renderer.render_string(&self.template, &data)?;
        let destination = params.renderer.render_string(&self.destination, &data)?;
        debug!(destination = %destination, bytes = content.len(), "Rendered template");

        match &self.sink {
            RenderSink::None => Ok(Outcome::Done),
            RenderSink::Write(write) => Ok(Outcome::next(
                write.with_input(WriteInput::new(content, destination)),
            )),
            RenderSink::Context(key) => {
                params
                    .context
                    .push(key, json!({ "savePath": destination, "content": content }));
                Ok(Outcome::Done)
            }
        }
    }
}

/// Render `template` to `destination` and write it with `mode`.
pub fn render_template(
    template: impl Into<String>,
    destination: impl Into<String>,
    mode: WriteMode,
) -> ActionRef {
    RenderTemplate::new(template, destination)
        .into_write(Write::new().mode(mode))
        .into_action()
}

/// Render every template of a loaded scope below a destination directory
#[derive(Clone)]
pub struct RenderScope {
    pub scope: String,
    /// Destination directory, itself a template
    pub destination: String,
    /// Joined in front of the rendered destination, never rendered itself
    pub root: Option<PathBuf>,
    pub data: Option<DataSelector>,
    pub mode: WriteMode,
}

impl std::fmt::Debug for RenderScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderScope")
            .field("scope", &self.scope)
            .field("destination", &self.destination)
            .field("root", &self.root)
            .field("data", &self.data.is_some())
            .field("mode", &self.mode)
            .finish()
    }
}

impl RenderScope {
    pub fn new(scope: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            destination: destination.into(),
            root: None,
            data: None,
            mode: WriteMode::default(),
        }
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn data<F>(mut self, select: F) -> Self
    where
        F: Fn(&ContextView) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.data = Some(Arc::new(select));
        self
    }

    fn templates(&self, params: &ActionParams<'_>) -> Result<TemplatesMap> {
        let loaded = params
            .context
            .get(TEMPLATES_KEY)
            .and_then(|templates| templates.get(&self.scope))
            .ok_or_else(|| {
                ActionError::Precondition(format!(
                    "no templates loaded for scope '{}'",
                    self.scope
                ))
            })?;
        Ok(serde_json::from_value(loaded.clone())?)
    }
}

#[async_trait]
impl Action for RenderScope {
    fn name(&self) -> &str {
        "render-scope"
    }

    async fn execute(&self, params: &mut ActionParams<'_>) -> Result<Outcome> {
        let templates = self.templates(params)?;
        let data = select_data(self.data.as_ref(), params)?;
        let rendered = params.renderer.render_string(&self.destination, &data)?;
        let base = match &self.root {
            Some(root) => root.join(rendered),
            None => PathBuf::from(rendered),
        };
        let write = Write::new().mode(self.mode);

        let mut writes: Vec<ActionRef> = Vec::with_capacity(templates.len());
        for (key, record) in templates {
            if record.template_content.is_empty() {
                debug!(template = %key, "Empty template, nothing to write");
                continue;
            }
            let content = params.renderer.render_string(&record.template_content, &data)?;
            if content.is_empty() {
                debug!(template = %key, "Template rendered empty, nothing to write");
                continue;
            }
            let save_path = params.renderer.render_string(&record.save_path, &data)?;
            let destination = base.join(save_path);
            writes.push(Arc::new(
                write.with_input(WriteInput::new(content, destination)),
            ));
        }

        debug!(scope = %self.scope, writes = writes.len(), "Rendered scope");
        Ok(Outcome::Many(writes))
    }
}

pub fn render_scope(scope: RenderScope) -> ActionRef {
    Arc::new(scope)
}
