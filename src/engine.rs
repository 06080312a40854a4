//! Action execution engine
//!
//! The [`Runner`] interprets a tree of deferred actions. Every executed action yields an
//! [`Outcome`]; `Next` and `Many` results are expanded in place before the next sibling
//! starts, so a whole subtree finishes before anything to its right begins.
//!
//! Expansion uses an explicit stack of pending sibling lists rather than recursive calls,
//! so chains of actions returning actions can be arbitrarily deep. There is no cycle
//! detection: an action that keeps returning itself runs forever.

use crate::action::{ActionHooks, ActionParams, ActionRef, Outcome, TracingHooks};
use crate::actions::select::select_generator;
use crate::context::{Context, ErrorRecord};
use crate::error::{ActionError, ApiError, RenderError, Result};
use crate::fs::{FileSystem, LocalFs};
use crate::generator::{Generator, RunConfig};
use crate::prompt::{DialoguerSelector, GeneratorSelector};
use crate::renderer::Renderer;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Customizes the renderer created for each run
pub type RendererSetup =
    Arc<dyn Fn(&mut Renderer) -> std::result::Result<(), RenderError> + Send + Sync>;

/// Execute an outcome and everything it expands into.
///
/// Used by combinators that run child actions through the standard contract.
pub async fn execute_outcome(params: &mut ActionParams<'_>, outcome: Outcome) -> Result<()> {
    drive(params, outcome).await.map_err(|(_, err)| err)
}

/// Execute a single action and everything it expands into.
pub async fn execute_action(params: &mut ActionParams<'_>, action: ActionRef) -> Result<()> {
    execute_outcome(params, Outcome::Next(action)).await
}

/// Work-list loop. On failure returns the name of the action that failed with its error.
async fn drive(
    params: &mut ActionParams<'_>,
    root: Outcome,
) -> std::result::Result<(), (String, ActionError)> {
    let mut pending: Vec<std::vec::IntoIter<ActionRef>> = Vec::new();
    push_outcome(&mut pending, root);

    while let Some(frame) = pending.last_mut() {
        let Some(action) = frame.next() else {
            pending.pop();
            continue;
        };

        // Drop exhausted frames before expanding so Next-chains run in constant space
        if frame.len() == 0 {
            pending.pop();
        }

        debug!(action = action.name(), depth = pending.len(), "Executing action");
        let outcome = action
            .execute(params)
            .await
            .map_err(|err| (action.name().to_string(), err))?;

        push_outcome(&mut pending, outcome);
    }

    Ok(())
}

fn push_outcome(pending: &mut Vec<std::vec::IntoIter<ActionRef>>, outcome: Outcome) {
    match outcome {
        Outcome::Done => {}
        Outcome::Next(action) => pending.push(vec![action].into_iter()),
        Outcome::Many(actions) => {
            if !actions.is_empty() {
                pending.push(actions.into_iter());
            }
        }
    }
}

/// Runs generators: validates config, seeds the context, drives the actions
#[derive(Clone)]
pub struct Runner {
    fs: Arc<dyn FileSystem>,
    hooks: Arc<dyn ActionHooks>,
    selector: Arc<dyn GeneratorSelector>,
    renderer_setup: Option<RendererSetup>,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("renderer_setup", &self.renderer_setup.is_some())
            .finish_non_exhaustive()
    }
}

impl Runner {
    /// Local filesystem, tracing hooks, interactive generator selection.
    pub fn new() -> Self {
        Self {
            fs: Arc::new(LocalFs::new()),
            hooks: Arc::new(TracingHooks),
            selector: Arc::new(DialoguerSelector::new()),
            renderer_setup: None,
        }
    }

    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn ActionHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_selector(mut self, selector: Arc<dyn GeneratorSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_renderer_setup<F>(mut self, setup: F) -> Self
    where
        F: Fn(&mut Renderer) -> std::result::Result<(), RenderError> + Send + Sync + 'static,
    {
        self.renderer_setup = Some(Arc::new(setup));
        self
    }

    /// Fresh renderer for one run.
    pub fn renderer(&self) -> std::result::Result<Renderer, RenderError> {
        let mut renderer = Renderer::new();
        if let Some(setup) = &self.renderer_setup {
            setup(&mut renderer)?;
        }
        Ok(renderer)
    }

    /// Execute one action (and its expansions) against caller-owned state.
    pub async fn execute(
        &self,
        action: ActionRef,
        context: &mut Context,
        renderer: &mut Renderer,
    ) -> Result<()> {
        let mut params =
            ActionParams::new(context, renderer, self.fs.as_ref(), self.hooks.as_ref());
        execute_action(&mut params, action).await
    }

    /// Run a generator against a fresh context and renderer.
    pub async fn run_generator(&self, generator: &Generator) -> std::result::Result<(), ApiError> {
        let mut context = Context::new();
        self.run_generator_with(generator, &mut context).await
    }

    /// Run a generator against a caller-provided context.
    ///
    /// A failing action is appended to the context's `errors` before the error is returned;
    /// files written by earlier steps stay on disk.
    pub async fn run_generator_with(
        &self,
        generator: &Generator,
        context: &mut Context,
    ) -> std::result::Result<(), ApiError> {
        generator.validate()?;
        let mut renderer = self.renderer()?;

        info!(generator = %generator.name, actions = generator.actions.len(), "Running generator");
        let start = Instant::now();

        let mut params = ActionParams::new(
            context,
            &mut renderer,
            self.fs.as_ref(),
            self.hooks.as_ref(),
        );
        let result = drive(&mut params, Outcome::Many(generator.actions.clone())).await;

        match result {
            Ok(()) => {
                info!(
                    generator = %generator.name,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Generator completed"
                );
                Ok(())
            }
            Err((action, err)) => {
                context.record_error(ErrorRecord::new(action.as_str(), err.to_string()));
                tracing::error!(
                    generator = %generator.name,
                    action = %action,
                    error = %err,
                    "Generator failed"
                );
                Err(err.into())
            }
        }
    }

    /// Validate the config, then run its only generator or let the selector pick one.
    pub async fn run(&self, config: &RunConfig) -> std::result::Result<(), ApiError> {
        let mut context = Context::new();
        self.run_with(config, &mut context).await
    }

    /// [`Runner::run`] against a caller-provided context, e.g. one seeded with answers.
    pub async fn run_with(
        &self,
        config: &RunConfig,
        context: &mut Context,
    ) -> std::result::Result<(), ApiError> {
        config.validate()?;

        if let [generator] = config.generators.as_slice() {
            return self.run_generator_with(generator, context).await;
        }

        let select = Generator::new(
            "select",
            vec![select_generator(config.clone(), self.selector.clone())],
        );
        self.run_generator_with(&select, context).await
    }
}

/// Run a config with the default [`Runner`].
pub async fn run(config: &RunConfig) -> std::result::Result<(), ApiError> {
    Runner::new().run(config).await
}
