//! Action trait definition
//!
//! An action is one step of a generator pipeline. It receives the live [`Context`], the
//! [`Renderer`] and the filesystem, may perform side effects, and reports what should run
//! next through an [`Outcome`]:
//!
//! - [`Outcome::Done`]: nothing further, this branch is finished
//! - [`Outcome::Next`]: one more action to execute
//! - [`Outcome::Many`]: an ordered list of actions, executed left to right
//!
//! # Example
//!
//! ```ignore
//! use jargal::action::{Action, ActionParams, Outcome};
//! use async_trait::async_trait;
//!
//! struct Bump;
//!
//! #[async_trait]
//! impl Action for Bump {
//!     async fn execute(&self, params: &mut ActionParams<'_>) -> jargal::error::Result<Outcome> {
//!         let n = params.context.get("n").and_then(|v| v.as_i64()).unwrap_or(0);
//!         params.context.insert("n", (n + 1).into());
//!         Ok(Outcome::Done)
//!     }
//! }
//! ```

use crate::context::Context;
use crate::error::Result;
use crate::fs::FileSystem;
use crate::renderer::Renderer;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Shared handle to an action; generators and combinators hold these
pub type ActionRef = Arc<dyn Action>;

/// What an executed action asks the runner to do next
pub enum Outcome {
    Done,
    Next(ActionRef),
    Many(Vec<ActionRef>),
}

impl Outcome {
    pub fn next<A: Action + 'static>(action: A) -> Self {
        Outcome::Next(Arc::new(action))
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done)
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Done => f.write_str("Done"),
            Outcome::Next(action) => f.debug_tuple("Next").field(&action.name()).finish(),
            Outcome::Many(actions) => f
                .debug_tuple("Many")
                .field(&actions.iter().map(|a| a.name()).collect::<Vec<_>>())
                .finish(),
        }
    }
}

impl From<Vec<ActionRef>> for Outcome {
    fn from(actions: Vec<ActionRef>) -> Self {
        Outcome::Many(actions)
    }
}

impl From<ActionRef> for Outcome {
    fn from(action: ActionRef) -> Self {
        Outcome::Next(action)
    }
}

/// Everything an action may touch while it runs
pub struct ActionParams<'a> {
    pub context: &'a mut Context,
    pub renderer: &'a mut Renderer,
    pub fs: &'a dyn FileSystem,
    pub hooks: &'a dyn ActionHooks,
}

impl<'a> ActionParams<'a> {
    pub fn new(
        context: &'a mut Context,
        renderer: &'a mut Renderer,
        fs: &'a dyn FileSystem,
        hooks: &'a dyn ActionHooks,
    ) -> Self {
        Self {
            context,
            renderer,
            fs,
            hooks,
        }
    }

    /// Reborrow for handing to a nested action.
    pub fn reborrow(&mut self) -> ActionParams<'_> {
        ActionParams {
            context: &mut *self.context,
            renderer: &mut *self.renderer,
            fs: self.fs,
            hooks: self.hooks,
        }
    }
}

/// Core trait for pipeline steps
#[async_trait]
pub trait Action: Send + Sync {
    /// Name used in logs and error records
    fn name(&self) -> &str {
        "action"
    }

    async fn execute(&self, params: &mut ActionParams<'_>) -> Result<Outcome>;
}

/// Closure-backed action for synchronous steps
pub struct FnAction<F> {
    name: String,
    f: F,
}

impl<F> FnAction<F>
where
    F: Fn(&mut ActionParams<'_>) -> Result<Outcome> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F> Action for FnAction<F>
where
    F: Fn(&mut ActionParams<'_>) -> Result<Outcome> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, params: &mut ActionParams<'_>) -> Result<Outcome> {
        (self.f)(params)
    }
}

/// Wrap a closure as a shared action.
pub fn from_fn<F>(name: impl Into<String>, f: F) -> ActionRef
where
    F: Fn(&mut ActionParams<'_>) -> Result<Outcome> + Send + Sync + 'static,
{
    Arc::new(FnAction::new(name, f))
}

/// A change reported by an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookChange {
    pub path: String,
}

/// A failure reported by an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookFailure {
    pub path: String,
    pub error: String,
}

/// Observer for action progress
pub trait ActionHooks: Send + Sync {
    fn on_comment(&self, message: &str) {
        let _ = message;
    }

    fn on_success(&self, change: &HookChange) {
        let _ = change;
    }

    fn on_failure(&self, failure: &HookFailure) {
        let _ = failure;
    }
}

/// Hooks that only log through tracing
#[derive(Debug, Default, Clone)]
pub struct TracingHooks;

impl ActionHooks for TracingHooks {
    fn on_comment(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn on_success(&self, change: &HookChange) {
        tracing::info!(path = %change.path, "Wrote file");
    }

    fn on_failure(&self, failure: &HookFailure) {
        tracing::warn!(path = %failure.path, error = %failure.error, "Action failed");
    }
}

/// Event captured by [`CollectingHooks`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    Comment(String),
    Success(HookChange),
    Failure(HookFailure),
}

/// Hooks that record every event, in order
#[derive(Debug, Default)]
pub struct CollectingHooks {
    events: Mutex<Vec<HookEvent>>,
}

impl CollectingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HookEvent> {
        self.events.lock().clone()
    }

    pub fn comments(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                HookEvent::Comment(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn written(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                HookEvent::Success(change) => Some(change.path.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ActionHooks for CollectingHooks {
    fn on_comment(&self, message: &str) {
        self.events.lock().push(HookEvent::Comment(message.to_string()));
    }

    fn on_success(&self, change: &HookChange) {
        self.events.lock().push(HookEvent::Success(change.clone()));
    }

    fn on_failure(&self, failure: &HookFailure) {
        self.events.lock().push(HookEvent::Failure(failure.clone()));
    }
}
