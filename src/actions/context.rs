//! Context mutation combinator
//!
//! The callback sees an immutable snapshot of the context and returns a partial update,
//! which is deep-merged into the live context. Null fields of a callback's update are
//! dropped before merging, so an unset `Option` leaves the existing value alone.

use crate::action::{Action, ActionParams, ActionRef, Outcome};
use crate::context::{prune_nulls, ContextView};
use crate::error::{ActionError, Result};
use async_trait::async_trait;
use futures::future::{self, BoxFuture, FutureExt};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

type UpdateFn =
    Box<dyn Fn(ContextView) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>;

/// Action that merges the result of a callback into the context
pub struct ContextUpdate {
    callback: UpdateFn,
}

#[async_trait]
impl Action for ContextUpdate {
    fn name(&self) -> &str {
        "context"
    }

    async fn execute(&self, params: &mut ActionParams<'_>) -> Result<Outcome> {
        let patch = (self.callback)(params.context.view()).await?;
        match patch {
            Value::Object(fields) => params.context.merge(fields),
            Value::Null => {}
            other => return Err(ActionError::InvalidPatch(kind_of(&other).to_string())),
        }
        Ok(Outcome::Done)
    }
}

fn to_patch<T: Serialize>(update: T) -> anyhow::Result<Value> {
    let mut patch = serde_json::to_value(update)?;
    prune_nulls(&mut patch);
    Ok(patch)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Synchronous context update. Returning `null` (e.g. `()`) leaves the context unchanged.
pub fn context<F, T>(callback: F) -> ActionRef
where
    F: Fn(ContextView) -> anyhow::Result<T> + Send + Sync + 'static,
    T: Serialize,
{
    Arc::new(ContextUpdate {
        callback: Box::new(move |view| {
            let patch = callback(view).and_then(to_patch);
            future::ready(patch).boxed()
        }),
    })
}

/// Asynchronous context update; the update is awaited before merging.
pub fn context_async<F, Fut, T>(callback: F) -> ActionRef
where
    F: Fn(ContextView) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    T: Serialize,
{
    Arc::new(ContextUpdate {
        callback: Box::new(move |view| {
            callback(view)
                .map(|result| result.and_then(to_patch))
                .boxed()
        }),
    })
}

/// Merge a fixed value into the context. Explicit `null` fields replace existing values.
pub fn set_context(patch: Value) -> ActionRef {
    Arc::new(ContextUpdate {
        callback: Box::new(move |_| future::ready(Ok(patch.clone())).boxed()),
    })
}
