//! Sequential composition
//!
//! `combine` groups several actions into one step. Children run strictly left to right and
//! each is fully expanded before the next starts.

use crate::action::{Action, ActionParams, ActionRef, Outcome};
use crate::engine::execute_action;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Action running its children in order
pub struct Combine {
    actions: Vec<ActionRef>,
}

#[async_trait]
impl Action for Combine {
    fn name(&self) -> &str {
        "combine"
    }

    async fn execute(&self, params: &mut ActionParams<'_>) -> Result<Outcome> {
        for action in &self.actions {
            execute_action(params, action.clone()).await?;
        }
        Ok(Outcome::Done)
    }
}

pub fn combine(actions: impl IntoIterator<Item = ActionRef>) -> ActionRef {
    Arc::new(Combine {
        actions: actions.into_iter().collect(),
    })
}
