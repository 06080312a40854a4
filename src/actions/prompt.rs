//! Answer collection step
//!
//! Fills `answers` for every question that has no answer yet. Answers seeded up front
//! (for example from the command line) are never asked again.

use crate::action::{Action, ActionParams, ActionRef, Outcome};
use crate::error::Result;
use crate::prompt::{PromptSpec, Prompter};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

pub struct Prompt {
    specs: Vec<PromptSpec>,
    prompter: Arc<dyn Prompter>,
}

#[async_trait]
impl Action for Prompt {
    fn name(&self) -> &str {
        "prompt"
    }

    async fn execute(&self, params: &mut ActionParams<'_>) -> Result<Outcome> {
        for spec in &self.specs {
            if params.context.answer(&spec.name).is_some() {
                debug!(answer = %spec.name, "Answer already provided");
                continue;
            }
            let value = self.prompter.ask(spec).await?;
            params.context.set_answer(spec.name.clone(), value);
        }
        Ok(Outcome::Done)
    }
}

pub fn prompt(specs: Vec<PromptSpec>, prompter: Arc<dyn Prompter>) -> ActionRef {
    Arc::new(Prompt { specs, prompter })
}
