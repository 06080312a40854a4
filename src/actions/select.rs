//! Generator selection step
//!
//! Used by the runner when a config offers more than one generator: the selector is asked
//! once and the chosen generator's actions become the rest of the run.

use crate::action::{Action, ActionParams, ActionRef, Outcome};
use crate::error::{ActionError, Result};
use crate::generator::RunConfig;
use crate::prompt::GeneratorSelector;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub struct SelectGenerator {
    config: RunConfig,
    selector: Arc<dyn GeneratorSelector>,
}

#[async_trait]
impl Action for SelectGenerator {
    fn name(&self) -> &str {
        "select-generator"
    }

    async fn execute(&self, _params: &mut ActionParams<'_>) -> Result<Outcome> {
        let generators = &self.config.generators;
        let index = self.selector.select(generators).await?;
        let chosen = generators.get(index).ok_or_else(|| {
            ActionError::Selection(format!(
                "Selected generator #{} but only {} are available",
                index,
                generators.len()
            ))
        })?;

        info!(generator = %chosen.name, "Selected generator");
        Ok(Outcome::Many(chosen.actions.clone()))
    }
}

pub fn select_generator(config: RunConfig, selector: Arc<dyn GeneratorSelector>) -> ActionRef {
    Arc::new(SelectGenerator { config, selector })
}
