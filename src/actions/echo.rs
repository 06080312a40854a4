//! Progress messages

use crate::action::{Action, ActionParams, ActionRef, Outcome};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Emits a fixed comment through the action hooks
#[derive(Debug, Clone)]
pub struct Echo {
    message: String,
}

#[async_trait]
impl Action for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    async fn execute(&self, params: &mut ActionParams<'_>) -> Result<Outcome> {
        params.hooks.on_comment(&self.message);
        Ok(Outcome::Done)
    }
}

pub fn echo(message: impl Into<String>) -> ActionRef {
    Arc::new(Echo {
        message: message.into(),
    })
}
