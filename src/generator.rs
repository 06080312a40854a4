//! Generators and run configuration
//!
//! A generator is a named, non-empty, ordered list of actions. A [`RunConfig`] holds the
//! generators available to one invocation of [`crate::engine::Runner::run`].

use crate::action::ActionRef;
use crate::error::ApiError;
use std::fmt;

/// One complete generation pipeline
#[derive(Clone)]
pub struct Generator {
    pub name: String,
    pub description: Option<String>,
    pub actions: Vec<ActionRef>,
}

impl Generator {
    pub fn new(name: impl Into<String>, actions: Vec<ActionRef>) -> Self {
        Self {
            name: name.into(),
            description: None,
            actions,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn push(&mut self, action: ActionRef) -> &mut Self {
        self.actions.push(action);
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "Generator name cannot be empty".to_string(),
            ));
        }
        if self.actions.is_empty() {
            return Err(ApiError::ConfigError(format!(
                "Generator '{}' must contain at least one action",
                self.name
            )));
        }
        Ok(())
    }

    /// "name - description" label used by selection prompts and listings.
    pub fn label(&self) -> String {
        match &self.description {
            Some(description) if !description.is_empty() => {
                format!("{} - {}", self.name, description)
            }
            _ => self.name.clone(),
        }
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("name", &self.name)
            .field("description", &self.description)
            .field(
                "actions",
                &self.actions.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Generators offered to a single run
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    pub generators: Vec<Generator>,
}

impl RunConfig {
    pub fn new(generators: Vec<Generator>) -> Self {
        Self { generators }
    }

    pub fn single(generator: Generator) -> Self {
        Self {
            generators: vec![generator],
        }
    }

    /// Reject malformed configs before anything executes.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.generators.is_empty() {
            return Err(ApiError::ConfigError(
                "Config must contain at least one generator".to_string(),
            ));
        }
        for generator in &self.generators {
            generator.validate()?;
        }
        Ok(())
    }

    /// First generator with the given name.
    pub fn find(&self, name: &str) -> Option<&Generator> {
        self.generators.iter().find(|g| g.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{from_fn, Outcome};

    fn noop() -> ActionRef {
        from_fn("noop", |_| Ok(Outcome::Done))
    }

    #[test]
    fn test_empty_config_is_rejected() {
        let err = RunConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("at least one generator"));
    }

    #[test]
    fn test_generator_without_actions_is_rejected() {
        let config = RunConfig::new(vec![
            Generator::new("ok", vec![noop()]),
            Generator::new("empty", vec![]),
        ]);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ApiError::ConfigError(ref msg) if msg.contains("'empty'")));
    }

    #[test]
    fn test_generator_without_name_is_rejected() {
        let config = RunConfig::single(Generator::new("  ", vec![noop()]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_find_and_label() {
        let config = RunConfig::new(vec![
            Generator::new("component", vec![noop()]).with_description("React component"),
            Generator::new("module", vec![noop()]),
        ]);
        assert!(config.validate().is_ok());
        assert_eq!(
            config.find("component").map(Generator::label),
            Some("component - React component".to_string())
        );
        assert_eq!(config.find("module").map(Generator::label), Some("module".to_string()));
        assert!(config.find("missing").is_none());
    }
}
