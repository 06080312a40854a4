//! Interactive collaborators
//!
//! Two seams face the terminal: a [`GeneratorSelector`] picks one generator out of a
//! config, and a [`Prompter`] asks the questions whose answers land in `answers`.
//! The dialoguer implementations run on the blocking pool; the fixed implementations
//! answer from memory for tests and non-interactive runs.

use crate::error::{ActionError, Result};
use crate::generator::Generator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Picks which generator to run
#[async_trait]
pub trait GeneratorSelector: Send + Sync {
    /// Index into `generators` of the chosen one.
    async fn select(&self, generators: &[Generator]) -> Result<usize>;
}

/// Terminal selection list over generator labels
#[derive(Debug, Clone)]
pub struct DialoguerSelector {
    prompt: String,
}

impl Default for DialoguerSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl DialoguerSelector {
    pub fn new() -> Self {
        Self {
            prompt: "Please choose a generator".to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}

#[async_trait]
impl GeneratorSelector for DialoguerSelector {
    async fn select(&self, generators: &[Generator]) -> Result<usize> {
        let labels: Vec<String> = generators.iter().map(Generator::label).collect();
        let prompt = self.prompt.clone();

        tokio::task::spawn_blocking(move || {
            dialoguer::Select::new()
                .with_prompt(prompt)
                .items(&labels)
                .default(0)
                .interact()
                .map_err(|e| ActionError::Selection(format!("Failed to get user input: {}", e)))
        })
        .await
        .map_err(|e| ActionError::Selection(e.to_string()))?
    }
}

#[derive(Debug, Clone)]
enum Choice {
    Index(usize),
    Name(String),
}

/// Selector with a predetermined answer
#[derive(Debug)]
pub struct FixedSelector {
    choice: Choice,
    calls: AtomicUsize,
}

impl FixedSelector {
    pub fn by_index(index: usize) -> Self {
        Self {
            choice: Choice::Index(index),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            choice: Choice::Name(name.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `select` was called
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeneratorSelector for FixedSelector {
    async fn select(&self, generators: &[Generator]) -> Result<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.choice {
            Choice::Index(index) => Ok(*index),
            Choice::Name(name) => generators
                .iter()
                .position(|g| &g.name == name)
                .ok_or_else(|| ActionError::Selection(format!("No generator named '{}'", name))),
        }
    }
}

/// Kind of question
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptKind {
    #[default]
    Input,
    Confirm,
    Select,
    MultiSelect,
}

/// One question whose answer is stored under `answers.<name>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSpec {
    pub name: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: PromptKind,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub choices: Vec<String>,
}

impl PromptSpec {
    pub fn input(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: None,
            kind: PromptKind::Input,
            default: None,
            choices: Vec::new(),
        }
    }

    pub fn kind(mut self, kind: PromptKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Message shown to the user, falling back to the answer name.
    pub fn prompt_text(&self) -> &str {
        self.message.as_deref().unwrap_or(&self.name)
    }

    /// Turn a raw text value (e.g. from the command line) into this prompt's answer type.
    pub fn coerce(&self, raw: &str) -> Result<Value> {
        match self.kind {
            PromptKind::Input => Ok(Value::String(raw.to_string())),
            PromptKind::Confirm => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "n" | "0" => Ok(Value::Bool(false)),
                other => Err(ActionError::Prompt(format!(
                    "'{}' expects yes or no, got '{}'",
                    self.name, other
                ))),
            },
            PromptKind::Select => {
                self.check_choice(raw)?;
                Ok(Value::String(raw.to_string()))
            }
            PromptKind::MultiSelect => {
                let picked = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| self.check_choice(s).map(|_| Value::String(s.to_string())))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Value::Array(picked))
            }
        }
    }

    fn check_choice(&self, value: &str) -> Result<()> {
        if self.choices.is_empty() || self.choices.iter().any(|c| c == value) {
            Ok(())
        } else {
            Err(ActionError::Prompt(format!(
                "'{}' is not one of the choices for '{}' ({})",
                value,
                self.name,
                self.choices.join(", ")
            )))
        }
    }
}

/// Answers prompts
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn ask(&self, spec: &PromptSpec) -> Result<Value>;
}

/// Terminal prompts via dialoguer
#[derive(Debug, Default, Clone)]
pub struct DialoguerPrompter;

fn input_error(e: dialoguer::Error) -> ActionError {
    ActionError::Prompt(format!("Failed to get user input: {}", e))
}

fn ask_blocking(spec: &PromptSpec) -> Result<Value> {
    use dialoguer::{Confirm, Input, MultiSelect, Select};

    let text = spec.prompt_text().to_string();
    match spec.kind {
        PromptKind::Input => {
            let mut input = Input::<String>::new().with_prompt(text).allow_empty(true);
            if let Some(default) = spec.default.as_ref().and_then(Value::as_str) {
                input = input.default(default.to_string());
            }
            input.interact_text().map(Value::String).map_err(input_error)
        }
        PromptKind::Confirm => {
            let default = spec.default.as_ref().and_then(Value::as_bool).unwrap_or(false);
            Confirm::new()
                .with_prompt(text)
                .default(default)
                .interact()
                .map(Value::Bool)
                .map_err(input_error)
        }
        PromptKind::Select => {
            let default = spec
                .default
                .as_ref()
                .and_then(Value::as_str)
                .and_then(|d| spec.choices.iter().position(|c| c == d))
                .unwrap_or(0);
            let index = Select::new()
                .with_prompt(text)
                .items(&spec.choices)
                .default(default)
                .interact()
                .map_err(input_error)?;
            Ok(Value::String(spec.choices[index].clone()))
        }
        PromptKind::MultiSelect => {
            let preset: Vec<String> = spec
                .default
                .as_ref()
                .and_then(Value::as_array)
                .map(|values| {
                    values
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            let defaults: Vec<bool> = spec.choices.iter().map(|c| preset.contains(c)).collect();
            let picked = MultiSelect::new()
                .with_prompt(text)
                .items(&spec.choices)
                .defaults(&defaults)
                .interact()
                .map_err(input_error)?;
            Ok(Value::Array(
                picked
                    .into_iter()
                    .map(|i| Value::String(spec.choices[i].clone()))
                    .collect(),
            ))
        }
    }
}

#[async_trait]
impl Prompter for DialoguerPrompter {
    async fn ask(&self, spec: &PromptSpec) -> Result<Value> {
        let needs_choices = matches!(spec.kind, PromptKind::Select | PromptKind::MultiSelect);
        if needs_choices && spec.choices.is_empty() {
            return Err(ActionError::Prompt(format!(
                "'{}' has no choices to pick from",
                spec.name
            )));
        }
        let spec = spec.clone();
        tokio::task::spawn_blocking(move || ask_blocking(&spec))
            .await
            .map_err(|e| ActionError::Prompt(e.to_string()))?
    }
}

/// Answers from a fixed table, then from each prompt's default
#[derive(Debug, Default, Clone)]
pub struct FixedPrompter {
    answers: Map<String, Value>,
}

impl FixedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.answers.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl Prompter for FixedPrompter {
    async fn ask(&self, spec: &PromptSpec) -> Result<Value> {
        self.answers
            .get(&spec.name)
            .or(spec.default.as_ref())
            .cloned()
            .ok_or_else(|| {
                ActionError::Prompt(format!("No answer provided for '{}'", spec.name))
            })
    }
}
