//! Declarative generators

use super::TemplateSettings;
use crate::action::ActionRef;
use crate::actions::context::set_context;
use crate::actions::prompt::prompt;
use crate::actions::render::{render_scope, RenderScope};
use crate::actions::templates::TemplateLoader;
use crate::actions::write::WriteMode;
use crate::generator::Generator;
use crate::prompt::{PromptSpec, Prompter};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A generator declared in a settings file
///
/// ```toml
/// [[generators]]
/// name = "component"
/// description = "React component"
/// templates = "templates/component"
/// destination = "src/components/{{pascalCase answers.name}}"
///
/// [[generators.prompts]]
/// name = "name"
/// message = "Component name"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorManifest {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Template directory
    pub templates: PathBuf,

    /// Destination directory, rendered against the context
    pub destination: String,

    /// Context scope the templates load into; defaults to the generator name
    #[serde(default)]
    pub scope: Option<String>,

    #[serde(default)]
    pub mode: Option<WriteMode>,

    /// Fixed values merged into the context before anything else runs
    #[serde(default)]
    pub data: Map<String, Value>,

    #[serde(default)]
    pub prompts: Vec<PromptSpec>,
}

impl GeneratorManifest {
    pub fn scope_name(&self) -> &str {
        self.scope.as_deref().unwrap_or(&self.name)
    }

    /// Seed data, ask prompts, load templates, render every template to a write.
    pub fn to_generator(
        &self,
        settings: &TemplateSettings,
        workspace: &Path,
        prompter: Arc<dyn Prompter>,
        mode: Option<WriteMode>,
    ) -> Generator {
        let scope = self.scope_name().to_string();
        let mut actions: Vec<ActionRef> = Vec::new();

        if !self.data.is_empty() {
            actions.push(set_context(Value::Object(self.data.clone())));
        }
        if !self.prompts.is_empty() {
            actions.push(prompt(self.prompts.clone(), prompter));
        }

        let extension = Some(settings.extension.as_str()).filter(|e| !e.is_empty());
        actions.push(Arc::new(
            TemplateLoader::new(workspace.join(&self.templates))
                .scope(scope.clone())
                .extension(extension)
                .exclude_partials(settings.exclude_partials),
        ));

        actions.push(render_scope(
            RenderScope::new(scope, self.destination.clone())
                .root(workspace)
                .mode(mode.or(self.mode).unwrap_or_default()),
        ));

        let generator = Generator::new(self.name.clone(), actions);
        match &self.description {
            Some(description) => generator.with_description(description.clone()),
            None => generator,
        }
    }
}
