//! Template discovery and loading
//!
//! Walks a template directory, reads every regular file and stores one [`TemplateRecord`]
//! per file under `templates.<scope>` in the context. Keys are paths relative to the root
//! (always `/`-separated) with the engine extension stripped, so `sub/b.txt.hbs` is stored
//! as `sub/b.txt`.
//!
//! Files whose name starts with `_` are partials: they are left out of the record set and,
//! unless disabled, registered with the renderer under their key without the underscore.

use crate::action::{Action, ActionParams, ActionRef, Outcome};
use crate::error::{ActionError, Result};
use crate::fs::FileSystem;
use crate::renderer::{Renderer, SetOptions};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Context key holding all loaded scopes
pub const TEMPLATES_KEY: &str = "templates";

/// Scope used when none is given
pub const DEFAULT_SCOPE: &str = "default";

/// Extension stripped from keys by default (handlebars)
pub const DEFAULT_EXTENSION: &str = ".hbs";

/// One discovered template file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    /// Absolute path of the source file
    pub template_path: PathBuf,
    /// Logical path relative to the template root, extension stripped
    pub save_path: String,
    pub template_content: String,
}

/// Logical key -> record
pub type TemplatesMap = BTreeMap<String, TemplateRecord>;

/// Post-processing hook applied to every discovered record, in registration order
pub type RecordHook = Arc<dyn Fn(String, TemplateRecord) -> (String, TemplateRecord) + Send + Sync>;

/// Configurable template loader; also usable directly as an action
#[derive(Clone)]
pub struct TemplateLoader {
    root: PathBuf,
    scope: String,
    extension: Option<String>,
    exclude_partials: bool,
    register_partials: bool,
    hooks: Vec<RecordHook>,
}

impl std::fmt::Debug for TemplateLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateLoader")
            .field("root", &self.root)
            .field("scope", &self.scope)
            .field("extension", &self.extension)
            .field("exclude_partials", &self.exclude_partials)
            .field("register_partials", &self.register_partials)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// Templates discovered under one root
#[derive(Debug, Clone, Default)]
pub struct Discovered {
    pub templates: TemplatesMap,
    /// Underscore-prefixed files, keyed by partial name
    pub partials: BTreeMap<String, String>,
}

impl TemplateLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            scope: DEFAULT_SCOPE.to_string(),
            extension: Some(DEFAULT_EXTENSION.to_string()),
            exclude_partials: true,
            register_partials: true,
            hooks: Vec::new(),
        }
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Extension stripped from keys; `None` keeps file names as they are.
    pub fn extension(mut self, extension: Option<&str>) -> Self {
        self.extension = extension.filter(|e| !e.is_empty()).map(str::to_string);
        self
    }

    /// Whether `_`-prefixed files are kept out of the record set.
    pub fn exclude_partials(mut self, exclude: bool) -> Self {
        self.exclude_partials = exclude;
        self
    }

    /// Whether excluded `_`-prefixed files are registered as renderer partials.
    pub fn register_partials(mut self, register: bool) -> Self {
        self.register_partials = register;
        self
    }

    pub fn on_record<F>(mut self, hook: F) -> Self
    where
        F: Fn(String, TemplateRecord) -> (String, TemplateRecord) + Send + Sync + 'static,
    {
        self.hooks.push(Arc::new(hook));
        self
    }

    pub fn scope_name(&self) -> &str {
        &self.scope
    }

    /// Walk and read the template root. Any read failure aborts the whole load.
    pub async fn discover(&self, fs: &dyn FileSystem) -> Result<Discovered> {
        let root = dunce::canonicalize(&self.root)?;
        let mut discovered = Discovered::default();

        for path in fs.walk_files(&root).await? {
            let relative = path.strip_prefix(&root).unwrap_or(&path);
            let key = self.logical_key(relative);
            let is_partial = path
                .file_name()
                .map(|name| name.to_string_lossy().starts_with('_'))
                .unwrap_or(false);

            let bytes = fs.read(&path).await?;
            let content = String::from_utf8_lossy(&bytes).into_owned();

            if is_partial && self.exclude_partials {
                discovered.partials.insert(partial_name(&key), content);
                continue;
            }

            let record = TemplateRecord {
                template_path: path.clone(),
                save_path: key.clone(),
                template_content: content,
            };
            let (key, record) = self
                .hooks
                .iter()
                .fold((key, record), |(key, record), hook| hook(key, record));

            if let Some(existing) = discovered.templates.get(&key) {
                return Err(ActionError::Precondition(format!(
                    "templates {} and {} both map to '{}'",
                    existing.template_path.display(),
                    record.template_path.display(),
                    key
                )));
            }
            debug!(scope = %self.scope, key = %key, "Loaded template");
            discovered.templates.insert(key, record);
        }

        Ok(discovered)
    }

    fn logical_key(&self, relative: &Path) -> String {
        let key = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        match &self.extension {
            Some(ext) => key.strip_suffix(ext.as_str()).map(str::to_string).unwrap_or(key),
            None => key,
        }
    }
}

/// `sub/_header` -> `sub/header`
fn partial_name(key: &str) -> String {
    match key.rsplit_once('/') {
        Some((dir, file)) => format!("{}/{}", dir, file.trim_start_matches('_')),
        None => key.trim_start_matches('_').to_string(),
    }
}

fn register_all(renderer: &mut Renderer, partials: &BTreeMap<String, String>) -> Result<()> {
    for (name, partial) in partials {
        renderer.set_partial(name, partial, SetOptions::overriding())?;
    }
    Ok(())
}

#[async_trait]
impl Action for TemplateLoader {
    fn name(&self) -> &str {
        "load-templates"
    }

    async fn execute(&self, params: &mut ActionParams<'_>) -> Result<Outcome> {
        let discovered = self.discover(params.fs).await?;

        if self.register_partials {
            register_all(params.renderer, &discovered.partials)?;
        }

        let mut scope = Map::new();
        scope.insert(
            self.scope.clone(),
            serde_json::to_value(&discovered.templates)?,
        );
        let mut patch = Map::new();
        patch.insert(TEMPLATES_KEY.to_string(), Value::Object(scope));
        params.context.merge(patch);

        debug!(
            scope = %self.scope,
            templates = discovered.templates.len(),
            partials = discovered.partials.len(),
            "Template scope loaded"
        );
        Ok(Outcome::Done)
    }
}

/// Loader action for `root`, stored under `scope` (or `default`).
pub fn load_templates(root: impl Into<PathBuf>, scope: Option<&str>) -> ActionRef {
    let loader = TemplateLoader::new(root);
    match scope {
        Some(scope) => Arc::new(loader.scope(scope)),
        None => Arc::new(loader),
    }
}

/// Read a loaded scope back out of the context.
pub fn scope_templates(context: &crate::context::Context, scope: &str) -> Result<TemplatesMap> {
    match context.get(TEMPLATES_KEY).and_then(|t| t.get(scope)) {
        Some(value) => Ok(serde_json::from_value(value.clone())?),
        None => Ok(TemplatesMap::new()),
    }
}
