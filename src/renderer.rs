//! Template renderer
//!
//! Thin front-end over handlebars with two named registries: helpers (string -> string
//! functions) and partials (template fragments). Names are unique per registry unless a
//! registration explicitly asks to override.

use crate::error::RenderError;
use handlebars::{
    Context as HbContext, Handlebars, Helper, HelperDef, JsonRender, RenderContext, ScopedJson,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A text helper: receives the rendered first argument, returns the replacement
pub type HelperFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Options for registry setters
#[derive(Debug, Clone, Copy, Default)]
pub struct SetOptions {
    pub override_existing: bool,
}

impl SetOptions {
    pub fn overriding() -> Self {
        Self {
            override_existing: true,
        }
    }
}

/// Which registry an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryScope {
    Helper,
    Partial,
}

impl RegistryScope {
    fn label(self) -> &'static str {
        match self {
            RegistryScope::Helper => "helper",
            RegistryScope::Partial => "partial",
        }
    }
}

/// Handlebars adapter for a [`HelperFn`]
struct TextHelper(HelperFn);

impl HelperDef for TextHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc HbContext,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, handlebars::RenderError> {
        let input = h.param(0).map(|p| p.value().render()).unwrap_or_default();
        Ok(ScopedJson::Derived(Value::String((self.0)(&input))))
    }
}

/// String-template renderer with helper and partial registries
pub struct Renderer {
    registry: Handlebars<'static>,
    helpers: BTreeMap<String, HelperFn>,
    partials: BTreeMap<String, String>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .field("partials", &self.partials.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Renderer {
    /// Renderer with the built-in text helpers registered.
    pub fn new() -> Self {
        let mut renderer = Self::empty();
        for (name, helper) in text_helpers() {
            renderer.helpers.insert(name.to_string(), helper.clone());
            renderer
                .registry
                .register_helper(name, Box::new(TextHelper(helper)));
        }
        renderer
    }

    /// Renderer with no helpers at all.
    pub fn empty() -> Self {
        let mut registry = Handlebars::new();
        // Generated files must come out verbatim
        registry.register_escape_fn(handlebars::no_escape);
        Self {
            registry,
            helpers: BTreeMap::new(),
            partials: BTreeMap::new(),
        }
    }

    pub fn set_helper<F>(
        &mut self,
        name: &str,
        helper: F,
        options: SetOptions,
    ) -> Result<&mut Self, RenderError>
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.check_name(RegistryScope::Helper, name, options)?;
        let helper: HelperFn = Arc::new(helper);
        self.registry
            .register_helper(name, Box::new(TextHelper(helper.clone())));
        self.helpers.insert(name.to_string(), helper);
        Ok(self)
    }

    pub fn set_partial(
        &mut self,
        name: &str,
        partial: &str,
        options: SetOptions,
    ) -> Result<&mut Self, RenderError> {
        self.check_name(RegistryScope::Partial, name, options)?;
        self.registry.register_partial(name, partial)?;
        self.partials.insert(name.to_string(), partial.to_string());
        Ok(self)
    }

    pub fn helper(&self, name: &str) -> Option<HelperFn> {
        self.helpers.get(name).cloned()
    }

    pub fn partial(&self, name: &str) -> Option<&str> {
        self.partials.get(name).map(String::as_str)
    }

    /// Registered names in the given registry, sorted.
    pub fn list(&self, scope: RegistryScope) -> Vec<&str> {
        match scope {
            RegistryScope::Helper => self.helpers.keys().map(String::as_str).collect(),
            RegistryScope::Partial => self.partials.keys().map(String::as_str).collect(),
        }
    }

    pub fn render_string<T: Serialize>(
        &self,
        template: &str,
        data: &T,
    ) -> Result<String, RenderError> {
        Ok(self.registry.render_template(template, data)?)
    }

    fn check_name(
        &self,
        scope: RegistryScope,
        name: &str,
        options: SetOptions,
    ) -> Result<(), RenderError> {
        if name.trim().is_empty() {
            return Err(RenderError::EmptyName);
        }
        let taken = match scope {
            RegistryScope::Helper => self.helpers.contains_key(name),
            RegistryScope::Partial => self.partials.contains_key(name),
        };
        if taken && !options.override_existing {
            return Err(RenderError::Duplicate {
                scope: scope.label(),
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

/// Built-in case-conversion helpers
pub fn text_helpers() -> Vec<(&'static str, HelperFn)> {
    fn helper(f: fn(&str) -> String) -> HelperFn {
        Arc::new(f)
    }

    vec![
        ("upperCase", helper(|s| s.to_uppercase())),
        ("lowerCase", helper(|s| s.to_lowercase())),
        ("camelCase", helper(camel_case)),
        ("pascalCase", helper(pascal_case)),
        ("snakeCase", helper(|s| join_words(s, "_", str::to_lowercase))),
        ("kebabCase", helper(|s| join_words(s, "-", str::to_lowercase))),
        ("dotCase", helper(|s| join_words(s, ".", str::to_lowercase))),
        ("pathCase", helper(|s| join_words(s, "/", str::to_lowercase))),
        ("constantCase", helper(|s| join_words(s, "_", str::to_uppercase))),
        ("titleCase", helper(|s| join_words(s, " ", capitalize))),
        ("sentenceCase", helper(sentence_case)),
    ]
}

/// Split on separators and lower-to-upper transitions: "fooBar-baz" -> ["foo", "Bar", "baz"].
fn words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in input.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }
        let boundary = match prev {
            Some(p) => (p.is_lowercase() || p.is_numeric()) && c.is_uppercase(),
            None => false,
        };
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
        prev = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn join_words(input: &str, sep: &str, transform: fn(&str) -> String) -> String {
    words(input)
        .iter()
        .map(|w| transform(w))
        .collect::<Vec<_>>()
        .join(sep)
}

fn pascal_case(input: &str) -> String {
    words(input).iter().map(|w| capitalize(w)).collect()
}

fn camel_case(input: &str) -> String {
    words(input)
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
        .collect()
}

fn sentence_case(input: &str) -> String {
    words(input)
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { capitalize(w) } else { w.to_lowercase() })
        .collect::<Vec<_>>()
        .join(" ")
}
