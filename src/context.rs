//! Run Context
//!
//! The single mutable key/value store threaded through every action of a generator run.
//! Reserved keys are `answers` (prompt results) and `errors` (records of failed actions);
//! everything else belongs to the generator (loaded templates, render entries, user data).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::Deref;
use std::sync::Arc;

/// Key holding prompt answers (name -> string, bool or list of those)
pub const ANSWERS_KEY: &str = "answers";

/// Key holding the ordered list of error records
pub const ERRORS_KEY: &str = "errors";

/// A record of an action failure, appended to `errors`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub action: String,
    pub message: String,
    pub recorded_at: String,
}

impl ErrorRecord {
    pub fn new(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            message: message.into(),
            recorded_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Shared, mutable state of one generator run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    fields: Map<String, Value>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Fresh context seeded with empty `answers` and `errors`.
    pub fn new() -> Self {
        let mut fields = Map::new();
        fields.insert(ANSWERS_KEY.to_string(), Value::Object(Map::new()));
        fields.insert(ERRORS_KEY.to_string(), Value::Array(Vec::new()));
        Self { fields }
    }

    /// Build a context from arbitrary fields. Reserved keys are seeded when absent.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        let mut context = Self::new();
        context.merge(fields);
        context
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// JSON pointer lookup, e.g. `/templates/default/a.txt`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        pointer_into(&self.fields, pointer)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    /// Deep-merge a partial update into the live context.
    pub fn merge(&mut self, patch: Map<String, Value>) {
        merge_maps(&mut self.fields, patch);
    }

    /// Append a value to the array stored under `key`, creating the array if needed.
    /// A non-array value under `key` is replaced by a one-element array.
    pub fn push(&mut self, key: &str, value: Value) {
        match self.fields.get_mut(key) {
            Some(Value::Array(items)) => items.push(value),
            _ => {
                self.fields
                    .insert(key.to_string(), Value::Array(vec![value]));
            }
        }
    }

    pub fn answers(&self) -> Option<&Map<String, Value>> {
        self.fields.get(ANSWERS_KEY).and_then(Value::as_object)
    }

    pub fn answer(&self, name: &str) -> Option<&Value> {
        self.answers().and_then(|answers| answers.get(name))
    }

    pub fn set_answer(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let mut answers = Map::new();
        answers.insert(name.into(), value.into());
        let mut patch = Map::new();
        patch.insert(ANSWERS_KEY.to_string(), Value::Object(answers));
        self.merge(patch);
    }

    /// Error records accumulated so far. Malformed entries are skipped.
    pub fn errors(&self) -> Vec<ErrorRecord> {
        self.fields
            .get(ERRORS_KEY)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn record_error(&mut self, record: ErrorRecord) {
        match serde_json::to_value(&record) {
            Ok(value) => self.push(ERRORS_KEY, value),
            Err(err) => tracing::warn!(error = %err, "Failed to record action error"),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Immutable snapshot handed to read-only callbacks.
    pub fn view(&self) -> ContextView {
        ContextView {
            fields: Arc::new(self.fields.clone()),
        }
    }
}

/// Deep-immutable snapshot of a [`Context`]
///
/// The snapshot owns its data, so later mutations of the live context are not visible
/// through it, and nothing reachable from it can be mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextView {
    fields: Arc<Map<String, Value>>,
}

impl ContextView {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        pointer_into(&self.fields, pointer)
    }

    pub fn answers(&self) -> Option<&Map<String, Value>> {
        self.fields.get(ANSWERS_KEY).and_then(Value::as_object)
    }

    pub fn answer(&self, name: &str) -> Option<&Value> {
        self.answers().and_then(|answers| answers.get(name))
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.as_ref().clone())
    }
}

impl Deref for ContextView {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.fields
    }
}

impl From<&Context> for ContextView {
    fn from(context: &Context) -> Self {
        context.view()
    }
}

fn pointer_into<'a>(fields: &'a Map<String, Value>, pointer: &str) -> Option<&'a Value> {
    let rest = pointer.strip_prefix('/')?;
    let (head, tail) = match rest.split_once('/') {
        Some((head, tail)) => (head, Some(tail)),
        None => (rest, None),
    };
    let head = head.replace("~1", "/").replace("~0", "~");
    let value = fields.get(&head)?;
    match tail {
        Some(tail) => value.pointer(&format!("/{}", tail)),
        None => Some(value),
    }
}

/// Recursive merge: objects merge key by key, arrays and primitives replace.
/// Keys absent from the patch are left untouched.
pub fn merge_maps(target: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, incoming) in patch {
        match (target.get_mut(&key), incoming) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_maps(existing, incoming);
            }
            (Some(existing), incoming) => *existing = incoming,
            (None, incoming) => {
                target.insert(key, incoming);
            }
        }
    }
}

/// Drop null-valued object entries, recursing into nested objects. Arrays are left as is.
pub fn prune_nulls(value: &mut Value) {
    if let Value::Object(fields) = value {
        fields.retain(|_, field| !field.is_null());
        fields.values_mut().for_each(prune_nulls);
    }
}

/// [`merge_maps`] lifted to arbitrary values.
pub fn merge_values(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(existing), Value::Object(incoming)) => merge_maps(existing, incoming),
        (target, patch) => *target = patch,
    }
}
