//! Shared fixtures for integration tests

use jargal::action::{from_fn, ActionRef, Outcome};
use parking_lot::Mutex;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Ordered record of executed action labels
pub type Trace = Arc<Mutex<Vec<String>>>;

pub fn trace() -> Trace {
    Arc::new(Mutex::new(Vec::new()))
}

/// Action that appends `label` to the trace
pub fn mark(trace: &Trace, label: &str) -> ActionRef {
    let trace = trace.clone();
    let label = label.to_string();
    from_fn(label.clone(), move |_| {
        trace.lock().push(label.clone());
        Ok(Outcome::Done)
    })
}

/// Action that appends `label` and then expands into `children`
pub fn expand(trace: &Trace, label: &str, children: Vec<ActionRef>) -> ActionRef {
    let trace = trace.clone();
    let label = label.to_string();
    from_fn(label.clone(), move |_| {
        trace.lock().push(label.clone());
        Ok(Outcome::Many(children.clone()))
    })
}

/// Write `files` (relative path, content) under `root`, creating directories.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}
