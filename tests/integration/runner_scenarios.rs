//! End-to-end runner behavior: ordering, selection, failures and writes

use super::test_utils::{expand, mark, trace};
use jargal::action::{CollectingHooks, HookEvent};
use jargal::actions::{combine, context, write, WriteMode};
use jargal::error::{ActionError, ApiError};
use jargal::prompt::FixedSelector;
use jargal::{Context, Generator, RunConfig, Runner};
use serde_json::{json, Value};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn runner_with(selector: Arc<FixedSelector>) -> Runner {
    Runner::new().with_selector(selector)
}

#[tokio::test]
async fn test_single_generator_runs_without_selection() {
    let log = trace();
    let selector = Arc::new(FixedSelector::by_index(0));
    let config = RunConfig::single(Generator::new(
        "only",
        vec![mark(&log, "a"), mark(&log, "b"), mark(&log, "c")],
    ));

    runner_with(selector.clone()).run(&config).await.unwrap();

    assert_eq!(*log.lock(), vec!["a", "b", "c"]);
    assert_eq!(selector.calls(), 0);
}

#[tokio::test]
async fn test_selection_happens_once_before_chosen_actions() {
    let log = trace();
    let selector = Arc::new(FixedSelector::by_name("service"));
    let config = RunConfig::new(vec![
        Generator::new("component", vec![mark(&log, "component")]).with_description("UI"),
        Generator::new("service", vec![mark(&log, "s1"), mark(&log, "s2")]),
        Generator::new("page", vec![mark(&log, "page")]),
    ]);

    runner_with(selector.clone()).run(&config).await.unwrap();

    assert_eq!(selector.calls(), 1);
    assert_eq!(*log.lock(), vec!["s1", "s2"]);
}

#[tokio::test]
async fn test_nested_expansion_matches_flat_order() {
    let nested_log = trace();
    let nested = Generator::new(
        "nested",
        vec![
            mark(&nested_log, "1"),
            expand(
                &nested_log,
                "2",
                vec![
                    mark(&nested_log, "3"),
                    expand(&nested_log, "4", vec![mark(&nested_log, "5")]),
                ],
            ),
            mark(&nested_log, "6"),
        ],
    );
    let flat_log = trace();
    let flat = Generator::new(
        "flat",
        ["1", "2", "3", "4", "5", "6"]
            .iter()
            .map(|label| mark(&flat_log, label))
            .collect(),
    );

    let runner = runner_with(Arc::new(FixedSelector::by_index(0)));
    runner.run_generator(&nested).await.unwrap();
    runner.run_generator(&flat).await.unwrap();

    assert_eq!(*nested_log.lock(), *flat_log.lock());
}

#[tokio::test]
async fn test_combine_sees_earlier_mutations() {
    let generator = Generator::new(
        "counter",
        vec![combine([
            context(|_| Ok(json!({"n": 1}))),
            context(|view| {
                let n = view.get("n").and_then(Value::as_i64).unwrap_or(0);
                Ok(json!({"n": n + 1}))
            }),
        ])],
    );
    let mut ctx = Context::new();
    ctx.insert("n", json!(0));

    Runner::new()
        .run_generator_with(&generator, &mut ctx)
        .await
        .unwrap();

    assert_eq!(ctx.get("n"), Some(&json!(2)));
}

#[tokio::test]
async fn test_failure_keeps_earlier_files_and_skips_later_steps() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first.txt");
    let existing = temp_dir.path().join("existing.txt");
    let last = temp_dir.path().join("last.txt");
    fs::write(&existing, "keep me").unwrap();

    let hooks = Arc::new(CollectingHooks::new());
    let generator = Generator::new(
        "partial",
        vec![
            write(&first, "one", WriteMode::Fail),
            write(&existing, "clobber", WriteMode::Fail),
            write(&last, "three", WriteMode::Fail),
        ],
    );
    let mut ctx = Context::new();

    let err = Runner::new()
        .with_hooks(hooks.clone())
        .run_generator_with(&generator, &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Action(ActionError::Conflict(_))));
    assert_eq!(fs::read_to_string(&first).unwrap(), "one");
    assert_eq!(fs::read_to_string(&existing).unwrap(), "keep me");
    assert!(!last.exists());

    let errors = ctx.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].action, "write");
    assert!(errors[0].message.contains("File already exists"));
    assert!(matches!(hooks.events().last(), Some(HookEvent::Failure(_))));
}

#[tokio::test]
async fn test_write_scenario_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let destination = temp_dir.path().join("out").join("a.txt");

    Runner::new()
        .run(&RunConfig::single(Generator::new(
            "write",
            vec![write(&destination, "hi", WriteMode::Fail)],
        )))
        .await
        .unwrap();

    assert!(temp_dir.path().join("out").is_dir());
    assert_eq!(fs::read_to_string(&destination).unwrap(), "hi");
}

#[tokio::test]
async fn test_skip_if_exists_never_fails() {
    let temp_dir = TempDir::new().unwrap();
    let destination = temp_dir.path().join("a.txt");
    let generator = Generator::new(
        "skip",
        vec![
            write(&destination, "first", WriteMode::SkipIfExists),
            write(&destination, "second", WriteMode::SkipIfExists),
        ],
    );
    let runner = Runner::new();

    runner.run_generator(&generator).await.unwrap();
    runner.run_generator(&generator).await.unwrap();

    assert_eq!(fs::read_to_string(&destination).unwrap(), "first");
}

#[tokio::test]
async fn test_malformed_config_has_no_side_effects() {
    let temp_dir = TempDir::new().unwrap();
    let destination = temp_dir.path().join("never.txt");
    let config = RunConfig::new(vec![
        Generator::new("good", vec![write(&destination, "x", WriteMode::Fail)]),
        Generator::new("", vec![write(&destination, "x", WriteMode::Fail)]),
    ]);

    let err = runner_with(Arc::new(FixedSelector::by_index(0)))
        .run(&config)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::ConfigError(_)));
    assert!(!destination.exists());
}
