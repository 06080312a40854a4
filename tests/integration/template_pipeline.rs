//! Template loading, rendering and writing through the runner

use super::test_utils::write_tree;
use jargal::action::CollectingHooks;
use jargal::actions::templates::{scope_templates, TemplateLoader};
use jargal::actions::{
    load_templates, render_scope, set_context, RenderScope, RenderTemplate, WriteMode,
};
use jargal::renderer::SetOptions;
use jargal::{Context, Generator, Runner};
use serde_json::json;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_discovery_scenario() {
    let temp_dir = TempDir::new().unwrap();
    write_tree(
        temp_dir.path(),
        &[("a.txt", "a"), ("_partial.txt", "p"), ("sub/b.txt", "b")],
    );
    let generator = Generator::new("load", vec![load_templates(temp_dir.path(), Some("demo"))]);
    let mut ctx = Context::new();

    Runner::new()
        .run_generator_with(&generator, &mut ctx)
        .await
        .unwrap();

    let loaded = scope_templates(&ctx, "demo").unwrap();
    let keys: Vec<&str> = loaded.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["a.txt", "sub/b.txt"]);
}

#[tokio::test]
async fn test_generator_renders_scope_with_partials_and_helpers() {
    let templates = TempDir::new().unwrap();
    write_tree(
        templates.path(),
        &[
            ("_header.hbs", "{{pascalCase answers.name}} module"),
            (
                "{{snakeCase answers.name}}.rs.hbs",
                "// {{> header}}\npub struct {{pascalCase answers.name}};\n",
            ),
            ("README.md", "# {{titleCase answers.name}}"),
        ],
    );
    let out = TempDir::new().unwrap();
    let hooks = Arc::new(CollectingHooks::new());

    let generator = Generator::new(
        "module",
        vec![
            set_context(json!({"answers": {"name": "user account"}})),
            Arc::new(TemplateLoader::new(templates.path()).scope("module")),
            render_scope(RenderScope::new(
                "module",
                out.path().display().to_string(),
            )),
        ],
    );

    Runner::new()
        .with_hooks(hooks.clone())
        .run_generator(&generator)
        .await
        .unwrap();

    assert_eq!(
        fs::read_to_string(out.path().join("user_account.rs")).unwrap(),
        "// UserAccount module\npub struct UserAccount;\n"
    );
    assert_eq!(
        fs::read_to_string(out.path().join("README.md")).unwrap(),
        "# User Account"
    );
    assert!(!out.path().join("_header").exists());
    assert_eq!(hooks.written().len(), 2);
}

#[tokio::test]
async fn test_rerun_with_skip_mode_reports_skips() {
    let templates = TempDir::new().unwrap();
    write_tree(templates.path(), &[("a.txt", "A"), ("b.txt", "B")]);
    let out = TempDir::new().unwrap();
    let hooks = Arc::new(CollectingHooks::new());

    let generator = Generator::new(
        "copy",
        vec![
            load_templates(templates.path(), None),
            render_scope(
                RenderScope::new("default", out.path().display().to_string())
                    .mode(WriteMode::SkipIfExists),
            ),
        ],
    );
    let runner = Runner::new().with_hooks(hooks.clone());

    runner.run_generator(&generator).await.unwrap();
    fs::write(out.path().join("a.txt"), "edited").unwrap();
    runner.run_generator(&generator).await.unwrap();

    assert_eq!(fs::read_to_string(out.path().join("a.txt")).unwrap(), "edited");
    assert_eq!(hooks.written().len(), 2);
    assert_eq!(hooks.comments().len(), 2);
    assert!(hooks.comments()[0].starts_with("[SKIPPED] "));
}

#[tokio::test]
async fn test_renderer_setup_helpers_reach_templates() {
    let out = TempDir::new().unwrap();
    let destination = out.path().join("shout.txt");
    let generator = Generator::new(
        "shout",
        vec![RenderTemplate::new("{{shout word}}", destination.display().to_string())
            .into_write(Default::default())
            .into_action()],
    );
    let mut ctx = Context::new();
    ctx.insert("word", json!("hey"));

    Runner::new()
        .with_renderer_setup(|renderer| {
            renderer.set_helper(
                "shout",
                |s| format!("{}!", s.to_uppercase()),
                SetOptions::default(),
            )?;
            Ok(())
        })
        .run_generator_with(&generator, &mut ctx)
        .await
        .unwrap();

    assert_eq!(fs::read_to_string(&destination).unwrap(), "HEY!");
}
