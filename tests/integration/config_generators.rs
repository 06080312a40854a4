//! Generators declared in jargal.toml, loaded and run through the library API

use super::test_utils::write_tree;
use jargal::actions::WriteMode;
use jargal::config::ConfigLoader;
use jargal::error::ApiError;
use jargal::prompt::{FixedPrompter, FixedSelector};
use jargal::{Context, Runner};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const SETTINGS: &str = r#"
[templates]
extension = ".hbs"

[[generators]]
name = "component"
description = "UI component"
templates = "templates/component"
destination = "src/components/{{kebabCase answers.name}}"

[generators.data]
framework = "solid"

[[generators.prompts]]
name = "name"
message = "Component name"

[[generators.prompts]]
name = "style"
type = "select"
choices = ["css", "scss"]
default = "css"

[[generators]]
name = "notes"
templates = "templates/notes"
destination = "notes"
mode = "skip-if-exists"
"#;

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_tree(
        dir.path(),
        &[
            ("jargal.toml", SETTINGS),
            (
                "templates/component/index.tsx.hbs",
                "// {{framework}}\nexport function {{pascalCase answers.name}}() {}\n",
            ),
            (
                "templates/component/style.{{answers.style}}.hbs",
                ".{{kebabCase answers.name}} {}\n",
            ),
            ("templates/notes/TODO.md", "- nothing yet\n"),
        ],
    );
    dir
}

fn loader() -> ConfigLoader {
    ConfigLoader::new().without_global_file().without_env()
}

#[tokio::test]
async fn test_manifest_generator_end_to_end() {
    let dir = workspace();
    let config = loader().load(dir.path()).unwrap();
    let prompter = Arc::new(FixedPrompter::new().answer("name", "nav bar"));
    let run_config = config.run_config(dir.path(), prompter, None).unwrap();

    Runner::new()
        .with_selector(Arc::new(FixedSelector::by_name("component")))
        .run(&run_config)
        .await
        .unwrap();

    let component = dir.path().join("src/components/nav-bar");
    assert_eq!(
        fs::read_to_string(component.join("index.tsx")).unwrap(),
        "// solid\nexport function NavBar() {}\n"
    );
    assert_eq!(
        fs::read_to_string(component.join("style.css")).unwrap(),
        ".nav-bar {}\n"
    );
    assert!(!dir.path().join("notes").exists());
}

#[tokio::test]
async fn test_seeded_answers_skip_prompts_and_mode_override_applies() {
    let dir = workspace();
    let config = loader().load(dir.path()).unwrap();
    let run_config = config
        .run_config(dir.path(), Arc::new(FixedPrompter::new()), Some(WriteMode::Force))
        .unwrap();
    let component = run_config.find("component").unwrap();
    let target = dir.path().join("src/components/menu/index.tsx");
    write_tree(dir.path(), &[("src/components/menu/index.tsx", "old")]);

    let mut ctx = Context::new();
    ctx.set_answer("name", "menu");
    ctx.set_answer("style", "scss");
    Runner::new()
        .run_generator_with(component, &mut ctx)
        .await
        .unwrap();

    assert!(fs::read_to_string(&target).unwrap().contains("function Menu()"));
    assert!(dir.path().join("src/components/menu/style.scss").exists());
}

#[tokio::test]
async fn test_missing_prompt_answer_records_error() {
    let dir = workspace();
    let config = loader().load(dir.path()).unwrap();
    let run_config = config
        .run_config(dir.path(), Arc::new(FixedPrompter::new()), None)
        .unwrap();
    let mut ctx = Context::new();

    let err = Runner::new()
        .run_generator_with(run_config.find("component").unwrap(), &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Action(_)));
    assert_eq!(ctx.errors()[0].action, "prompt");
    assert!(!dir.path().join("src").exists());
}
