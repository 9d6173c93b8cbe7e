//! Layered configuration loading: global file, workspace files, env, explicit file

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tidbit::config::ConfigLoader;
use tidbit::provider::profile::ProviderType;

use crate::integration::test_utils::with_env;

const CLEAR: [(&str, Option<&str>); 4] = [
    ("TIDBIT_ENV", None),
    ("TIDBIT_GENERATION__INTERVAL_HOURS", None),
    ("TIDBIT_GENERATION__SNIPPETS_PER_TOPIC", None),
    ("TIDBIT_PROVIDER__MODEL", None),
];

fn write(path: PathBuf, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn vars<'a>(extra: &[(&'a str, Option<&'a str>)], config_home: &'a str) -> Vec<(&'a str, Option<&'a str>)> {
    let mut all: Vec<_> = CLEAR.to_vec();
    all.retain(|(k, _)| !extra.iter().any(|(e, _)| e == k));
    all.extend_from_slice(extra);
    all.push(("XDG_CONFIG_HOME", Some(config_home)));
    all
}

#[test]
fn defaults_apply_without_any_files() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let home_str = home.path().to_string_lossy().to_string();

    let config = with_env(&vars(&[], &home_str), || {
        ConfigLoader::load(workspace.path()).unwrap()
    });
    assert_eq!(config.generation.interval_hours, 6);
    assert_eq!(config.generation.snippets_per_topic, 10);
    assert_eq!(config.provider.provider_type, ProviderType::Gemini);
    assert_eq!(config.provider.model, "gemini-2.5-flash");
}

#[test]
fn workspace_file_overrides_global_file() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let home_str = home.path().to_string_lossy().to_string();

    write(
        home.path().join("tidbit").join("config.toml"),
        "[generation]\ninterval_hours = 12\nsnippets_per_topic = 4\n\n[provider]\nprovider_type = \"ollama\"\nmodel = \"llama3\"\n",
    );
    write(
        workspace.path().join("config").join("config.toml"),
        "[generation]\nsnippets_per_topic = 8\n",
    );

    let config = with_env(&vars(&[], &home_str), || {
        ConfigLoader::load(workspace.path()).unwrap()
    });
    assert_eq!(config.generation.interval_hours, 12);
    assert_eq!(config.generation.snippets_per_topic, 8);
    assert_eq!(config.provider.provider_type, ProviderType::Ollama);
    assert_eq!(config.provider.model, "llama3");
}

#[test]
fn environment_file_and_variables_take_precedence() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let home_str = home.path().to_string_lossy().to_string();

    write(
        workspace.path().join("config").join("config.toml"),
        "[generation]\ninterval_hours = 2\nsnippets_per_topic = 3\n",
    );
    write(
        workspace.path().join("config").join("staging.toml"),
        "[generation]\ninterval_hours = 24\n",
    );

    let extra = [
        ("TIDBIT_ENV", Some("staging")),
        ("TIDBIT_GENERATION__SNIPPETS_PER_TOPIC", Some("5")),
    ];
    let config = with_env(&vars(&extra, &home_str), || {
        ConfigLoader::load(workspace.path()).unwrap()
    });
    assert_eq!(config.generation.interval_hours, 24);
    assert_eq!(config.generation.snippets_per_topic, 5);
}

#[test]
fn explicit_file_replaces_workspace_files() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let home_str = home.path().to_string_lossy().to_string();

    write(
        workspace.path().join("config").join("config.toml"),
        "[generation]\ninterval_hours = 2\n",
    );
    let explicit = workspace.path().join("custom.toml");
    write(
        explicit.clone(),
        "[provider]\nprovider_type = \"anthropic\"\nmodel = \"claude-sonnet\"\n\n[storage]\nstore_path = \"data/store\"\n",
    );

    let config = with_env(&vars(&[], &home_str), || {
        ConfigLoader::load_from_file(&explicit).unwrap()
    });
    assert_eq!(config.generation.interval_hours, 6);
    assert_eq!(config.provider.provider_type, ProviderType::Anthropic);
    assert_eq!(
        config.storage.resolve_store_path(workspace.path()),
        workspace.path().join("data/store")
    );
}

#[test]
fn invalid_values_are_reported_together() {
    let home = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let home_str = home.path().to_string_lossy().to_string();

    write(
        workspace.path().join("config").join("config.toml"),
        "[generation]\ninterval_hours = 0\nsnippets_per_topic = 0\n\n[logging]\nlevel = \"loud\"\n",
    );

    let config = with_env(&vars(&[], &home_str), || {
        ConfigLoader::load(workspace.path()).unwrap()
    });
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
    let rendered: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    assert!(rendered[0].starts_with("Generation:"));
    assert!(rendered[1].starts_with("Logging:"));
}
