//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager, LOCAL_CONFIG_NAME};
use crate::error::{FabulaError, FabulaResult};
use crate::ui::{self, UiContext};
use toml_edit::DocumentMut;
use tokio::fs;

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config) -> FabulaResult<()> {
    let ctx = UiContext::detect().with_plain(config.ui.plain);
    let manager = ConfigManager::new();

    match args.action {
        None | Some(ConfigAction::Show) => show_config(config),
        Some(ConfigAction::Path) => show_path(&manager),
        Some(ConfigAction::Init { force }) => init_config(&ctx, &manager, force).await?,
        Some(ConfigAction::Set { key, value, local }) => {
            set_value(&ctx, &manager, &key, &value, local).await?
        }
    }

    Ok(())
}

fn show_config(config: &Config) {
    let toml =
        toml::to_string_pretty(config).unwrap_or_else(|_| "Error serializing config".to_string());
    println!("{}", toml);
}

fn show_path(manager: &ConfigManager) {
    println!("{}", manager.path().display());
}

async fn init_config(ctx: &UiContext, manager: &ConfigManager, force: bool) -> FabulaResult<()> {
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    let config = Config::default();
    manager.save(&config).await?;

    ui::step_ok_detail(
        ctx,
        "Configuration initialized",
        &path.display().to_string(),
    );

    Ok(())
}

async fn set_value(
    ctx: &UiContext,
    manager: &ConfigManager,
    key: &str,
    value: &str,
    local: bool,
) -> FabulaResult<()> {
    if !validate_config_key(key) {
        ui::step_error_detail(ctx, "Unknown config key", key);
        ui::remark(ctx, "Valid keys:");
        print_valid_keys();
        return Ok(());
    }

    let path = if local {
        let cwd = std::env::current_dir()
            .map_err(|e| FabulaError::io("getting current directory", e))?;
        cwd.join(LOCAL_CONFIG_NAME)
    } else {
        manager.path().to_path_buf()
    };

    // Edit in place so hand-written comments and layout survive
    let mut doc = if path.exists() {
        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| FabulaError::io(format!("reading {}", path.display()), e))?;
        content
            .parse::<DocumentMut>()
            .map_err(|e| FabulaError::ConfigInvalid {
                path: path.clone(),
                reason: e.to_string(),
            })?
    } else {
        DocumentMut::new()
    };

    set_document_value(&mut doc, key, leaf_value(key, value)?)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| FabulaError::ConfigDirCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }
    fs::write(&path, doc.to_string())
        .await
        .map_err(|e| FabulaError::io(format!("writing {}", path.display()), e))?;

    ui::step_ok(
        ctx,
        &format!("Set {} = {} in {}", key, value, path.display()),
    );

    Ok(())
}

/// Validate that a config key is one we recognise.
fn validate_config_key(key: &str) -> bool {
    let parts: Vec<&str> = key.split('.').collect();
    matches!(
        parts.as_slice(),
        ["paths", "content" | "output"]
            | ["generation", "style" | "workers" | "model" | "seed"]
            | ["ui", "plain"]
    )
}

/// Convert the value string to the type the key's field expects.
fn leaf_value(key: &str, value: &str) -> FabulaResult<toml_edit::Item> {
    let parts: Vec<&str> = key.split('.').collect();
    match parts.as_slice() {
        ["generation", "workers" | "seed"] => {
            let n: i64 = value
                .parse()
                .map_err(|_| FabulaError::User(format!("Invalid number: {}", value)))?;
            Ok(toml_edit::value(n))
        }
        ["ui", "plain"] => Ok(toml_edit::value(parse_bool(value)?)),
        _ => Ok(toml_edit::value(value)),
    }
}

/// Set a dot-separated key in the document, creating intermediate tables
/// as needed.
fn set_document_value(
    doc: &mut DocumentMut,
    key: &str,
    value: toml_edit::Item,
) -> FabulaResult<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let mut item = doc.as_item_mut();

    for &part in &parts[..parts.len() - 1] {
        let table = item
            .as_table_mut()
            .ok_or_else(|| FabulaError::User(format!("Expected table at key: {}", part)))?;
        item = table.entry(part).or_insert_with(|| {
            let mut implicit = toml_edit::Table::new();
            implicit.set_implicit(true);
            toml_edit::Item::Table(implicit)
        });
    }

    let leaf = parts
        .last()
        .ok_or_else(|| FabulaError::User("Empty config key".to_string()))?;
    let table = item
        .as_table_mut()
        .ok_or_else(|| FabulaError::User(format!("Expected table for key: {}", key)))?;
    table.insert(leaf, value);
    Ok(())
}

fn parse_bool(value: &str) -> FabulaResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(FabulaError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

fn print_valid_keys() {
    let keys = [
        "paths.content",
        "paths.output",
        "generation.style",
        "generation.workers",
        "generation.model",
        "generation.seed",
        "ui.plain",
    ];

    for key in keys {
        eprintln!("  {}", key);
    }
}
