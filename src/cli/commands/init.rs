//! Init command - scaffold a new content base

use crate::cli::args::InitArgs;
use crate::error::{FabulaError, FabulaResult};
use crate::ui::{self, UiContext};
use std::path::Path;
use tokio::fs;

const STORY_TEMPLATE: &str = r#"# Story framing shared by every page prompt
title: The Meadow Lantern
setting:
  - a gentle storybook world of rolling meadows
  - warm late-afternoon light
"#;

const STYLES_TEMPLATE: &str = r#"# Illustration styles; pick one with `fabula generate --style watercolor`
watercolor:
  artist: a classic children's watercolorist
  prompts:
    - soft watercolor washes with visible paper texture
    - muted natural palette
"#;

const CHARACTER_TEMPLATE: &str = r#"name: Mia
age: 6
visual:
  - a small girl with curly brown hair
  - yellow raincoat, red boots
"#;

const LOCATION_TEMPLATE: &str = r#"display_name: The Meadow
visual:
  - wildflowers and tall grass
  - a crooked wooden fence
"#;

const PAGE_TEMPLATE: &str = r#"# Characters come from the file name (p01-mia); add `characters:` to override
location: meadow
visual:
  - Mia lifts a glowing lantern above the grass
text: |
  Mia found a lantern in the meadow,
  glowing like a tiny moon.
# seed: 7
"#;

/// Template for project-local config
const CONFIG_TEMPLATE: &str = r#"# Fabula project configuration
# Settings here override your global config (~/.config/fabula/config.toml)

[paths]
# content = "."
# output = "out"

[generation]
style = "watercolor"
# workers = 3
# seed = 7

# [ui]
# plain = true
"#;

/// Execute the init command
pub async fn execute(args: InitArgs) -> FabulaResult<()> {
    let ctx = UiContext::detect();

    let target_dir = match args.path {
        Some(ref p) => p.clone(),
        None => {
            std::env::current_dir().map_err(|e| FabulaError::io("getting current directory", e))?
        }
    };

    let story_path = target_dir.join("story.yaml");

    if story_path.exists() && !args.force {
        return Err(FabulaError::User(format!(
            "{} already exists. Use --force to overwrite.",
            story_path.display()
        )));
    }

    for dir in [
        "characters",
        "locations",
        "pages",
        "ref/styles",
        "ref/characters",
        "ref/locations",
        "ref/objects",
    ] {
        ensure_dir(&target_dir.join(dir)).await?;
    }

    let files = [
        ("story.yaml", STORY_TEMPLATE),
        ("styles.yaml", STYLES_TEMPLATE),
        ("characters/mia.yaml", CHARACTER_TEMPLATE),
        ("locations/meadow.yaml", LOCATION_TEMPLATE),
        ("pages/p01-mia.yaml", PAGE_TEMPLATE),
        (".fabula.toml", CONFIG_TEMPLATE),
    ];
    for (rel, body) in files {
        let path = target_dir.join(rel);
        fs::write(&path, body)
            .await
            .map_err(|e| FabulaError::io(format!("writing {}", path.display()), e))?;
    }

    ui::step_ok_detail(
        &ctx,
        "Created content base",
        &target_dir.display().to_string(),
    );
    ui::remark(&ctx, "Run `fabula check` to validate, then `fabula generate`");

    Ok(())
}

async fn ensure_dir(dir: &Path) -> FabulaResult<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| FabulaError::io(format!("creating directory {}", dir.display()), e))?;
    }
    Ok(())
}
