//! Text command - print a character's story text as Markdown

use crate::cli::args::TextArgs;
use crate::config::Config;
use crate::content::{page, Catalog, Page};
use crate::error::{FabulaError, FabulaResult};
use crate::ui::{self, UiContext};
use std::fmt::Write as _;
use tokio::fs;

/// Execute the text command
pub async fn execute(args: TextArgs, config: &Config) -> FabulaResult<()> {
    let catalog = Catalog::load(&config.paths).await?;
    if !catalog.characters.contains_key(&args.character) {
        return Err(FabulaError::CharacterNotFound(args.character));
    }

    let pages = page::discover(&config.paths.pages_dir()).await?;
    let texted = select_texted(&pages, &args.character);
    if texted.is_empty() {
        return Err(FabulaError::User(format!(
            "No text found for character: {}",
            args.character
        )));
    }

    let markdown = render(&catalog.character_name(&args.character), &texted);

    match args.output {
        Some(path) => {
            fs::write(&path, &markdown)
                .await
                .map_err(|e| FabulaError::io(format!("writing {}", path.display()), e))?;
            let ctx = UiContext::detect().with_plain(config.ui.plain);
            ui::step_ok_detail(&ctx, "Story text written", &path.display().to_string());
        }
        None => print!("{}", markdown),
    }

    Ok(())
}

/// Pages featuring the character that carry display text, in page order
fn select_texted<'a>(pages: &'a [Page], character: &str) -> Vec<&'a Page> {
    pages
        .iter()
        .filter(|p| p.spec.characters.iter().any(|c| c == character))
        .filter(|p| !p.spec.text.trim().is_empty())
        .collect()
}

fn render(name: &str, pages: &[&Page]) -> String {
    let mut out = format!("# {name}'s Story\n\n");
    for page in pages {
        let _ = write!(
            out,
            "### Page {}\n\n{}\n\n",
            page.number,
            page.spec.text.trim()
        );
    }
    out
}
