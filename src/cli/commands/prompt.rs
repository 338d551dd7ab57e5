//! Prompt command - show a page's prompt and fingerprint without generating

use crate::cli::args::PromptArgs;
use crate::config::Config;
use crate::content::{page, Catalog};
use crate::error::{FabulaError, FabulaResult};
use crate::prompt;
use crate::store::{fingerprint, image_file_name};

/// Execute the prompt command
pub async fn execute(args: PromptArgs, config: &Config) -> FabulaResult<()> {
    let style_id = args
        .style
        .clone()
        .or_else(|| config.generation.style.clone())
        .ok_or(FabulaError::StyleMissing)?;

    let catalog = Catalog::load(&config.paths).await?;
    let pages = page::discover(&config.paths.pages_dir()).await?;
    let page = pages
        .iter()
        .find(|p| p.id == args.page)
        .ok_or_else(|| FabulaError::PageNotFound(args.page.clone()))?;

    let bundle = prompt::build(page, &catalog, &style_id, &config.paths.refs_dir())?;
    let seed = page.spec.seed.or(config.generation.seed);
    let refs: Vec<String> = bundle.refs.iter().map(|r| r.rel.clone()).collect();
    let hash = fingerprint(&bundle.text, seed, &refs);

    // Prompt text first so the output pipes cleanly; metadata after
    print!("{}", bundle.text);
    println!();
    for reference in &bundle.refs {
        println!("ref: {} ({})", reference.rel, reference.label);
    }
    if let Some(seed) = seed {
        println!("seed: {seed}");
    }
    println!("fingerprint: {hash}");
    println!("artifact: {}", image_file_name(&page.id, &hash));

    Ok(())
}
