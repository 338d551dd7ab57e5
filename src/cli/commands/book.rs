//! Book command - compile a character's pages into a PDF

use crate::book::{self, DocumentRenderer, FrameTool, Img2pdfRenderer};
use crate::cli::args::BookArgs;
use crate::config::Config;
use crate::content::{page, Catalog};
use crate::error::{FabulaError, FabulaResult};
use crate::store::{ArtifactPool, ManifestStore};
use crate::ui::{self, TaskSpinner, UiContext};
use tracing::debug;

/// Execute the book command
pub async fn execute(args: BookArgs, config: &Config) -> FabulaResult<()> {
    let ctx = UiContext::detect().with_plain(config.ui.plain);
    ui::intro(&ctx, "fabula book");

    let catalog = Catalog::load(&config.paths).await?;
    if !catalog.characters.contains_key(&args.character) {
        return Err(FabulaError::CharacterNotFound(args.character));
    }

    let pages = page::discover(&config.paths.pages_dir()).await?;
    let selected = book::select_pages(&pages, &args.character);
    if selected.is_empty() {
        return Err(FabulaError::User(format!(
            "no pages feature {}",
            args.character
        )));
    }

    let store = ManifestStore::new(config.paths.versions_dir());
    let (version, manifest) = match args.version {
        Some(version) => (version, store.read(version).await?),
        None => {
            let (latest, manifest) = store.read_latest().await?;
            if latest == 0 {
                return Err(FabulaError::NoVersions);
            }
            (latest, manifest)
        }
    };
    let manifest = manifest.ok_or(FabulaError::VersionNotFound(version))?;

    let pool = ArtifactPool::new(config.paths.pool_dir());
    let mut images = book::collect_images(&manifest, version, &selected, &pool)?;
    ui::step_info(
        &ctx,
        &format!("{} page(s) from version {version:02}", images.len()),
    );

    if args.framed {
        let tool = FrameTool::new();
        let mut spinner = TaskSpinner::new(&ctx);
        spinner.start(&format!("Framing {} page(s)...", images.len()));

        let mut framed = Vec::with_capacity(images.len());
        for image in &images {
            match tool.frame(image).await {
                Ok(path) => {
                    debug!("Framed {}", path.display());
                    framed.push(path);
                }
                Err(e) => {
                    spinner.stop_error("Framing failed");
                    return Err(e);
                }
            }
        }
        spinner.stop(&format!("Framed {} page(s)", framed.len()));
        images = framed;
    }

    let file_name = book::book_file_name(&args.character, version, &manifest.style);
    let output = store.version_dir(version).join(&file_name);

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Compiling PDF...");
    let renderer = Img2pdfRenderer::new();
    if let Err(e) = renderer.render(&images, &output).await {
        spinner.stop_error("PDF compilation failed");
        return Err(e);
    }
    spinner.stop(&format!("Compiled {file_name}"));

    store.record_book(version, &file_name).await?;

    ui::outro_success(&ctx, &output.display().to_string());
    Ok(())
}
