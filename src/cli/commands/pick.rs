//! Pick command - copy a page's image selection from another version

use crate::cli::args::PickArgs;
use crate::config::Config;
use crate::error::{FabulaError, FabulaResult};
use crate::store::ManifestStore;
use crate::ui::{self, UiContext};

/// Execute the pick command
pub async fn execute(args: PickArgs, config: &Config) -> FabulaResult<()> {
    let ctx = UiContext::detect().with_plain(config.ui.plain);

    let store = ManifestStore::new(config.paths.versions_dir());

    let target = match args.to {
        Some(version) => version,
        None => {
            let latest = store.latest_version().await?;
            if latest == 0 {
                return Err(FabulaError::NoVersions);
            }
            latest
        }
    };

    let source = store
        .read(args.from)
        .await?
        .ok_or(FabulaError::VersionNotFound(args.from))?;

    let entry = source
        .images
        .get(&args.page)
        .ok_or_else(|| FabulaError::ImageMissing {
            version: args.from,
            pages: args.page.clone(),
        })?;

    store
        .record_selection(
            target,
            &args.page,
            &entry.file,
            &entry.prompt_hash,
            args.from,
        )
        .await?;

    ui::step_ok(
        &ctx,
        &format!(
            "Picked {} from version {:02} into version {target:02}",
            args.page, args.from
        ),
    );

    Ok(())
}
