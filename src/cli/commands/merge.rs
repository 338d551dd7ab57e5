//! Merge command - mint a version that merges selections from others

use crate::cli::args::MergeArgs;
use crate::config::Config;
use crate::error::{FabulaError, FabulaResult};
use crate::store::ManifestStore;
use crate::ui::{self, UiContext};

/// Style tag recorded on merge versions
const MERGE_STYLE: &str = "merged";

/// Execute the merge command
pub async fn execute(args: MergeArgs, config: &Config) -> FabulaResult<()> {
    let ctx = UiContext::detect().with_plain(config.ui.plain);

    if args.sources.len() < 2 {
        return Err(FabulaError::User(
            "a merge needs at least two source versions".to_string(),
        ));
    }

    let store = ManifestStore::new(config.paths.versions_dir());
    for &source in &args.sources {
        if store.read(source).await?.is_none() {
            return Err(FabulaError::VersionNotFound(source));
        }
    }

    let version = store
        .create_merge_version(&args.message, MERGE_STYLE, &args.sources)
        .await?;

    let sources = args
        .sources
        .iter()
        .map(|v| format!("{v:02}"))
        .collect::<Vec<_>>()
        .join(", ");
    ui::step_ok(
        &ctx,
        &format!("Created merge version {version:02} from {sources}"),
    );
    ui::remark(&ctx, "Use fabula pick to select page images from the sources");

    Ok(())
}
