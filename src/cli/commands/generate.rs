//! Generate command - produce page images into a version

use crate::cli::args::GenerateArgs;
use crate::config::Config;
use crate::content::{page, Catalog, Page};
use crate::error::{FabulaError, FabulaResult};
use crate::generate::{GeminiClient, GenerationRequest, PageJob, PageStatus, Pipeline};
use crate::prompt;
use crate::store::{assess, fingerprint, resolve, ArtifactPool, ManifestStore, VersionState};
use crate::ui::{self, PageProgress, UiContext};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Execute the generate command
pub async fn execute(args: GenerateArgs, config: &Config) -> FabulaResult<()> {
    let ctx = UiContext::detect().with_plain(config.ui.plain);
    ui::intro(&ctx, "fabula generate");

    let style_id = args
        .style
        .clone()
        .or_else(|| config.generation.style.clone())
        .ok_or(FabulaError::StyleMissing)?;

    // Fail fast: no content work without a usable API key
    let client = GeminiClient::from_env(&config.generation.model)?;

    let catalog = Catalog::load(&config.paths).await?;
    catalog.style(&style_id)?;

    let pages = page::discover(&config.paths.pages_dir()).await?;
    let selected = select_pages(&pages, &args)?;
    if selected.is_empty() {
        return Err(FabulaError::User("no pages match the selection".to_string()));
    }

    ui::step_info(
        &ctx,
        &format!("{} page(s) in scope, style {}", selected.len(), style_id),
    );

    // Fingerprint every page up front; the resolver judges the full set
    let mut computed = BTreeMap::new();
    let mut jobs = Vec::with_capacity(selected.len());
    for page in &selected {
        let bundle = prompt::build(page, &catalog, &style_id, &config.paths.refs_dir())?;
        let seed = page.spec.seed.or(config.generation.seed);
        let refs: Vec<String> = bundle.refs.iter().map(|r| r.rel.clone()).collect();
        let hash = fingerprint(&bundle.text, seed, &refs);
        debug!("{} -> {} ({} refs)", page.id, hash, refs.len());

        computed.insert(page.id.clone(), hash.clone());
        jobs.push(PageJob {
            page_id: page.id.clone(),
            fingerprint: hash,
            request: GenerationRequest {
                prompt: bundle.text,
                refs: bundle.refs,
                seed,
            },
        });
    }

    let store = ManifestStore::new(config.paths.versions_dir());
    let (latest, manifest) = store.read_latest().await?;
    let state = assess(latest, manifest.as_ref(), &computed);

    // A stale set needs an operator message; ask on a TTY, fail otherwise
    let message = match (&state, args.message) {
        (VersionState::Current(_), message) => message,
        (_, Some(message)) => Some(message),
        (state, None) => {
            describe_state(&ctx, state);
            ui::input(&ctx, "Version message:").await?
        }
    };

    let version = resolve(&store, &state, message.as_deref(), &style_id).await?;
    match &state {
        VersionState::Current(v) => ui::step_info(
            &ctx,
            &format!("Version {v:02} is current, extending in place"),
        ),
        _ => ui::step_ok(&ctx, &format!("Minted version {version:02}")),
    }

    let pool = ArtifactPool::new(config.paths.pool_dir());
    let workers = args.workers.unwrap_or(config.generation.workers);
    let pipeline = Pipeline::new(client, pool, Arc::new(store), workers);

    let progress = PageProgress::new(&ctx, jobs.len() as u64);
    let summary = pipeline
        .run(version, jobs, |outcome| {
            progress.on_page(&outcome.page_id, status_label(&outcome.status));
        })
        .await;
    progress.finish();

    ui::key_value(&ctx, "generated", &summary.generated.to_string());
    ui::key_value(&ctx, "cached", &summary.cached.to_string());

    if summary.is_success() {
        ui::outro_success(
            &ctx,
            &format!(
                "Version {version:02}: {} page(s) up to date",
                summary.total()
            ),
        );
        Ok(())
    } else {
        ui::step_error(&ctx, &format!("{} page(s) failed:", summary.failed.len()));
        print!("{}", summary.failure_preview());
        ui::outro_error(&ctx, "Rerun to retry; finished pages are cached");
        Err(FabulaError::User(format!(
            "{} of {} page(s) failed",
            summary.failed.len(),
            summary.total()
        )))
    }
}

/// Apply the id list and character filters, keeping discovery order
fn select_pages<'a>(pages: &'a [Page], args: &GenerateArgs) -> FabulaResult<Vec<&'a Page>> {
    let mut selected: Vec<&Page> = pages.iter().collect();

    if !args.pages.is_empty() {
        for id in &args.pages {
            if !pages.iter().any(|p| &p.id == id) {
                return Err(FabulaError::PageNotFound(id.clone()));
            }
        }
        selected.retain(|p| args.pages.contains(&p.id));
    }

    if let Some(ref character) = args.character {
        selected.retain(|p| p.spec.characters.iter().any(|c| c == character));
    }

    Ok(selected)
}

fn describe_state(ctx: &UiContext, state: &VersionState) {
    match state {
        VersionState::NoVersion => {
            ui::step_info(ctx, "No versions exist yet; a message mints version 01");
        }
        VersionState::Stale { latest, changed } => {
            ui::step_warn(
                ctx,
                &format!(
                    "{} page(s) changed since version {latest:02}",
                    changed.len()
                ),
            );
        }
        VersionState::Current(_) => {}
    }
}

fn status_label(status: &PageStatus) -> &'static str {
    match status {
        PageStatus::Cached => "cached",
        PageStatus::Generated => "generated",
        PageStatus::Failed(_) => "failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Lines, PageSpec};
    use std::path::PathBuf;

    fn page(id: &str, number: u32, characters: &[&str]) -> Page {
        Page {
            id: id.to_string(),
            number,
            spec: PageSpec {
                characters: characters.iter().map(|c| c.to_string()).collect(),
                location: None,
                visual: Lines::One("scene".into()),
                text: String::new(),
                objects: vec![],
                seed: None,
            },
            path: PathBuf::from(format!("{id}.yaml")),
        }
    }

    fn args(pages: &[&str], character: Option<&str>) -> GenerateArgs {
        GenerateArgs {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            character: character.map(|c| c.to_string()),
            style: None,
            message: None,
            workers: None,
        }
    }

    #[test]
    fn select_all_by_default() {
        let pages = vec![page("p01-mia", 1, &["mia"]), page("p02-leo", 2, &["leo"])];
        let selected = select_pages(&pages, &args(&[], None)).unwrap();
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn select_by_id_keeps_order() {
        let pages = vec![
            page("p01-mia", 1, &["mia"]),
            page("p02-leo", 2, &["leo"]),
            page("p03-mia", 3, &["mia"]),
        ];
        let selected = select_pages(&pages, &args(&["p03-mia", "p01-mia"], None)).unwrap();
        let ids: Vec<_> = selected.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p01-mia", "p03-mia"]);
    }

    #[test]
    fn select_unknown_id_errors() {
        let pages = vec![page("p01-mia", 1, &["mia"])];
        let err = select_pages(&pages, &args(&["p09-zed"], None)).unwrap_err();
        assert!(matches!(err, FabulaError::PageNotFound(id) if id == "p09-zed"));
    }

    #[test]
    fn select_by_character() {
        let pages = vec![
            page("p01-mia", 1, &["mia"]),
            page("p02-leo", 2, &["leo"]),
            page("p03-mia-leo", 3, &["mia", "leo"]),
        ];
        let selected = select_pages(&pages, &args(&[], Some("leo"))).unwrap();
        let ids: Vec<_> = selected.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p02-leo", "p03-mia-leo"]);
    }

    #[test]
    fn status_labels() {
        assert_eq!(status_label(&PageStatus::Cached), "cached");
        assert_eq!(status_label(&PageStatus::Generated), "generated");
        assert_eq!(
            status_label(&PageStatus::Failed(FabulaError::ApiKeyMissing)),
            "failed"
        );
    }
}
