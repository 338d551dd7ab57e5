//! Bounded-parallel page generation
//!
//! The pipeline fans page jobs out to at most `workers` in-flight generation
//! calls. Each job first consults the artifact pool: a pool hit only
//! refreshes the manifest entry. A failed page is collected and reported
//! after the run; it never aborts its siblings and leaves no manifest entry,
//! so the next run retries exactly the missing pages.

pub mod gemini;

pub use gemini::GeminiClient;

use crate::error::{FabulaError, FabulaResult};
use crate::prompt::RefImage;
use crate::store::{artifacts, ArtifactPool, ManifestStore};
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

/// Failures listed by name in the closing report before "+N more"
const FAILURE_PREVIEW: usize = 5;

/// Everything the model needs for one image
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub refs: Vec<RefImage>,
    pub seed: Option<u64>,
}

/// Produces image bytes for one request. No internal retries: the
/// fingerprint-addressed pool makes rerunning the command the retry path.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> FabulaResult<Vec<u8>>;
}

/// One page's planned work, fingerprint already computed
#[derive(Debug, Clone)]
pub struct PageJob {
    pub page_id: String,
    pub fingerprint: String,
    pub request: GenerationRequest,
}

/// What happened to one page
#[derive(Debug)]
pub struct PageOutcome {
    pub page_id: String,
    pub fingerprint: String,
    pub status: PageStatus,
}

#[derive(Debug)]
pub enum PageStatus {
    /// Pool already held the artifact; only the manifest entry was refreshed
    Cached,
    /// New artifact generated, stored and recorded
    Generated,
    /// Generation failed; the manifest is left without this page so a
    /// rerun retries it
    Failed(FabulaError),
}

/// Aggregate result of one run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub generated: usize,
    pub cached: usize,
    pub failed: Vec<(String, FabulaError)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.generated + self.cached + self.failed.len()
    }

    /// First few failures, one per line, capped with a "+N more" tail
    pub fn failure_preview(&self) -> String {
        let mut preview = String::new();
        for (page, err) in self.failed.iter().take(FAILURE_PREVIEW) {
            let _ = writeln!(preview, "  {page}: {err}");
        }
        if self.failed.len() > FAILURE_PREVIEW {
            let _ = writeln!(preview, "  +{} more", self.failed.len() - FAILURE_PREVIEW);
        }
        preview
    }
}

/// Fan-out driver wiring a generator to the pool and manifest store
pub struct Pipeline<G> {
    generator: G,
    pool: ArtifactPool,
    manifests: Arc<ManifestStore>,
    workers: usize,
}

impl<G: ImageGenerator> Pipeline<G> {
    pub fn new(
        generator: G,
        pool: ArtifactPool,
        manifests: Arc<ManifestStore>,
        workers: usize,
    ) -> Self {
        Self {
            generator,
            pool,
            manifests,
            workers: workers.max(1),
        }
    }

    /// Run all jobs against one version with bounded parallelism.
    ///
    /// `on_done` fires as each page settles, in completion order.
    pub async fn run(
        &self,
        version: u32,
        jobs: Vec<PageJob>,
        mut on_done: impl FnMut(&PageOutcome),
    ) -> RunSummary {
        let mut outcomes = stream::iter(jobs.into_iter().map(|job| self.run_page(version, job)))
            .buffer_unordered(self.workers);

        let mut summary = RunSummary::default();
        while let Some(outcome) = outcomes.next().await {
            on_done(&outcome);
            match outcome.status {
                PageStatus::Cached => summary.cached += 1,
                PageStatus::Generated => summary.generated += 1,
                PageStatus::Failed(err) => summary.failed.push((outcome.page_id, err)),
            }
        }
        summary
    }

    async fn run_page(&self, version: u32, job: PageJob) -> PageOutcome {
        let status = match self.process(version, &job).await {
            Ok(status) => status,
            Err(err) => PageStatus::Failed(err),
        };
        PageOutcome {
            page_id: job.page_id,
            fingerprint: job.fingerprint,
            status,
        }
    }

    async fn process(&self, version: u32, job: &PageJob) -> FabulaResult<PageStatus> {
        let file = artifacts::image_file_name(&job.page_id, &job.fingerprint);

        if self.pool.locate(&job.page_id, &job.fingerprint).is_some() {
            debug!("Pool hit for {}, skipping generation", job.page_id);
            self.manifests
                .record_image(version, &job.page_id, &file, &job.fingerprint)
                .await?;
            return Ok(PageStatus::Cached);
        }

        let bytes = self.generator.generate(&job.request).await?;
        self.pool
            .store(&job.page_id, &job.fingerprint, &bytes)
            .await?;
        self.pool
            .store_prompt(&job.page_id, &job.fingerprint, &job.request.prompt)
            .await?;
        self.manifests
            .record_image(version, &job.page_id, &file, &job.fingerprint)
            .await?;
        Ok(PageStatus::Generated)
    }
}
