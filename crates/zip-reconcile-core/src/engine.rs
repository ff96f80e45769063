use crate::config::AppConfig;
use crate::error::Error;
use crate::merge;
use crate::model::{ArchiveListing, Origin};
use crate::progress::ProgressReporter;
use crate::reader;
use crate::report::{self, Summary};
use crate::resolver;
use std::time::Instant;
use tracing::{debug, info};

/// One uploaded archive: its original filename and fully buffered bytes.
#[derive(Debug, Clone)]
pub struct ArchiveInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ArchiveInput {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

#[derive(Debug)]
pub struct ReconcileResult {
    pub archive: Vec<u8>,
    pub filename: String,
    pub summary: Summary,
}

/// Stateless comparison engine. Every call to [`ReconcileEngine::reconcile`]
/// is independent; nothing is kept between calls.
pub struct ReconcileEngine {
    config: AppConfig,
}

impl ReconcileEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the full pipeline:
    /// 1. Read both archives concurrently
    /// 2. Resolve duplicate usernames (archive B's copy wins)
    /// 3. Write the merged archive and build the report over the same plan
    pub fn reconcile(
        &self,
        a: &ArchiveInput,
        b: &ArchiveInput,
        reporter: &dyn ProgressReporter,
    ) -> Result<ReconcileResult, Error> {
        info!("Comparing '{}' with '{}'", a.name, b.name);

        // Phase 1: Read
        let (a_listing, b_listing) = rayon::join(
            || self.read(a, Origin::A, reporter),
            || self.read(b, Origin::B, reporter),
        );
        // Archive A's failure is reported first regardless of which read finished first.
        let a_listing = a_listing?;
        let b_listing = b_listing?;

        // Phase 2: Resolve
        let resolve_start = Instant::now();
        let resolution = resolver::resolve(&a_listing, &b_listing);
        let plan = merge::plan_merge(&a_listing, &b_listing, &resolution, &self.config)?;
        let resolve_duration = resolve_start.elapsed();
        reporter.on_resolve_complete(resolution.pairs.len(), resolve_duration.as_secs_f64());
        debug!(
            "Resolve completed in {:.2}s, {} duplicate pairs, {} output files",
            resolve_duration.as_secs_f64(),
            resolution.pairs.len(),
            plan.len(),
        );

        // Phase 3: Write archive and build report
        reporter.on_write_start(plan.len());
        let write_start = Instant::now();
        let (archive, summary) = rayon::join(
            || merge::write_archive(&plan, &a_listing, &b_listing, &self.config),
            || report::build_summary(&a_listing, &b_listing, &resolution, &plan),
        );
        let archive = archive?;
        let write_duration = write_start.elapsed();
        reporter.on_write_complete(archive.len(), write_duration.as_secs_f64());

        let filename = merge::output_filename(&a.name, &b.name);
        info!(
            "{}: {} files kept, {} duplicates, {} removed",
            filename,
            summary.summary_stats.total_kept,
            summary.summary_stats.total_duplicates,
            summary.summary_stats.total_removed,
        );

        Ok(ReconcileResult {
            archive,
            filename,
            summary,
        })
    }

    fn read(
        &self,
        input: &ArchiveInput,
        origin: Origin,
        reporter: &dyn ProgressReporter,
    ) -> Result<ArchiveListing, Error> {
        reporter.on_read_start(origin);
        let start = Instant::now();
        let listing = reader::read_archive(&input.bytes, origin, &self.config)?;
        reporter.on_read_complete(origin, listing.entries.len(), start.elapsed().as_secs_f64());
        Ok(listing)
    }
}
