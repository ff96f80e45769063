use crate::model::Origin;

/// Trait for reporting reconcile progress.
///
/// Archive reads run concurrently, so implementations must tolerate
/// interleaved `on_read_*` calls for the two origins.
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_read_start(&self, _origin: Origin) {}
    fn on_read_complete(&self, _origin: Origin, _entries: usize, _duration_secs: f64) {}
    fn on_resolve_complete(&self, _duplicates: usize, _duration_secs: f64) {}
    fn on_write_start(&self, _files: usize) {}
    fn on_write_complete(&self, _bytes: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
