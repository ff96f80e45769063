use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use zip_reconcile_core::{Origin, ProgressReporter};

/// CLI progress reporter using indicatif spinners.
///
/// - Read phase: one spinner per archive (both reads run at once)
/// - Write phase: a single spinner
pub struct CliReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<Origin, ProgressBar>>,
    write_bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
            write_bar: Mutex::new(None),
        }
    }

    fn spinner(&self, message: String) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }
}

impl ProgressReporter for CliReporter {
    fn on_read_start(&self, origin: Origin) {
        let pb = self.spinner(format!("Reading {}...", origin));
        if let Ok(mut bars) = self.bars.lock() {
            if let Some(old) = bars.insert(origin, pb) {
                old.finish_and_clear();
            }
        }
    }

    fn on_read_complete(&self, origin: Origin, entries: usize, duration_secs: f64) {
        if let Ok(mut bars) = self.bars.lock() {
            if let Some(pb) = bars.remove(&origin) {
                pb.finish_and_clear();
            }
        }
        eprintln!(
            "  \x1b[32m✓\x1b[0m {} read: {} PDF files in {:.2}s",
            origin, entries, duration_secs
        );
    }

    fn on_resolve_complete(&self, duplicates: usize, duration_secs: f64) {
        eprintln!(
            "  \x1b[32m✓\x1b[0m Resolve complete: {} duplicate usernames in {:.2}s",
            duplicates, duration_secs
        );
    }

    fn on_write_start(&self, files: usize) {
        let pb = self.spinner(format!("Writing merged archive ({} files)...", files));
        if let Ok(mut guard) = self.write_bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_write_complete(&self, bytes: usize, duration_secs: f64) {
        if let Ok(mut guard) = self.write_bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
        eprintln!(
            "  \x1b[32m✓\x1b[0m Merged archive written: {} bytes in {:.2}s",
            bytes, duration_secs
        );
    }
}
