use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use zip_reconcile_core::report::MergedArchive;
use zip_reconcile_core::{ReconcileResult, Summary};

/// Paths of everything written for one run.
#[derive(Debug)]
pub struct WrittenFiles {
    pub archive: PathBuf,
    pub report: PathBuf,
    pub csv: Option<PathBuf>,
}

pub fn write_outputs(result: &ReconcileResult, output_dir: &Path, with_csv: bool) -> Result<WrittenFiles> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let stem = result.filename.trim_end_matches(".zip");

    let archive = output_dir.join(&result.filename);
    fs::write(&archive, &result.archive)
        .with_context(|| format!("writing {}", archive.display()))?;

    let report = output_dir.join(format!("{}.report.json", stem));
    write_report(&result.summary, &report)?;

    let csv = if with_csv {
        let path = output_dir.join(format!("{}.csv", stem));
        write_csv(&result.summary.final_merged, &path)?;
        Some(path)
    } else {
        None
    };

    Ok(WrittenFiles {
        archive,
        report,
        csv,
    })
}

fn write_report(summary: &Summary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serializing report")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

fn write_csv(merged: &MergedArchive, path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(["username", "source", "folder", "filename", "archive_name"])?;
    for file in &merged.files {
        let source = format!("{:?}", file.source);
        writer.write_record([
            file.username.as_str(),
            source.as_str(),
            file.folder.as_str(),
            file.filename.as_str(),
            file.archive_name.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
