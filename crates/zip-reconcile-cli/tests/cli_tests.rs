use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::process::Command;

use tempfile::tempdir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

fn write_zip(path: &Path, files: &[(&str, &[u8])]) {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in files {
        writer.start_file(name.to_string(), options).unwrap();
        writer.write_all(content).unwrap();
    }
    fs::write(path, writer.finish().unwrap().into_inner()).unwrap();
}

fn zip_reconcile(work_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_zip-reconcile"));
    cmd.current_dir(work_dir)
        .env("TRACING_LEVEL", "warn")
        .env("LOG_FILE_PATH", "zip-reconcile-test.log");
    cmd
}

#[test]
fn test_compare_writes_archive_report_and_csv() {
    let tmp = tempdir().unwrap();
    write_zip(
        &tmp.path().join("batch1.zip"),
        &[("alice_001.pdf", b"%PDF a"), ("bob_002.pdf", b"%PDF b")],
    );
    write_zip(
        &tmp.path().join("batch2.zip"),
        &[("alice(12) Alice Smith/alice_final.pdf", b"%PDF alice b")],
    );

    let status = zip_reconcile(tmp.path())
        .args(["compare", "batch1.zip", "batch2.zip", "-o", "out", "--csv"])
        .status()
        .unwrap();
    assert!(status.success());

    let out = tmp.path().join("out");
    let archive = fs::read(out.join("merged_batch1_batch2.zip")).unwrap();
    let zip = ZipArchive::new(Cursor::new(archive)).unwrap();
    assert_eq!(zip.len(), 2);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("merged_batch1_batch2.report.json")).unwrap())
            .unwrap();
    assert_eq!(report["summary_stats"]["total_duplicates"], 1);
    assert_eq!(report["final_merged"]["total_files"], 2);

    let csv = fs::read_to_string(out.join("merged_batch1_batch2.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("username,source,folder,filename,archive_name")
    );
    assert_eq!(lines.count(), 2);
}

#[test]
fn test_compare_json_envelope() {
    let tmp = tempdir().unwrap();
    write_zip(&tmp.path().join("a.zip"), &[("anna_1.pdf", b"%PDF")]);
    write_zip(&tmp.path().join("b.zip"), &[("ben(2) Ben/ben.pdf", b"%PDF")]);

    let output = zip_reconcile(tmp.path())
        .args(["compare", "a.zip", "b.zip", "-o", "out", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["filename"], "merged_a_b.zip");
    assert!(json["zip_file"].as_str().map(|s| !s.is_empty()).unwrap_or(false));
    assert_eq!(json["summary"]["final_merged"]["total_files"], 2);
}

#[test]
fn test_compare_reports_error_detail() {
    let tmp = tempdir().unwrap();
    write_zip(&tmp.path().join("a.zip"), &[("readme.txt", b"no pdfs here")]);
    write_zip(&tmp.path().join("b.zip"), &[("ben(2) Ben/ben.pdf", b"%PDF")]);

    let output = zip_reconcile(tmp.path())
        .args(["compare", "a.zip", "b.zip", "--json"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["detail"], "No PDF files found in Archive A");
}

#[test]
fn test_compare_rejects_non_zip_extension() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("a.rar"), b"whatever").unwrap();
    write_zip(&tmp.path().join("b.zip"), &[("ben(2) Ben/ben.pdf", b"%PDF")]);

    let status = zip_reconcile(tmp.path())
        .args(["compare", "a.rar", "b.zip"])
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!tmp.path().join("merged_a_b.zip").exists());
}

#[test]
fn test_compare_json_reports_request_errors() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("a.rar"), b"whatever").unwrap();
    write_zip(&tmp.path().join("b.zip"), &[("ben(2) Ben/ben.pdf", b"%PDF")]);

    let output = zip_reconcile(tmp.path())
        .args(["compare", "a.rar", "b.zip", "--json"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["detail"], "File 1 must be a ZIP file");
}

#[test]
fn test_compare_json_reports_missing_input() {
    let tmp = tempdir().unwrap();
    write_zip(&tmp.path().join("b.zip"), &[("ben(2) Ben/ben.pdf", b"%PDF")]);

    let output = zip_reconcile(tmp.path())
        .args(["compare", "missing.zip", "b.zip", "--json"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let detail = json["detail"].as_str().unwrap();
    assert!(detail.starts_with("reading missing.zip"), "{}", detail);
}
