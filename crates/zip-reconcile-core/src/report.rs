//! Aggregation of reader, resolver and merge output into the report shape
//! consumed by callers. Counting and shaping only, no decisions.

use crate::merge::MergePlan;
use crate::model::{ArchiveListing, FileEntry, Origin};
use crate::resolver::{Decision, Resolution, Status};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRow {
    pub username: Option<String>,
    pub folder: String,
    pub filename: String,
    pub status: Status,
    /// Only reported for archive B rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kept: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveStats {
    /// Matched rows only; `unique_files + duplicate_files == total_files`.
    pub total_files: usize,
    pub unique_files: usize,
    pub duplicate_files: usize,
    pub unmatched_files: usize,
    pub files: Vec<FileRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub folder: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicatePair {
    pub username: String,
    pub a_file: FileRef,
    pub b_file: FileRef,
    pub kept_from: Origin,
    pub removed_from: Origin,
    pub identical_content: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedFile {
    pub username: String,
    pub source: Origin,
    pub folder: String,
    pub filename: String,
    pub archive_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedArchive {
    pub total_files: usize,
    pub files: Vec<MergedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedFile {
    pub username: String,
    pub source: Origin,
    pub folder: String,
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_duplicates: usize,
    pub total_kept: usize,
    pub total_removed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub zip1_stats: ArchiveStats,
    pub zip2_stats: ArchiveStats,
    pub duplicate_pairs: Vec<DuplicatePair>,
    pub final_merged: MergedArchive,
    pub removed_files: Vec<RemovedFile>,
    pub summary_stats: SummaryStats,
}

pub fn build_summary(
    a: &ArchiveListing,
    b: &ArchiveListing,
    resolution: &Resolution,
    plan: &MergePlan,
) -> Summary {
    let listing = |origin: Origin| match origin {
        Origin::A => a,
        Origin::B => b,
    };

    let duplicate_pairs: Vec<DuplicatePair> = resolution
        .pairs
        .iter()
        .map(|pair| {
            let a_entry = &a.entries[pair.a_index];
            let b_entry = &b.entries[pair.b_index];
            DuplicatePair {
                username: pair.username.clone(),
                a_file: file_ref(a_entry),
                b_file: file_ref(b_entry),
                kept_from: pair.kept_from,
                removed_from: pair.removed_from(),
                identical_content: a_entry.content_hash == b_entry.content_hash,
            }
        })
        .collect();

    let merged_files: Vec<MergedFile> = plan
        .members
        .iter()
        .map(|member| {
            let entry = &listing(member.origin).entries[member.index];
            MergedFile {
                username: entry.username.clone().unwrap_or_default(),
                source: member.origin,
                folder: entry.folder.clone(),
                filename: entry.filename.clone(),
                archive_name: member.archive_name.clone(),
            }
        })
        .collect();

    let removed_files: Vec<RemovedFile> = [Origin::A, Origin::B]
        .into_iter()
        .flat_map(|origin| {
            listing(origin)
                .entries
                .iter()
                .zip(resolution.decisions(origin))
                .filter_map(move |(entry, decision)| {
                    let reason = decision.reason.as_ref()?;
                    Some(RemovedFile {
                        username: entry.username.clone().unwrap_or_default(),
                        source: origin,
                        folder: entry.folder.clone(),
                        filename: entry.filename.clone(),
                        reason: reason.clone(),
                    })
                })
        })
        .collect();

    let summary_stats = SummaryStats {
        total_duplicates: duplicate_pairs.len(),
        total_kept: merged_files.len(),
        total_removed: removed_files.len(),
    };

    Summary {
        zip1_stats: archive_stats(a, &resolution.a),
        zip2_stats: archive_stats(b, &resolution.b),
        duplicate_pairs,
        final_merged: MergedArchive {
            total_files: merged_files.len(),
            files: merged_files,
        },
        removed_files,
        summary_stats,
    }
}

fn archive_stats(listing: &ArchiveListing, decisions: &[Decision]) -> ArchiveStats {
    let files: Vec<FileRow> = listing
        .entries
        .iter()
        .zip(decisions)
        .map(|(entry, decision)| FileRow {
            username: entry.username.clone(),
            folder: entry.folder.clone(),
            filename: entry.filename.clone(),
            status: decision.status,
            kept: (listing.origin == Origin::B).then_some(decision.kept),
        })
        .collect();

    let count = |status: Status| files.iter().filter(|row| row.status == status).count();
    let unique_files = count(Status::Unique);
    let duplicate_files = count(Status::Duplicate);
    let unmatched_files = count(Status::Unmatched);

    ArchiveStats {
        total_files: unique_files + duplicate_files,
        unique_files,
        duplicate_files,
        unmatched_files,
        files,
    }
}

fn file_ref(entry: &FileEntry) -> FileRef {
    FileRef {
        folder: entry.folder.clone(),
        filename: entry.filename.clone(),
    }
}
