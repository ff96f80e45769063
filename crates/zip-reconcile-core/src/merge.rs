use crate::config::AppConfig;
use crate::error::Error;
use crate::model::{ArchiveListing, Origin};
use crate::resolver::Resolution;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

const FALLBACK_OUTPUT_NAME: &str = "result.zip";

/// One member of the output archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMember {
    pub origin: Origin,
    pub index: usize,
    pub archive_name: String,
}

/// The exact member list of the output archive, in write order.
#[derive(Debug, Clone, Default)]
pub struct MergePlan {
    pub members: Vec<PlannedMember>,
}

impl MergePlan {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Name every surviving entry. Fails with [`Error::EmptyMergeResult`] when
/// nothing survived.
pub fn plan_merge(
    a: &ArchiveListing,
    b: &ArchiveListing,
    resolution: &Resolution,
    config: &AppConfig,
) -> Result<MergePlan, Error> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut members = Vec::new();

    for (origin, index) in resolution.survivors() {
        let entry = match origin {
            Origin::A => &a.entries[index],
            Origin::B => &b.entries[index],
        };
        let Some(username) = entry.username.as_deref() else {
            continue;
        };

        let name = member_name(username, &entry.filename);
        let candidate = if config.preserve_folders {
            format!("{}/{}", entry.folder, name)
        } else {
            name
        };
        let archive_name = unique_name(&candidate, &taken);
        if archive_name != candidate {
            debug!("Renamed colliding member '{}' to '{}'", candidate, archive_name);
        }
        taken.insert(archive_name.clone());

        members.push(PlannedMember {
            origin,
            index,
            archive_name,
        });
    }

    if members.is_empty() {
        return Err(Error::EmptyMergeResult);
    }
    Ok(MergePlan { members })
}

/// Write the planned members into a new in-memory ZIP.
///
/// Every member gets the same fixed timestamp so identical inputs produce
/// byte-identical output.
pub fn write_archive(
    plan: &MergePlan,
    a: &ArchiveListing,
    b: &ArchiveListing,
    config: &AppConfig,
) -> Result<Vec<u8>, Error> {
    if plan.is_empty() {
        return Err(Error::EmptyMergeResult);
    }

    let method = if config.compress_output {
        CompressionMethod::Deflated
    } else {
        CompressionMethod::Stored
    };
    let options = SimpleFileOptions::default()
        .compression_method(method)
        .last_modified_time(DateTime::default());

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for member in &plan.members {
        let entry = match member.origin {
            Origin::A => &a.entries[member.index],
            Origin::B => &b.entries[member.index],
        };
        writer.start_file(member.archive_name.clone(), options)?;
        writer.write_all(&entry.data)?;
    }
    let bytes = writer.finish()?.into_inner();

    info!(
        "Wrote merged archive: {} files, {} bytes",
        plan.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// `<username>_<filename>`, unless the filename already starts with
/// `<username>_`.
pub fn member_name(username: &str, filename: &str) -> String {
    let already_prefixed = filename
        .strip_prefix(username)
        .is_some_and(|rest| rest.starts_with('_'));
    if already_prefixed {
        filename.to_string()
    } else {
        format!("{}_{}", username, filename)
    }
}

/// Output filename derived from the two upload names, e.g.
/// `batch1.zip` + `batch2.zip` -> `merged_batch1_batch2.zip`.
pub fn output_filename(a_name: &str, b_name: &str) -> String {
    let stems: Vec<String> = [a_name, b_name]
        .iter()
        .map(|name| sanitize_stem(name))
        .filter(|stem| !stem.is_empty())
        .collect();

    if stems.is_empty() {
        FALLBACK_OUTPUT_NAME.to_string()
    } else {
        format!("merged_{}.zip", stems.join("_"))
    }
}

fn sanitize_stem(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let stem = match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.eq_ignore_ascii_case("zip") => stem,
        _ => base,
    };
    stem.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}

fn unique_name(candidate: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(candidate) {
        return candidate.to_string();
    }
    let (stem, ext) = match candidate.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains('/') => (stem, Some(ext)),
        _ => (candidate, None),
    };
    (1..)
        .map(|counter| match ext {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        })
        .find(|name| !taken.contains(name))
        .unwrap_or_else(|| candidate.to_string())
}
