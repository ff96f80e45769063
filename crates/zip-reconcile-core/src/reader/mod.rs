mod members;

use crate::config::AppConfig;
use crate::error::Error;
use crate::hasher;
use crate::identity;
use crate::model::{ArchiveListing, FileEntry, Origin};
use glob::Pattern;
use members::{base_name, parent_dir, settle_misnamed, MemberCollector, RawMember};
use std::io::Cursor;
use tracing::{debug, error, info, warn};
use zip::ZipArchive;

const ROOT_FOLDER: &str = "root";

/// Read one uploaded archive into its relevant entries.
///
/// Relevant members are files ending in `.pdf` (any case) or carrying no
/// extension at all; everything else is ignored. The archive handle is
/// released before this returns, on success and on error alike.
///
/// Fails with [`Error::InvalidArchiveFormat`] if the bytes are not a ZIP,
/// [`Error::EmptyArchive`] if there is nothing relevant inside, and
/// [`Error::NoIdentifiableFiles`] if no entry follows the origin's naming
/// convention.
pub fn read_archive(bytes: &[u8], origin: Origin, config: &AppConfig) -> Result<ArchiveListing, Error> {
    let ignore_patterns = compile_ignore_patterns(&config.ignore_patterns);
    let raw_members = {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|source| Error::InvalidArchiveFormat { origin, source })?;
        let collector = MemberCollector {
            origin,
            ignore_patterns: &ignore_patterns,
        };
        let mut raw_members = Vec::new();
        collector
            .collect(&mut archive, "", config.nested_archive_depth, &mut raw_members)
            .map_err(|source| Error::InvalidArchiveFormat { origin, source })?;
        settle_misnamed(&mut raw_members);
        raw_members
    };

    let entries: Vec<FileEntry> = raw_members
        .into_iter()
        .map(|member| build_entry(member, origin))
        .collect();

    if entries.is_empty() {
        return Err(Error::EmptyArchive { origin });
    }

    let listing = ArchiveListing { origin, entries };
    let identified = listing.identified_count();
    if identified == 0 {
        return Err(Error::NoIdentifiableFiles { origin });
    }

    info!(
        "{}: {} relevant files, {} identified, {} unmatched",
        origin,
        listing.entries.len(),
        identified,
        listing.entries.len() - identified
    );
    Ok(listing)
}

fn build_entry(member: RawMember, origin: Origin) -> FileEntry {
    let RawMember { path, data, .. } = member;
    let filename = base_name(&path).to_string();

    let (username, folder) = match origin {
        Origin::A => (
            identity::username_for(origin, &filename),
            parent_dir(&path).unwrap_or(ROOT_FOLDER).to_string(),
        ),
        Origin::B => folder_identity(&path),
    };

    match &username {
        Some(username) => debug!("{}: '{}' -> {}", origin, path, username),
        None => warn!("{}: could not extract username from '{}'", origin, path),
    }

    FileEntry {
        username,
        folder,
        filename,
        origin,
        content_hash: hasher::hash_data(&data),
        raw_path: path,
        data,
    }
}

/// Username and folder name for an archive B member: the nearest enclosing
/// folder that follows the `USERNAME(NUMBER) NAME` convention wins. Without
/// one, the member is unmatched and reported under its immediate folder.
fn folder_identity(path: &str) -> (Option<String>, String) {
    let folders: Vec<&str> = match parent_dir(path) {
        Some(parent) => parent.split('/').filter(|s| !s.is_empty()).collect(),
        None => Vec::new(),
    };

    for folder in folders.iter().rev() {
        if let Some(username) = identity::username_for(Origin::B, folder) {
            return (Some(username), folder.to_string());
        }
    }

    let folder = folders.last().copied().unwrap_or(ROOT_FOLDER);
    (None, folder.to_string())
}

fn compile_ignore_patterns(globs: &[String]) -> Vec<Pattern> {
    globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect()
}
