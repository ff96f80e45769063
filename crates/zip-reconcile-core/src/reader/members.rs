use crate::model::Origin;
use glob::Pattern;
use std::collections::HashSet;
use std::io::{self, Cursor, Read, Seek};
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

/// A file member pulled out of an archive, with its path relative to the
/// outermost archive. Nested archives appear as directories named after
/// their stem.
#[derive(Debug)]
pub(crate) struct RawMember {
    pub path: String,
    pub data: Vec<u8>,
    /// Came from a `.zip` member that could not be expanded; its path is
    /// provisional until [`settle_misnamed`] runs.
    pub misnamed: bool,
}

pub(crate) struct MemberCollector<'a> {
    pub origin: Origin,
    pub ignore_patterns: &'a [Pattern],
}

impl MemberCollector<'_> {
    /// Walk every member of `archive` in central-directory order, expanding
    /// nested ZIPs in place while `depth_left > 0`.
    pub fn collect<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        prefix: &str,
        depth_left: usize,
        out: &mut Vec<RawMember>,
    ) -> Result<(), ZipError> {
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }

            let path = join_path(prefix, &file.name().replace('\\', "/"));
            if self.is_ignored(&path) {
                debug!("Ignoring member '{}' in {}", path, self.origin);
                continue;
            }

            let ext = extension(base_name(&path)).map(str::to_ascii_lowercase);
            let declared_size = file.size();
            match ext.as_deref() {
                Some("zip") => {
                    let data = read_member(&mut file, declared_size, &path)?;
                    self.expand_nested(&path, data, depth_left, out);
                }
                // Extension-less members may be PDFs that lost their suffix.
                Some("pdf") | None => {
                    let data = read_member(&mut file, declared_size, &path)?;
                    out.push(RawMember {
                        path,
                        data,
                        misnamed: false,
                    });
                }
                Some(_) => continue,
            }
        }
        Ok(())
    }

    fn expand_nested(&self, path: &str, data: Vec<u8>, depth_left: usize, out: &mut Vec<RawMember>) {
        let nested_dir = strip_extension(path);

        if depth_left > 0 {
            match ZipArchive::new(Cursor::new(data.as_slice())) {
                Ok(mut nested) => {
                    let mut nested_members = Vec::new();
                    match self.collect(&mut nested, nested_dir, depth_left - 1, &mut nested_members) {
                        Ok(()) => {
                            debug!(
                                "Expanded nested archive '{}' ({} members)",
                                path,
                                nested_members.len()
                            );
                            out.extend(nested_members);
                            return;
                        }
                        Err(e) => warn!("Could not read nested archive '{}': {}", path, e),
                    }
                }
                Err(e) => warn!("Could not open nested archive '{}': {}", path, e),
            }
        } else {
            warn!("Nested archive '{}' exceeds the expansion depth", path);
        }

        // Archive B uploads sometimes carry PDFs with a .zip extension.
        if self.origin == Origin::B {
            debug!("Treating '{}' as a misnamed PDF", path);
            out.push(RawMember {
                path: format!("{}.pdf", nested_dir),
                data,
                misnamed: true,
            });
        }
    }

    fn is_ignored(&self, path: &str) -> bool {
        self.ignore_patterns
            .iter()
            .any(|pattern| pattern.matches(path))
    }
}

/// Read a member's bytes, growing the buffer as data arrives. The size in the
/// header is only trusted for the final consistency check.
fn read_member(mut reader: impl Read, declared_size: u64, path: &str) -> Result<Vec<u8>, ZipError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    if data.len() as u64 != declared_size {
        return Err(ZipError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "member '{}' declares {} bytes but holds {}",
                path,
                declared_size,
                data.len()
            ),
        )));
    }
    Ok(data)
}

/// Give every misnamed PDF its final path once the whole archive has been
/// walked: `<stem>.pdf`, or `<stem>_1.pdf`, `<stem>_2.pdf`, ... when another
/// member already holds that name.
pub(crate) fn settle_misnamed(members: &mut [RawMember]) {
    let mut taken: HashSet<String> = members
        .iter()
        .filter(|m| !m.misnamed)
        .map(|m| m.path.clone())
        .collect();

    for member in members.iter_mut().filter(|m| m.misnamed) {
        let settled = unique_path(&member.path, &taken);
        if settled != member.path {
            debug!("Misnamed PDF '{}' renamed to '{}'", member.path, settled);
            member.path = settled.clone();
        }
        taken.insert(settled);
    }
}

fn unique_path(candidate: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(candidate) {
        return candidate.to_string();
    }
    let stem = strip_extension(candidate);
    let ext = extension(base_name(candidate)).unwrap_or("pdf");
    (1..)
        .map(|counter| format!("{}_{}.{}", stem, counter, ext))
        .find(|name| !taken.contains(name.as_str()))
        .unwrap_or_else(|| candidate.to_string())
}

fn join_path(prefix: &str, name: &str) -> String {
    let name = name.trim_start_matches('/');
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

pub(crate) fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Directory part of `path`, or `None` for members at the archive root.
pub(crate) fn parent_dir(path: &str) -> Option<&str> {
    path.rsplit_once('/')
        .map(|(parent, _)| parent)
        .filter(|parent| !parent.is_empty())
}

/// Extension of a base name. Names without a dot have none; dotfiles such
/// as `.DS_Store` count as having one.
pub(crate) fn extension(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, ext)| ext)
}

fn strip_extension(path: &str) -> &str {
    let name = base_name(path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => &path[..path.len() - (name.len() - dot)],
        _ => path,
    }
}
