use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two uploaded archives an entry came from.
///
/// Archive A uses flat `USERNAME_CODE.pdf` names, archive B groups files
/// into `USERNAME(NUMBER) NAME` folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    A,
    B,
}

impl Origin {
    pub fn other(self) -> Origin {
        match self {
            Origin::A => Origin::B,
            Origin::B => Origin::A,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::A => write!(f, "Archive A"),
            Origin::B => write!(f, "Archive B"),
        }
    }
}

/// A relevant member read out of one source archive.
///
/// `username` is `None` when the naming convention of the entry's origin
/// did not match; such entries are listed in the report but never merged.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub username: Option<String>,
    pub folder: String,
    pub filename: String,
    pub origin: Origin,
    pub raw_path: String,
    pub content_hash: u64,
    pub data: Vec<u8>,
}

impl FileEntry {
    pub fn is_identified(&self) -> bool {
        self.username.is_some()
    }
}

/// All relevant entries of one archive, in archive order.
#[derive(Debug, Clone)]
pub struct ArchiveListing {
    pub origin: Origin,
    pub entries: Vec<FileEntry>,
}

impl ArchiveListing {
    pub fn identified(&self) -> impl Iterator<Item = (usize, &FileEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_identified())
    }

    pub fn identified_count(&self) -> usize {
        self.identified().count()
    }
}
