//! Cross-archive duplicate detection and the keep/remove policy.

use crate::model::{ArchiveListing, Origin};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// The archive whose copy survives when a username appears in both.
/// Archive B carries the richer folder metadata.
pub const KEEP_FROM: Origin = Origin::B;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Unique,
    Duplicate,
    Unmatched,
}

/// What happens to one entry of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub status: Status,
    pub kept: bool,
    /// Why a matched entry was dropped. `None` for kept and unmatched entries.
    pub reason: Option<String>,
}

/// A username found in both archives. Indices point at the first entry with
/// that username on each side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairDecision {
    pub username: String,
    pub a_index: usize,
    pub b_index: usize,
    pub kept_from: Origin,
}

impl PairDecision {
    pub fn removed_from(&self) -> Origin {
        self.kept_from.other()
    }
}

/// Per-entry decisions for both listings (parallel to their `entries`) and
/// the duplicate pairs in order of first appearance in archive A.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub a: Vec<Decision>,
    pub b: Vec<Decision>,
    pub pairs: Vec<PairDecision>,
}

impl Resolution {
    pub fn decisions(&self, origin: Origin) -> &[Decision] {
        match origin {
            Origin::A => &self.a,
            Origin::B => &self.b,
        }
    }

    /// Surviving entries: archive A's in archive order, then archive B's.
    pub fn survivors(&self) -> impl Iterator<Item = (Origin, usize)> + '_ {
        let kept = move |origin: Origin| {
            self.decisions(origin)
                .iter()
                .enumerate()
                .filter(|(_, decision)| decision.kept)
                .map(move |(index, _)| (origin, index))
        };
        kept(Origin::A).chain(kept(Origin::B))
    }
}

pub fn resolve(a: &ArchiveListing, b: &ArchiveListing) -> Resolution {
    let a_first = first_index_by_username(a);
    let b_first = first_index_by_username(b);

    let mut pairs = Vec::new();
    for (index, entry) in a.identified() {
        let Some(username) = entry.username.as_deref() else {
            continue;
        };
        if a_first.get(username) != Some(&index) {
            continue;
        }
        if let Some(&b_index) = b_first.get(username) {
            debug!("Duplicate username '{}': keeping copy from {}", username, KEEP_FROM);
            pairs.push(PairDecision {
                username: username.to_string(),
                a_index: index,
                b_index,
                kept_from: KEEP_FROM,
            });
        }
    }

    let resolution = Resolution {
        a: decide(a, &a_first, &b_first),
        b: decide(b, &b_first, &a_first),
        pairs,
    };

    info!(
        "Resolved {} duplicate usernames, {} entries survive",
        resolution.pairs.len(),
        resolution.survivors().count()
    );
    resolution
}

fn first_index_by_username(listing: &ArchiveListing) -> HashMap<&str, usize> {
    let mut first = HashMap::new();
    for (index, entry) in listing.identified() {
        if let Some(username) = entry.username.as_deref() {
            first.entry(username).or_insert(index);
        }
    }
    first
}

fn decide(
    listing: &ArchiveListing,
    own_first: &HashMap<&str, usize>,
    counterpart: &HashMap<&str, usize>,
) -> Vec<Decision> {
    listing
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let Some(username) = entry.username.as_deref() else {
                return Decision {
                    status: Status::Unmatched,
                    kept: false,
                    reason: None,
                };
            };

            if !counterpart.contains_key(username) {
                // One-sided usernames pass through, repeats included.
                return Decision {
                    status: Status::Unique,
                    kept: true,
                    reason: None,
                };
            }

            if listing.origin != KEEP_FROM {
                Decision {
                    status: Status::Duplicate,
                    kept: false,
                    reason: Some(format!("Duplicate - kept from {} instead", KEEP_FROM)),
                }
            } else if own_first.get(username) == Some(&index) {
                Decision {
                    status: Status::Duplicate,
                    kept: true,
                    reason: None,
                }
            } else {
                Decision {
                    status: Status::Duplicate,
                    kept: false,
                    reason: Some(format!(
                        "Additional copy in {} of a duplicated username",
                        KEEP_FROM
                    )),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileEntry;

    fn entry(origin: Origin, username: Option<&str>, filename: &str) -> FileEntry {
        FileEntry {
            username: username.map(str::to_string),
            folder: "root".to_string(),
            filename: filename.to_string(),
            origin,
            raw_path: filename.to_string(),
            content_hash: 0,
            data: Vec::new(),
        }
    }

    fn listing(origin: Origin, entries: &[(Option<&str>, &str)]) -> ArchiveListing {
        ArchiveListing {
            origin,
            entries: entries
                .iter()
                .map(|(u, f)| entry(origin, *u, f))
                .collect(),
        }
    }

    #[test]
    fn test_b_copy_is_kept_for_duplicates() {
        let a = listing(Origin::A, &[(Some("alice"), "alice_001.pdf"), (Some("bob"), "bob_002.pdf")]);
        let b = listing(Origin::B, &[(Some("alice"), "alice_final.pdf")]);

        let resolution = resolve(&a, &b);

        assert_eq!(resolution.pairs.len(), 1);
        assert_eq!(resolution.pairs[0].username, "alice");
        assert_eq!(resolution.pairs[0].kept_from, Origin::B);
        assert_eq!(resolution.pairs[0].removed_from(), Origin::A);

        assert_eq!(resolution.a[0].status, Status::Duplicate);
        assert!(!resolution.a[0].kept);
        assert!(resolution.a[0].reason.is_some());
        assert_eq!(resolution.a[1].status, Status::Unique);
        assert!(resolution.a[1].kept);
        assert_eq!(resolution.b[0].status, Status::Duplicate);
        assert!(resolution.b[0].kept);

        let survivors: Vec<_> = resolution.survivors().collect();
        assert_eq!(survivors, vec![(Origin::A, 1), (Origin::B, 0)]);
    }

    #[test]
    fn test_unmatched_entries_are_excluded() {
        let a = listing(Origin::A, &[(None, "charlie_noext"), (Some("bob"), "bob_1.pdf")]);
        let b = listing(Origin::B, &[(Some("charlie"), "c.pdf")]);

        let resolution = resolve(&a, &b);

        assert!(resolution.pairs.is_empty());
        assert_eq!(resolution.a[0].status, Status::Unmatched);
        assert!(!resolution.a[0].kept);
        assert_eq!(resolution.b[0].status, Status::Unique);
    }

    #[test]
    fn test_one_sided_repeats_pass_through() {
        let a = listing(Origin::A, &[(Some("eve"), "eve_1.pdf")]);
        let b = listing(Origin::B, &[(Some("dave"), "one.pdf"), (Some("dave"), "two.pdf")]);

        let resolution = resolve(&a, &b);

        assert!(resolution.pairs.is_empty());
        assert!(resolution.b.iter().all(|d| d.kept && d.status == Status::Unique));
        assert_eq!(resolution.survivors().count(), 3);
    }

    #[test]
    fn test_duplicated_username_keeps_first_b_copy_only() {
        let a = listing(Origin::A, &[(Some("alice"), "alice_1.pdf"), (Some("alice"), "alice_2.pdf")]);
        let b = listing(Origin::B, &[(Some("alice"), "first.pdf"), (Some("alice"), "second.pdf")]);

        let resolution = resolve(&a, &b);

        assert_eq!(resolution.pairs.len(), 1);
        assert_eq!(resolution.pairs[0].a_index, 0);
        assert_eq!(resolution.pairs[0].b_index, 0);
        assert!(resolution.a.iter().all(|d| !d.kept && d.status == Status::Duplicate));
        assert!(resolution.b[0].kept);
        assert!(!resolution.b[1].kept);
        assert!(resolution.b[1]
            .reason
            .as_deref()
            .unwrap()
            .contains("Additional copy"));
        assert_eq!(resolution.survivors().collect::<Vec<_>>(), vec![(Origin::B, 0)]);
    }

    #[test]
    fn test_pairs_follow_archive_a_order() {
        let a = listing(Origin::A, &[(Some("zed"), "zed_1.pdf"), (Some("amy"), "amy_1.pdf")]);
        let b = listing(Origin::B, &[(Some("amy"), "a.pdf"), (Some("zed"), "z.pdf")]);

        let resolution = resolve(&a, &b);

        let names: Vec<_> = resolution.pairs.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(names, vec!["zed", "amy"]);
        assert_eq!(resolution.pairs[0].b_index, 1);
    }
}
