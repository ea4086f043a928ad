//! Sorting policies.
//!
//! Every folder's children are stable-sorted by a [`SortKey`]. Ties keep
//! their relative order in both directions.

use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use snoopy_core::{Entry, Folder, Node, NodeKind, SnoopError};

use crate::engine::{Transform, visit_children};

/// Attribute children are ordered by.
///
/// A child lacking the attribute sorts as the smallest value: errors have no
/// size or timestamps, files have no files, folders or errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", rename_all = "snake_case")]
pub enum SortKey {
    Size,
    Created,
    LastAccess,
    LastModified,
    Files { deep: bool },
    Folders { deep: bool },
    Errors { deep: bool },
    Name { case_insensitive: bool },
    Kind,
}

/// Comparable value extracted from a node. Only values of the same variant
/// are ever compared.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Size(Option<u64>),
    Time(Option<DateTime<Local>>),
    Count(usize),
    Text(String),
    Kind(NodeKind),
}

impl SortKey {
    fn value(self, node: &Node) -> SortValue {
        match self {
            SortKey::Size => SortValue::Size(node.size()),
            SortKey::Created => SortValue::Time(node.timestamps().and_then(|t| t.created)),
            SortKey::LastAccess => SortValue::Time(node.timestamps().and_then(|t| t.accessed)),
            SortKey::LastModified => SortValue::Time(node.timestamps().map(|t| t.modified)),
            SortKey::Files { deep } => SortValue::Count(node.as_folder().map_or(0, |f| {
                if deep { f.deep_files().len() } else { f.files().count() }
            })),
            SortKey::Folders { deep } => SortValue::Count(node.as_folder().map_or(0, |f| {
                if deep { f.deep_folders().len() } else { f.folders().count() }
            })),
            SortKey::Errors { deep } => SortValue::Count(node.as_folder().map_or(0, |f| {
                if deep { f.deep_errors().len() } else { f.errors().count() }
            })),
            SortKey::Name { case_insensitive } => SortValue::Text(if case_insensitive {
                node.name().to_lowercase()
            } else {
                node.name().to_string()
            }),
            SortKey::Kind => SortValue::Kind(node.kind()),
        }
    }
}

impl FromStr for SortKey {
    type Err = SnoopError;

    /// Parse a CLI name. Counts are deep, names case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim().to_ascii_lowercase().as_str() {
            "size" => SortKey::Size,
            "created" => SortKey::Created,
            "accessed" => SortKey::LastAccess,
            "modified" => SortKey::LastModified,
            "files" => SortKey::Files { deep: true },
            "folders" => SortKey::Folders { deep: true },
            "errors" => SortKey::Errors { deep: true },
            "name" => SortKey::Name {
                case_insensitive: false,
            },
            "kind" => SortKey::Kind,
            _ => {
                return Err(SnoopError::parse(
                    s,
                    "expected one of size, created, accessed, modified, files, folders, errors, name, kind",
                ));
            }
        };
        Ok(key)
    }
}

/// Sorts every folder's children by `key`, descending when `reverse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub key: SortKey,
    pub reverse: bool,
}

impl Sort {
    /// Largest first.
    pub fn descending(key: SortKey) -> Self {
        Self { key, reverse: true }
    }

    /// Smallest first.
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            reverse: false,
        }
    }

    /// Sort the whole tree.
    pub fn sort(&mut self, tree: Folder) -> Folder {
        let root = self.sort_children(tree);
        visit_children(self, root, 1)
    }

    fn sort_children(&self, mut folder: Folder) -> Folder {
        let mut keyed: Vec<(SortValue, Node)> = folder
            .take_children()
            .into_iter()
            .map(|node| (self.key.value(&node), node))
            .collect();

        if self.reverse {
            keyed.sort_by(|a, b| b.0.cmp(&a.0));
        } else {
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
        }

        folder.set_children(keyed.into_iter().map(|(_, node)| node).collect());
        folder
    }
}

impl Transform for Sort {
    fn visit_folder(&mut self, folder: Folder, _depth: usize) -> Option<Folder> {
        Some(self.sort_children(folder))
    }
}

fn sorted(tree: Folder, key: SortKey, reverse: bool) -> Folder {
    Sort { key, reverse }.sort(tree)
}

pub fn by_size(tree: Folder, reverse: bool) -> Folder {
    sorted(tree, SortKey::Size, reverse)
}

pub fn by_created(tree: Folder, reverse: bool) -> Folder {
    sorted(tree, SortKey::Created, reverse)
}

pub fn by_last_access(tree: Folder, reverse: bool) -> Folder {
    sorted(tree, SortKey::LastAccess, reverse)
}

pub fn by_last_modified(tree: Folder, reverse: bool) -> Folder {
    sorted(tree, SortKey::LastModified, reverse)
}

/// Sort by deep file count.
pub fn by_num_files(tree: Folder, reverse: bool) -> Folder {
    sorted(tree, SortKey::Files { deep: true }, reverse)
}

/// Sort by deep folder count.
pub fn by_num_folders(tree: Folder, reverse: bool) -> Folder {
    sorted(tree, SortKey::Folders { deep: true }, reverse)
}

/// Sort by deep error count.
pub fn by_num_errors(tree: Folder, reverse: bool) -> Folder {
    sorted(tree, SortKey::Errors { deep: true }, reverse)
}

/// Case-insensitive name order; `reverse` gives Z to A.
pub fn alphabetic(tree: Folder, reverse: bool) -> Folder {
    sorted(
        tree,
        SortKey::Name {
            case_insensitive: true,
        },
        reverse,
    )
}

/// Folders, then files, then errors (reversed when `reverse`).
pub fn by_kind(tree: Folder, reverse: bool) -> Folder {
    sorted(tree, SortKey::Kind, reverse)
}
