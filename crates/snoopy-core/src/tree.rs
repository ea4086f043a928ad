//! Folder node, derived aggregates and traversal.

use std::fmt;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::node::{Entry, ErrorNode, File, Node, NodeKind, OptTime, TIME_FORMAT, Timestamps, name_of};

/// A directory observed during a walk, owning its children in order.
///
/// Children keep directory enumeration order until a transform reorders
/// them. Aggregates (`bytes`, `deep_files`, ...) are computed from the
/// current children on every call and are never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    path: PathBuf,
    name: CompactString,
    timestamps: Timestamps,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    children: Vec<Node>,
}

impl Folder {
    /// Stat `path` and create an empty folder for it.
    pub fn from_path(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let metadata = std::fs::metadata(&path)?;
        Self::from_metadata(path, &metadata)
    }

    /// Build from metadata already read for `path`.
    pub fn from_metadata(path: impl Into<PathBuf>, metadata: &Metadata) -> std::io::Result<Self> {
        let path = path.into();
        Ok(Self {
            name: name_of(&path),
            timestamps: Timestamps::from_metadata(metadata)?,
            hidden: false,
            children: Vec::new(),
            path,
        })
    }

    pub fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    /// Direct children in order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Mutable access to the child sequence.
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Append a child.
    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Detach and return all children, leaving the folder empty.
    pub fn take_children(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
    }

    /// Replace the whole child sequence.
    pub fn set_children(&mut self, children: Vec<Node>) {
        self.children = children;
    }

    /// Total size of all files below this folder.
    pub fn bytes(&self) -> u64 {
        self.traverse().filter_map(Node::as_file).map(File::bytes).sum()
    }

    /// Direct file children.
    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.children.iter().filter_map(Node::as_file)
    }

    /// Direct folder children.
    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.children.iter().filter_map(Node::as_folder)
    }

    /// Direct error children.
    pub fn errors(&self) -> impl Iterator<Item = &ErrorNode> {
        self.children.iter().filter_map(Node::as_error)
    }

    /// Direct files followed by every subfolder's deep files.
    pub fn deep_files(&self) -> Vec<&File> {
        let mut out: Vec<&File> = self.files().collect();
        for folder in self.folders() {
            out.extend(folder.deep_files());
        }
        out
    }

    /// Direct folders followed by every subfolder's deep folders.
    pub fn deep_folders(&self) -> Vec<&Folder> {
        let mut out: Vec<&Folder> = self.folders().collect();
        for folder in self.folders() {
            out.extend(folder.deep_folders());
        }
        out
    }

    /// Direct errors followed by every subfolder's deep errors.
    pub fn deep_errors(&self) -> Vec<&ErrorNode> {
        let mut out: Vec<&ErrorNode> = self.errors().collect();
        for folder in self.folders() {
            out.extend(folder.deep_errors());
        }
        out
    }

    /// Hide this folder, and with `deep` every descendant.
    pub fn hide(&mut self, deep: bool) {
        self.set_hidden(true, deep);
    }

    /// Unhide this folder, and with `deep` every descendant.
    pub fn unhide(&mut self, deep: bool) {
        self.set_hidden(false, deep);
    }

    fn set_hidden(&mut self, hidden: bool, deep: bool) {
        self.hidden = hidden;
        if !deep {
            return;
        }

        let mut stack: Vec<&mut Node> = self.children.iter_mut().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Folder(folder) => {
                    folder.hidden = hidden;
                    stack.extend(folder.children.iter_mut());
                }
                Node::File(file) if hidden => file.hide(),
                Node::File(file) => file.unhide(),
                Node::Error(error) if hidden => error.hide(),
                Node::Error(error) => error.unhide(),
            }
        }
    }

    /// Depth-first iterator over all descendants, parents before children.
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Depth-first iterator over all descendants, children before parents.
    pub fn traverse_post(&self) -> TraversePost<'_> {
        TraversePost {
            stack: self.children.iter().rev().map(|n| (n, false)).collect(),
        }
    }
}

impl Entry for Folder {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Folder
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Folder({}, bytes={}, files=({}/{}), folders=({}/{}), created={}, accessed={}, modified={}, errors=({}/{}))",
            self.path.display(),
            self.bytes(),
            self.files().count(),
            self.deep_files().len(),
            self.folders().count(),
            self.deep_folders().len(),
            OptTime(&self.timestamps.created),
            OptTime(&self.timestamps.accessed),
            self.timestamps.modified.format(TIME_FORMAT),
            self.errors().count(),
            self.deep_errors().len(),
        )
    }
}

/// Pre-order iterator returned by [`Folder::traverse`].
pub struct Traverse<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Node::Folder(folder) = node {
            self.stack.extend(folder.children.iter().rev());
        }
        Some(node)
    }
}

/// Post-order iterator returned by [`Folder::traverse_post`].
pub struct TraversePost<'a> {
    stack: Vec<(&'a Node, bool)>,
}

impl<'a> Iterator for TraversePost<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, expanded) = self.stack.pop()?;
            match node {
                Node::Folder(folder) if !expanded => {
                    self.stack.push((node, true));
                    self.stack
                        .extend(folder.children.iter().rev().map(|n| (n, false)));
                }
                _ => return Some(node),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample() -> (TempDir, Folder) {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("a.txt"), "12345").unwrap();
        fs::write(root.join("sub/b.txt"), "123").unwrap();

        let mut sub = Folder::from_path(root.join("sub")).unwrap();
        sub.push(File::from_path(root.join("sub/b.txt")).unwrap());

        let mut folder = Folder::from_path(root).unwrap();
        folder.push(File::from_path(root.join("a.txt")).unwrap());
        folder.push(sub);
        (temp, folder)
    }

    #[test]
    fn test_bytes_are_recursive() {
        let (_temp, folder) = sample();
        assert_eq!(folder.bytes(), 8);
        assert_eq!(folder.folders().next().unwrap().bytes(), 3);
    }

    #[test]
    fn test_traverse_orders() {
        let (_temp, folder) = sample();

        let pre: Vec<&str> = folder.traverse().map(|n| n.name()).collect();
        assert_eq!(pre, vec!["a.txt", "sub", "b.txt"]);

        let post: Vec<&str> = folder.traverse_post().map(|n| n.name()).collect();
        assert_eq!(post, vec!["a.txt", "b.txt", "sub"]);
    }

    #[test]
    fn test_shallow_hide() {
        let (_temp, mut folder) = sample();
        folder.hide(false);

        assert!(folder.is_hidden());
        assert!(folder.traverse().all(|n| !n.is_hidden()));
    }

    #[test]
    fn test_root_name_falls_back_to_path() {
        let folder = Folder::from_path("/").unwrap();
        assert_eq!(folder.name(), "/");
    }
}
