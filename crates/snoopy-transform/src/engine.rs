//! Generic tree transform.

use snoopy_core::{ErrorNode, File, Folder, Node};

/// Rewrites a tree node by node.
///
/// Each callback receives the owned node and its depth (the root is at 0,
/// its children at 1) and returns the node to keep, possibly modified, or
/// `None` to drop it. All callbacks default to identity.
///
/// A folder's callback runs before its children are visited, so the
/// children seen afterwards are the ones the callback left in place.
pub trait Transform {
    fn visit_folder(&mut self, folder: Folder, _depth: usize) -> Option<Folder> {
        Some(folder)
    }

    fn visit_file(&mut self, file: File, _depth: usize) -> Option<File> {
        Some(file)
    }

    fn visit_error(&mut self, error: ErrorNode, _depth: usize) -> Option<ErrorNode> {
        Some(error)
    }

    /// Transform `tree` in place. `None` when the root itself is dropped.
    fn apply(&mut self, tree: Folder) -> Option<Folder>
    where
        Self: Sized,
    {
        let root = self.visit_folder(tree, 0)?;
        Some(visit_children(self, root, 1))
    }

    /// Transform a deep copy of `tree`, leaving the original untouched.
    fn apply_cloned(&mut self, tree: &Folder) -> Option<Folder>
    where
        Self: Sized,
    {
        self.apply(tree.clone())
    }
}

/// Visit the children of an already visited `folder`, which sit at `depth`.
///
/// Kept children replace the old list in one assignment.
pub fn visit_children<T>(transform: &mut T, mut folder: Folder, depth: usize) -> Folder
where
    T: Transform + ?Sized,
{
    let children = folder.take_children();
    let mut kept = Vec::with_capacity(children.len());

    for child in children {
        let visited = match child {
            Node::Folder(sub) => transform
                .visit_folder(sub, depth)
                .map(|sub| Node::Folder(visit_children(transform, sub, depth + 1))),
            Node::File(file) => transform.visit_file(file, depth).map(Node::File),
            Node::Error(error) => transform.visit_error(error, depth).map(Node::Error),
        };
        kept.extend(visited);
    }

    folder.set_children(kept);
    folder
}
