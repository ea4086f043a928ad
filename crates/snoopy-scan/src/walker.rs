//! Recursive directory walker.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use snoopy_core::{Entry, ErrorNode, File, Folder, SnoopError, WalkConfig};

use crate::filter::{Dotfiles, Filter, Never, Patterns};
use crate::progress::WalkProgress;

const TARGET: &str = "snoopy::walk";

/// Builds a [`Folder`] tree from a directory on disk.
///
/// The three ignore filters are consulted as entries are discovered; an
/// ignored folder is never descended into.
pub struct Walker {
    ignore_folder: Box<dyn Filter<Folder>>,
    ignore_file: Box<dyn Filter<File>>,
    ignore_error: Box<dyn Filter<ErrorNode>>,
    progress: Arc<WalkProgress>,
}

/// Per-walk state derived from the config.
struct WalkContext<'a> {
    config: &'a WalkConfig,
    patterns: Patterns,
}

impl WalkContext<'_> {
    fn ignores<T: Entry>(&self, entry: &T) -> bool {
        (self.config.skip_dotfiles && Dotfiles.ignores(entry)) || self.patterns.ignores(entry)
    }
}

impl Walker {
    /// Create a walker that ignores nothing.
    pub fn new() -> Self {
        Self {
            ignore_folder: Box::new(Never),
            ignore_file: Box::new(Never),
            ignore_error: Box::new(Never),
            progress: Arc::new(WalkProgress::new()),
        }
    }

    /// Leave out folders (and their subtrees) the filter ignores.
    pub fn ignore_folder(mut self, filter: impl Filter<Folder> + 'static) -> Self {
        self.ignore_folder = Box::new(filter);
        self
    }

    /// Leave out files the filter ignores.
    pub fn ignore_file(mut self, filter: impl Filter<File> + 'static) -> Self {
        self.ignore_file = Box::new(filter);
        self
    }

    /// Leave out captured errors the filter ignores.
    pub fn ignore_error(mut self, filter: impl Filter<ErrorNode> + 'static) -> Self {
        self.ignore_error = Box::new(filter);
        self
    }

    /// Shared counters updated while a walk runs.
    pub fn progress(&self) -> Arc<WalkProgress> {
        Arc::clone(&self.progress)
    }

    /// Walk `config.root` and return the tree rooted there.
    pub fn walk(&self, config: &WalkConfig) -> Result<Folder, SnoopError> {
        let root = std::path::absolute(&config.root).map_err(|_| SnoopError::InvalidPath {
            path: config.root.clone(),
        })?;
        let metadata = match fs::metadata(&root) {
            Ok(metadata) if metadata.is_dir() => metadata,
            _ => return Err(SnoopError::InvalidPath { path: root }),
        };

        let cx = WalkContext {
            config,
            patterns: Patterns::new(&config.ignore_patterns)?,
        };

        self.progress.reset();
        let mut tree =
            Folder::from_metadata(&root, &metadata).map_err(|e| SnoopError::enumeration(&root, e))?;
        self.scan(&mut tree, &cx)?;
        Ok(tree)
    }

    /// Fill `folder` with its children, handling its own enumeration failure.
    fn scan(&self, folder: &mut Folder, cx: &WalkContext<'_>) -> Result<(), SnoopError> {
        self.progress.record_folder();

        match self.scan_entries(folder, cx) {
            Ok(()) => {}
            Err(err) if !cx.config.continues_on_error() => return Err(err),
            Err(err) => {
                self.progress.record_error();
                let node = ErrorNode::capture(&err);
                if cx.config.verbosity >= 1 {
                    warn!(target: TARGET, path = %folder.path().display(), "{}", node.message());
                }
                if !self.ignore_error.ignores(&node) {
                    folder.push(node);
                }
            }
        }

        if cx.config.verbosity >= 1 {
            info!(
                target: TARGET,
                path = %folder.path().display(),
                files = folder.files().count(),
                folders = folder.folders().count(),
                errors = folder.errors().count(),
                "scanned folder"
            );
        }
        Ok(())
    }

    /// Enumerate one directory. The first failure stops this directory only.
    fn scan_entries(&self, folder: &mut Folder, cx: &WalkContext<'_>) -> Result<(), SnoopError> {
        let dir = folder.path().to_path_buf();
        let entries = fs::read_dir(&dir).map_err(|e| SnoopError::enumeration(&dir, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| SnoopError::enumeration(&dir, e))?;
            let path = entry.path();
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                // Entry removed since listing
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                // Broken symlink: dangling, looping or through a non-directory
                Err(_) if entry.file_type().is_ok_and(|t| t.is_symlink()) => continue,
                Err(e) => return Err(SnoopError::enumeration(&dir, e)),
            };

            if metadata.is_dir() {
                let mut sub = Folder::from_metadata(&path, &metadata)
                    .map_err(|e| SnoopError::enumeration(&dir, e))?;
                if cx.ignores(&sub) || self.ignore_folder.ignores(&sub) {
                    continue;
                }
                self.scan(&mut sub, cx)?;
                folder.push(sub);
            } else if metadata.is_file() {
                let file = File::from_metadata(&path, &metadata)
                    .map_err(|e| SnoopError::enumeration(&dir, e))?;
                self.progress.record_file(file.bytes());
                if cx.ignores(&file) || self.ignore_file.ignores(&file) {
                    continue;
                }
                if cx.config.verbosity >= 2 {
                    debug!(target: TARGET, path = %path.display(), bytes = file.bytes(), "file");
                }
                folder.push(file);
            }
        }
        Ok(())
    }
}

impl Default for Walker {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk `root` with default settings.
pub fn walk(root: impl AsRef<Path>) -> Result<Folder, SnoopError> {
    Walker::new().walk(&WalkConfig::new(root.as_ref()))
}
