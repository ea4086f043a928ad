//! Walk-time ignore filters.
//!
//! A filter returning `true` keeps the entry out of the tree; for folders
//! the walker never descends into an ignored folder.

use compact_str::CompactString;
use globset::{Glob, GlobSet, GlobSetBuilder};

use snoopy_core::{Entry, SnoopError};

/// Decides whether an entry is left out of the tree.
pub trait Filter<T: ?Sized>: Send + Sync {
    /// `true` to ignore `item`.
    fn ignores(&self, item: &T) -> bool;
}

impl<T: ?Sized, F> Filter<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn ignores(&self, item: &T) -> bool {
        self(item)
    }
}

/// Ignores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl<T: ?Sized> Filter<T> for Never {
    fn ignores(&self, _item: &T) -> bool {
        false
    }
}

/// Ignores entries whose name is in the list.
#[derive(Debug, Clone, Default)]
pub struct Names {
    names: Vec<CompactString>,
}

impl Names {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names.into_iter().map(|n| CompactString::from(n.as_ref())).collect(),
        }
    }
}

impl<T: Entry + ?Sized> Filter<T> for Names {
    fn ignores(&self, item: &T) -> bool {
        self.names.iter().any(|n| n.as_str() == item.name())
    }
}

/// Ignores entries whose name matches any glob pattern.
#[derive(Debug, Clone)]
pub struct Patterns {
    set: GlobSet,
}

impl Patterns {
    /// Compile `patterns`, failing on the first invalid one.
    pub fn new<I, S>(patterns: I) -> Result<Self, SnoopError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = Glob::new(pattern).map_err(|e| SnoopError::parse(pattern, e.to_string()))?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|e| SnoopError::InvalidConfig {
            message: e.to_string(),
        })?;
        Ok(Self { set })
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

impl<T: Entry + ?Sized> Filter<T> for Patterns {
    fn ignores(&self, item: &T) -> bool {
        self.set.is_match(item.name())
    }
}

/// Ignores entries whose name starts with a dot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dotfiles;

impl<T: Entry + ?Sized> Filter<T> for Dotfiles {
    fn ignores(&self, item: &T) -> bool {
        item.name().starts_with('.')
    }
}

/// Ignores an entry when any member filter ignores it.
pub struct AnyOf<T: ?Sized> {
    filters: Vec<Box<dyn Filter<T>>>,
}

impl<T: ?Sized> AnyOf<T> {
    pub fn new() -> Self {
        Self { filters: Vec::new() }
    }

    /// Add a filter to the chain.
    pub fn with(mut self, filter: impl Filter<T> + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl<T: ?Sized> Default for AnyOf<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Filter<T> for AnyOf<T> {
    fn ignores(&self, item: &T) -> bool {
        self.filters.iter().any(|f| f.ignores(item))
    }
}

/// Inverts a filter: ignores exactly what the inner filter keeps.
#[derive(Debug, Clone, Copy)]
pub struct Not<F>(pub F);

impl<T: ?Sized, F: Filter<T>> Filter<T> for Not<F> {
    fn ignores(&self, item: &T) -> bool {
        !self.0.ignores(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snoopy_core::{File, Folder};
    use std::fs;
    use tempfile::TempDir;

    fn entries() -> (TempDir, Folder, File, File) {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("__pycache__")).unwrap();
        fs::write(temp.path().join(".env"), "x").unwrap();
        fs::write(temp.path().join("debug.log"), "x").unwrap();

        let folder = Folder::from_path(temp.path().join("__pycache__")).unwrap();
        let dotfile = File::from_path(temp.path().join(".env")).unwrap();
        let log = File::from_path(temp.path().join("debug.log")).unwrap();
        (temp, folder, dotfile, log)
    }

    #[test]
    fn test_names() {
        let (_temp, folder, dotfile, _log) = entries();
        let filter = Names::new(["__pycache__", ".venv"]);

        assert!(filter.ignores(&folder));
        assert!(!filter.ignores(&dotfile));
    }

    #[test]
    fn test_patterns() {
        let (_temp, folder, dotfile, log) = entries();
        let filter = Patterns::new(["*.log", "__*__"]).unwrap();

        assert!(filter.ignores(&log));
        assert!(filter.ignores(&folder));
        assert!(!filter.ignores(&dotfile));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Patterns::new(["a[b"]).unwrap_err();
        assert!(matches!(err, SnoopError::Parse { .. }));
    }

    #[test]
    fn test_dotfiles_and_not() {
        let (_temp, _folder, dotfile, log) = entries();

        assert!(Dotfiles.ignores(&dotfile));
        assert!(!Dotfiles.ignores(&log));
        assert!(Not(Dotfiles).ignores(&log));
    }

    #[test]
    fn test_any_of_chain() {
        let (_temp, _folder, dotfile, log) = entries();
        let filter: AnyOf<File> = AnyOf::new()
            .with(Dotfiles)
            .with(|file: &File| file.bytes() > 100);

        assert_eq!(filter.len(), 2);
        assert!(filter.ignores(&dotfile));
        assert!(!filter.ignores(&log));
        assert!(!AnyOf::<File>::new().ignores(&log));
        assert!(!Never.ignores(&log));
    }
}
