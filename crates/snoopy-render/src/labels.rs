//! Per-kind line labels.

use std::fmt;

use snoopy_core::units::{Converter, Unit};
use snoopy_core::{Entry, File, Folder};

/// Turns one item into the text of its line.
pub trait Label<T: ?Sized> {
    fn label(&self, item: &T) -> String;
}

impl<T: ?Sized, F> Label<T> for F
where
    F: Fn(&T) -> String,
{
    fn label(&self, item: &T) -> String {
        self(item)
    }
}

/// Format a byte size in human-readable form.
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// The item's full single-line description.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detailed;

impl<T: fmt::Display + ?Sized> Label<T> for Detailed {
    fn label(&self, item: &T) -> String {
        item.to_string()
    }
}

/// The item's name, or its full path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameOnly {
    pub include_path: bool,
}

impl<T: Entry + ?Sized> Label<T> for NameOnly {
    fn label(&self, item: &T) -> String {
        if self.include_path {
            item.path().display().to_string()
        } else {
            item.name().to_string()
        }
    }
}

/// `name(KB=1.50)`: name and size in a fixed unit, two decimals.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeOnly {
    pub unit: Unit,
}

impl SizeOnly {
    fn format(&self, name: &str, bytes: u64) -> String {
        let value = Converter::new(Unit::B, self.unit).convert(bytes as f64);
        format!("{name}({}={value:.2})", self.unit)
    }
}

impl Label<Folder> for SizeOnly {
    fn label(&self, folder: &Folder) -> String {
        self.format(folder.name(), folder.bytes())
    }
}

impl Label<File> for SizeOnly {
    fn label(&self, file: &File) -> String {
        self.format(file.name(), file.bytes())
    }
}

/// `name (1.5 KiB)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanSize;

impl Label<Folder> for HumanSize {
    fn label(&self, folder: &Folder) -> String {
        format!("{} ({})", folder.name(), format_size(folder.bytes()))
    }
}

impl Label<File> for HumanSize {
    fn label(&self, file: &File) -> String {
        format!("{} ({})", file.name(), format_size(file.bytes()))
    }
}

/// `name(files=3)`, direct or deep count.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumFilesOnly {
    pub deep: bool,
}

impl Label<Folder> for NumFilesOnly {
    fn label(&self, folder: &Folder) -> String {
        let files = if self.deep {
            folder.deep_files().len()
        } else {
            folder.files().count()
        };
        format!("{}(files={files})", folder.name())
    }
}
