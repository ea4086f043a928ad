//! File, error and generic node types.

use std::fmt;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, SubsecRound};
use compact_str::{CompactString, format_compact};
use serde::{Deserialize, Serialize};

use crate::error::{FaultKind, SnoopError};
use crate::tree::Folder;

/// Format used when printing timestamps.
pub(crate) const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metadata timestamps, truncated to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// Last modification time.
    pub modified: DateTime<Local>,
    /// Last access time (if available).
    pub accessed: Option<DateTime<Local>>,
    /// Creation time (if available, platform-dependent).
    pub created: Option<DateTime<Local>>,
}

impl Timestamps {
    /// Read timestamps from already fetched metadata.
    pub fn from_metadata(metadata: &Metadata) -> std::io::Result<Self> {
        Ok(Self {
            modified: to_seconds(metadata.modified()?),
            accessed: metadata.accessed().ok().map(to_seconds),
            created: metadata.created().ok().map(to_seconds),
        })
    }
}

fn to_seconds(time: SystemTime) -> DateTime<Local> {
    DateTime::<Local>::from(time).trunc_subsecs(0)
}

pub(crate) struct OptTime<'a>(pub &'a Option<DateTime<Local>>);

impl fmt::Display for OptTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(time) => write!(f, "{}", time.format(TIME_FORMAT)),
            None => f.write_str("-"),
        }
    }
}

/// Last path component, or the whole path when there is none (e.g. `/`).
pub(crate) fn name_of(path: &Path) -> CompactString {
    path.file_name()
        .map(|n| CompactString::from(n.to_string_lossy()))
        .unwrap_or_else(|| CompactString::from(path.to_string_lossy()))
}

/// Variant of a tree node.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NodeKind {
    Folder,
    File,
    Error,
}

/// Attributes shared by every node variant.
pub trait Entry {
    /// Display name of the entry.
    fn name(&self) -> &str;
    /// Path the entry was created from.
    fn path(&self) -> &Path;
    /// Whether the entry is hidden from rendering.
    fn is_hidden(&self) -> bool;
    /// Variant of the entry.
    fn kind(&self) -> NodeKind;
}

/// A regular file observed during a walk.
///
/// Size and timestamps are captured once at construction and never
/// refreshed, so a long-lived tree can go stale relative to the disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    path: PathBuf,
    name: CompactString,
    bytes: u64,
    timestamps: Timestamps,
    #[serde(default)]
    hidden: bool,
}

impl File {
    /// Stat `path` and snapshot its size and timestamps.
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
            bytes: metadata.len(),
            timestamps: Timestamps::from_metadata(metadata)?,
            hidden: false,
            path,
        })
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub fn unhide(&mut self) {
        self.hidden = false;
    }
}

impl Entry for File {
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
        NodeKind::File
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "File({}, bytes={}, created={}, accessed={}, modified={})",
            self.path.display(),
            self.bytes,
            OptTime(&self.timestamps.created),
            OptTime(&self.timestamps.accessed),
            self.timestamps.modified.format(TIME_FORMAT),
        )
    }
}

/// A failure captured while enumerating one directory.
///
/// Injected as a child of the folder whose listing failed. It is not a
/// filesystem entity: its name is the capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorNode {
    name: CompactString,
    path: PathBuf,
    fault: FaultKind,
    message: String,
    when: DateTime<Local>,
    #[serde(default)]
    hidden: bool,
}

impl ErrorNode {
    /// Capture `error` now.
    pub fn capture(error: &SnoopError) -> Self {
        let when = Local::now().trunc_subsecs(0);
        let (fault, message) = match error {
            SnoopError::Enumeration { source, .. } | SnoopError::Io { source, .. } => {
                (FaultKind::from_io(source), source.to_string())
            }
            other => (FaultKind::ReadError, other.to_string()),
        };
        Self {
            name: format_compact!("{}", when.format(TIME_FORMAT)),
            path: error.path().map(Path::to_path_buf).unwrap_or_default(),
            fault,
            message,
            when,
            hidden: false,
        }
    }

    pub fn fault(&self) -> FaultKind {
        self.fault
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn when(&self) -> DateTime<Local> {
        self.when
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub fn unhide(&mut self) {
        self.hidden = false;
    }
}

impl Entry for ErrorNode {
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
        NodeKind::Error
    }
}

impl fmt::Display for ErrorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error({}: {}) [{}]",
            self.path.display(),
            self.message,
            self.when.format(TIME_FORMAT)
        )
    }
}

/// One node of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Folder(Folder),
    File(File),
    Error(ErrorNode),
}

impl Node {
    /// Size in bytes; errors contribute nothing.
    pub fn bytes(&self) -> u64 {
        self.size().unwrap_or(0)
    }

    /// Size in bytes, `None` for errors which have no size.
    pub fn size(&self) -> Option<u64> {
        match self {
            Node::Folder(folder) => Some(folder.bytes()),
            Node::File(file) => Some(file.bytes()),
            Node::Error(_) => None,
        }
    }

    /// Timestamps, `None` for errors.
    pub fn timestamps(&self) -> Option<&Timestamps> {
        match self {
            Node::Folder(folder) => Some(folder.timestamps()),
            Node::File(file) => Some(file.timestamps()),
            Node::Error(_) => None,
        }
    }

    /// Hide the node; folders are hidden together with their subtree.
    pub fn hide(&mut self) {
        match self {
            Node::Folder(folder) => folder.hide(true),
            Node::File(file) => file.hide(),
            Node::Error(error) => error.hide(),
        }
    }

    /// Unhide the node; folders are unhidden together with their subtree.
    pub fn unhide(&mut self) {
        match self {
            Node::Folder(folder) => folder.unhide(true),
            Node::File(file) => file.unhide(),
            Node::Error(error) => error.unhide(),
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Node::Folder(folder) => Some(folder),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Node::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorNode> {
        match self {
            Node::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn into_folder(self) -> Option<Folder> {
        match self {
            Node::Folder(folder) => Some(folder),
            _ => None,
        }
    }

    pub fn into_file(self) -> Option<File> {
        match self {
            Node::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn into_error(self) -> Option<ErrorNode> {
        match self {
            Node::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Node::Error(_))
    }
}

impl Entry for Node {
    fn name(&self) -> &str {
        match self {
            Node::Folder(folder) => folder.name(),
            Node::File(file) => file.name(),
            Node::Error(error) => error.name(),
        }
    }

    fn path(&self) -> &Path {
        match self {
            Node::Folder(folder) => folder.path(),
            Node::File(file) => file.path(),
            Node::Error(error) => error.path(),
        }
    }

    fn is_hidden(&self) -> bool {
        match self {
            Node::Folder(folder) => folder.is_hidden(),
            Node::File(file) => file.is_hidden(),
            Node::Error(error) => error.is_hidden(),
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            Node::Folder(_) => NodeKind::Folder,
            Node::File(_) => NodeKind::File,
            Node::Error(_) => NodeKind::Error,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Folder(folder) => fmt::Display::fmt(folder, f),
            Node::File(file) => fmt::Display::fmt(file, f),
            Node::Error(error) => fmt::Display::fmt(error, f),
        }
    }
}

impl From<Folder> for Node {
    fn from(folder: Folder) -> Self {
        Node::Folder(folder)
    }
}

impl From<File> for Node {
    fn from(file: File) -> Self {
        Node::File(file)
    }
}

impl From<ErrorNode> for Node {
    fn from(error: ErrorNode) -> Self {
        Node::Error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_snapshot() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let file = File::from_path(&path).unwrap();
        assert_eq!(file.name(), "notes.txt");
        assert_eq!(file.bytes(), 5);
        assert_eq!(file.timestamps().modified.timestamp_subsec_nanos(), 0);

        // Size is not re-read after construction
        fs::write(&path, "hello world").unwrap();
        assert_eq!(file.bytes(), 5);
    }

    #[test]
    fn test_error_capture() {
        let err = SnoopError::enumeration(
            "/locked",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let node = ErrorNode::capture(&err);

        assert_eq!(node.fault(), FaultKind::PermissionDenied);
        assert_eq!(node.path(), Path::new("/locked"));
        assert_eq!(node.message(), "denied");
        assert_eq!(node.when().timestamp_subsec_nanos(), 0);
        assert_eq!(node.name(), node.when().format(TIME_FORMAT).to_string());
        assert!(node.to_string().starts_with("Error(/locked: denied)"));
    }

    #[test]
    fn test_node_kind_parse() {
        assert_eq!("folder".parse::<NodeKind>().unwrap(), NodeKind::Folder);
        assert_eq!("ERROR".parse::<NodeKind>().unwrap(), NodeKind::Error);
        assert_eq!(NodeKind::File.to_string(), "file");
        assert!("symlink".parse::<NodeKind>().is_err());
    }

    #[test]
    fn test_error_has_no_size() {
        let err = SnoopError::enumeration("/x", std::io::Error::other("boom"));
        let node = Node::from(ErrorNode::capture(&err));
        assert_eq!(node.size(), None);
        assert_eq!(node.bytes(), 0);
        assert!(node.timestamps().is_none());
        assert_eq!(node.kind(), NodeKind::Error);
    }
}
