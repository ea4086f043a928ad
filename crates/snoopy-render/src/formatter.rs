//! Indented text rendering of a tree.

use std::fmt;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use snoopy_core::{Entry, ErrorNode, File, Folder, Node, NodeKind};

use crate::labels::{Detailed, Label};

pub const FOLDER_PREFIX: &str = "📁 ";
pub const FILE_PREFIX: &str = "📄 ";
pub const ERROR_PREFIX: &str = "🤬 ";

/// What the formatter shows. `None` limits are unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct RenderOptions {
    /// Deepest level whose children are still listed; the root is level 0.
    #[builder(default)]
    pub max_depth: Option<usize>,

    /// Files listed per folder.
    #[builder(default)]
    pub max_files: Option<usize>,

    /// Subfolders listed per folder.
    #[builder(default)]
    pub max_folders: Option<usize>,

    /// Errors listed per folder.
    #[builder(default)]
    pub max_errors: Option<usize>,

    /// Children of any kind listed per folder.
    #[builder(default)]
    pub max_items: Option<usize>,

    /// Repeated once per level.
    #[builder(default = "\" │ \".to_string()")]
    pub indent: String,

    /// Written at the start of every line.
    #[builder(default)]
    pub init_prefix: String,

    /// Render hidden nodes too.
    #[builder(default = "false")]
    pub show_hidden: bool,

    /// Summarize children that were not listed.
    #[builder(default = "true")]
    pub show_remaining: bool,
}

impl RenderOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        for (field, value) in [("indent", &self.indent), ("init_prefix", &self.init_prefix)] {
            if value.as_ref().is_some_and(|v| v.contains('\n')) {
                return Err(format!("{field} must not contain a line break"));
            }
        }
        Ok(())
    }
}

impl RenderOptions {
    pub fn builder() -> RenderOptionsBuilder {
        RenderOptionsBuilder::default()
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            max_files: None,
            max_folders: None,
            max_errors: None,
            max_items: None,
            indent: " │ ".to_string(),
            init_prefix: String::new(),
            show_hidden: false,
            show_remaining: true,
        }
    }
}

/// Children of one folder that were neither listed nor hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Remaining {
    pub folders: usize,
    pub files: usize,
    pub errors: usize,
}

impl Remaining {
    pub fn is_empty(&self) -> bool {
        self.folders == 0 && self.files == 0 && self.errors == 0
    }

    fn slot(&mut self, kind: NodeKind) -> &mut usize {
        match kind {
            NodeKind::Folder => &mut self.folders,
            NodeKind::File => &mut self.files,
            NodeKind::Error => &mut self.errors,
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "✂️  [Folders: {} | Files: {} | Errors: {}]",
            self.folders, self.files, self.errors
        )
    }
}

/// Renders a [`Folder`] as one line per node.
///
/// Each line is `init_prefix + indent * depth + prefix + label`. Labels and
/// prefixes are configurable per kind.
pub struct Formatter {
    options: RenderOptions,
    folder_label: Box<dyn Label<Folder>>,
    file_label: Box<dyn Label<File>>,
    error_label: Box<dyn Label<ErrorNode>>,
    folder_prefix: Box<dyn Label<Folder>>,
    file_prefix: Box<dyn Label<File>>,
    error_prefix: Box<dyn Label<ErrorNode>>,
    remaining_label: Box<dyn Label<Remaining>>,
}

impl Formatter {
    /// Detailed labels with the default prefixes.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            folder_label: Box::new(Detailed),
            file_label: Box::new(Detailed),
            error_label: Box::new(Detailed),
            folder_prefix: Box::new(|_: &Folder| FOLDER_PREFIX.to_string()),
            file_prefix: Box::new(|_: &File| FILE_PREFIX.to_string()),
            error_prefix: Box::new(|_: &ErrorNode| ERROR_PREFIX.to_string()),
            remaining_label: Box::new(Detailed),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn folder_label(mut self, label: impl Label<Folder> + 'static) -> Self {
        self.folder_label = Box::new(label);
        self
    }

    pub fn file_label(mut self, label: impl Label<File> + 'static) -> Self {
        self.file_label = Box::new(label);
        self
    }

    pub fn error_label(mut self, label: impl Label<ErrorNode> + 'static) -> Self {
        self.error_label = Box::new(label);
        self
    }

    pub fn folder_prefix(mut self, prefix: impl Label<Folder> + 'static) -> Self {
        self.folder_prefix = Box::new(prefix);
        self
    }

    pub fn file_prefix(mut self, prefix: impl Label<File> + 'static) -> Self {
        self.file_prefix = Box::new(prefix);
        self
    }

    pub fn error_prefix(mut self, prefix: impl Label<ErrorNode> + 'static) -> Self {
        self.error_prefix = Box::new(prefix);
        self
    }

    pub fn remaining_label(mut self, label: impl Label<Remaining> + 'static) -> Self {
        self.remaining_label = Box::new(label);
        self
    }

    /// Render `tree`. Every line, the last included, ends with `\n`.
    pub fn render(&self, tree: &Folder) -> String {
        let mut out = String::new();
        self.render_folder(&mut out, tree, 0);
        out
    }

    fn render_folder(&self, out: &mut String, folder: &Folder, depth: usize) {
        self.line(out, depth, &self.folder_prefix.label(folder), &self.folder_label.label(folder));

        if self.options.max_depth.is_some_and(|max| depth >= max) {
            return;
        }

        let depth = depth + 1;
        let mut rendered = Remaining::default();
        let mut suppressed = Remaining::default();
        let mut total = Remaining::default();
        let mut listed = 0usize;

        for child in folder.children() {
            let kind = child.kind();
            *total.slot(kind) += 1;

            if child.is_hidden() && !self.options.show_hidden {
                *suppressed.slot(kind) += 1;
                continue;
            }
            if self.options.max_items.is_some_and(|max| listed >= max) {
                continue;
            }
            if self.cap(kind).is_some_and(|max| *rendered.slot(kind) >= max) {
                continue;
            }

            *rendered.slot(kind) += 1;
            listed += 1;

            match child {
                Node::Folder(sub) => self.render_folder(out, sub, depth),
                Node::File(file) => {
                    self.line(out, depth, &self.file_prefix.label(file), &self.file_label.label(file))
                }
                Node::Error(error) => self.line(
                    out,
                    depth,
                    &self.error_prefix.label(error),
                    &self.error_label.label(error),
                ),
            }
        }

        if self.options.show_remaining {
            let remaining = Remaining {
                folders: total.folders - rendered.folders - suppressed.folders,
                files: total.files - rendered.files - suppressed.files,
                errors: total.errors - rendered.errors - suppressed.errors,
            };
            if !remaining.is_empty() {
                self.line(out, depth, "", &self.remaining_label.label(&remaining));
            }
        }
    }

    fn cap(&self, kind: NodeKind) -> Option<usize> {
        match kind {
            NodeKind::Folder => self.options.max_folders,
            NodeKind::File => self.options.max_files,
            NodeKind::Error => self.options.max_errors,
        }
    }

    fn line(&self, out: &mut String, depth: usize, prefix: &str, label: &str) {
        out.push_str(&self.options.init_prefix);
        for _ in 0..depth {
            out.push_str(&self.options.indent);
        }
        out.push_str(prefix);
        out.push_str(label);
        out.push('\n');
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::NameOnly;
    use std::fs;
    use tempfile::TempDir;

    /// root/ f0..f4 (5 files), sub/ (inner.txt)
    fn create_tree() -> (TempDir, Folder) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("root");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("sub/inner.txt"), "x").unwrap();

        let mut sub = Folder::from_path(root.join("sub")).unwrap();
        sub.push(File::from_path(root.join("sub/inner.txt")).unwrap());

        let mut tree = Folder::from_path(&root).unwrap();
        for i in 0..5 {
            let path = root.join(format!("f{i}"));
            fs::write(&path, "data").unwrap();
            tree.push(File::from_path(path).unwrap());
        }
        tree.push(sub);
        (temp, tree)
    }

    fn names_formatter(options: RenderOptions) -> Formatter {
        Formatter::new(options)
            .folder_label(NameOnly::default())
            .file_label(NameOnly::default())
            .folder_prefix(|_: &Folder| "D ".to_string())
            .file_prefix(|_: &File| "F ".to_string())
    }

    #[test]
    fn test_full_render() {
        let (_temp, tree) = create_tree();
        let text = names_formatter(RenderOptions::default()).render(&tree);

        assert_eq!(
            text,
            "D root\n │ F f0\n │ F f1\n │ F f2\n │ F f3\n │ F f4\n │ D sub\n │  │ F inner.txt\n"
        );
    }

    #[test]
    fn test_max_files_and_remaining() {
        let (_temp, tree) = create_tree();
        let options = RenderOptions::builder()
            .max_files(2usize)
            .indent("  ")
            .build()
            .unwrap();
        let text = names_formatter(options).render(&tree);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "D root",
                "  F f0",
                "  F f1",
                "  D sub",
                "    F inner.txt",
                "  ✂️  [Folders: 0 | Files: 3 | Errors: 0]",
            ]
        );
    }

    #[test]
    fn test_hidden_not_counted_as_remaining() {
        let (_temp, mut tree) = create_tree();
        for child in tree.children_mut().iter_mut().take(2) {
            child.hide();
        }
        let options = RenderOptions::builder()
            .max_files(2usize)
            .indent("  ")
            .build()
            .unwrap();
        let formatter = names_formatter(options);

        let text = formatter.render(&tree);
        assert!(!text.contains("F f0"));
        assert!(text.contains("F f2\n  F f3\n"));
        assert!(text.contains("Files: 1 |"));

        let shown = names_formatter(RenderOptions {
            show_hidden: true,
            max_files: Some(2),
            ..Default::default()
        })
        .render(&tree);
        assert!(shown.contains("F f0"));
        assert!(shown.contains("Files: 3 |"));
    }

    #[test]
    fn test_max_depth() {
        let (_temp, tree) = create_tree();

        let root_only = names_formatter(RenderOptions {
            max_depth: Some(0),
            ..Default::default()
        })
        .render(&tree);
        assert_eq!(root_only, "D root\n");

        let one = names_formatter(RenderOptions {
            max_depth: Some(1),
            ..Default::default()
        })
        .render(&tree);
        assert!(one.contains("D sub\n"));
        assert!(!one.contains("inner.txt"));
    }

    #[test]
    fn test_max_items_and_no_remaining() {
        let (_temp, tree) = create_tree();
        let options = RenderOptions {
            max_items: Some(3),
            show_remaining: false,
            init_prefix: "> ".to_string(),
            ..Default::default()
        };

        let text = names_formatter(options).render(&tree);
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().all(|line| line.starts_with("> ")));
        assert!(!text.contains("✂️"));
    }

    #[test]
    fn test_remaining_display() {
        let remaining = Remaining {
            folders: 1,
            files: 2,
            errors: 0,
        };
        assert_eq!(remaining.to_string(), "✂️  [Folders: 1 | Files: 2 | Errors: 0]");
        assert!(Remaining::default().is_empty());
    }

    #[test]
    fn test_options_builder() {
        let options = RenderOptions::builder().build().unwrap();
        assert_eq!(options, RenderOptions::default());

        assert!(RenderOptions::builder().indent("a\nb").build().is_err());

        let options: RenderOptions = serde_json::from_str(r#"{"max_files": 4}"#).unwrap();
        assert_eq!(options.max_files, Some(4));
        assert_eq!(options.indent, " │ ");
        assert!(options.show_remaining);
    }
}
