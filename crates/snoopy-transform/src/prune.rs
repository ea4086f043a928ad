//! Pruning policies.
//!
//! A rejected node is either hidden (kept, aggregates unchanged) or dropped
//! from its parent. Dropping changes the aggregates of every ancestor.

use std::sync::LazyLock;

use derive_builder::Builder;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use snoopy_core::units::{self, Unit};
use snoopy_core::{Entry, ErrorNode, File, Folder, Node, SnoopError};

use crate::engine::Transform;

/// Numeric node attribute a [`RejectByCompare`] looks at.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Attribute {
    Bytes,
    Files,
    DeepFiles,
    Folders,
    DeepFolders,
    Errors,
    DeepErrors,
    Created,
    LastAccess,
    LastModified,
}

impl Attribute {
    /// Attribute value; timestamps are unix seconds. `None` when the node
    /// has no such attribute.
    pub fn value(self, node: &Node) -> Option<f64> {
        let folder = node.as_folder();
        let times = node.timestamps();
        match self {
            Attribute::Bytes => node.size().map(|b| b as f64),
            Attribute::Files => folder.map(|f| f.files().count() as f64),
            Attribute::DeepFiles => folder.map(|f| f.deep_files().len() as f64),
            Attribute::Folders => folder.map(|f| f.folders().count() as f64),
            Attribute::DeepFolders => folder.map(|f| f.deep_folders().len() as f64),
            Attribute::Errors => folder.map(|f| f.errors().count() as f64),
            Attribute::DeepErrors => folder.map(|f| f.deep_errors().len() as f64),
            Attribute::Created => times.and_then(|t| t.created).map(|t| t.timestamp() as f64),
            Attribute::LastAccess => times.and_then(|t| t.accessed).map(|t| t.timestamp() as f64),
            Attribute::LastModified => times.map(|t| t.modified.timestamp() as f64),
        }
    }
}

/// Comparison operator, parsed from its symbol.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Cmp {
    #[strum(serialize = "==")]
    #[serde(rename = "==")]
    Eq,
    #[strum(serialize = "!=")]
    #[serde(rename = "!=")]
    Ne,
    #[strum(serialize = ">")]
    #[serde(rename = ">")]
    Gt,
    #[strum(serialize = ">=")]
    #[serde(rename = ">=")]
    Ge,
    #[strum(serialize = "<")]
    #[serde(rename = "<")]
    Lt,
    #[strum(serialize = "<=")]
    #[serde(rename = "<=")]
    Le,
}

impl Cmp {
    pub fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Cmp::Eq => lhs == rhs,
            Cmp::Ne => lhs != rhs,
            Cmp::Gt => lhs > rhs,
            Cmp::Ge => lhs >= rhs,
            Cmp::Lt => lhs < rhs,
            Cmp::Le => lhs <= rhs,
        }
    }
}

/// Which node variants a policy may reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targets {
    pub files: bool,
    pub folders: bool,
    pub errors: bool,
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            files: true,
            folders: true,
            errors: true,
        }
    }
}

/// Remembers whether the drop warning was already emitted for the current
/// application.
#[derive(Debug, Clone, Default)]
struct DropNotice {
    warned: bool,
}

impl DropNotice {
    fn reset(&mut self) {
        self.warned = false;
    }
}

/// Hide or drop `node` when `rejected`.
fn reject(
    mut node: Node,
    rejected: bool,
    hide_only: bool,
    notice: &mut DropNotice,
) -> Option<Node> {
    if !rejected {
        return Some(node);
    }
    if hide_only {
        node.hide();
        return Some(node);
    }
    if !notice.warned {
        warn!(
            path = %node.path().display(),
            "dropping nodes from the tree, folder sizes and counts change accordingly"
        );
        notice.warned = true;
    }
    None
}

/// Rejects nodes whose `attribute` compares true against `threshold`.
///
/// Nodes without the attribute always pass.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct RejectByCompare {
    pub attribute: Attribute,
    pub cmp: Cmp,
    pub threshold: f64,
    #[builder(default)]
    #[serde(default)]
    pub targets: Targets,
    #[builder(default = "false")]
    #[serde(default)]
    pub hide_only: bool,
    #[builder(setter(skip))]
    #[serde(skip)]
    notice: DropNotice,
}

impl RejectByCompare {
    pub fn builder() -> RejectByCompareBuilder {
        RejectByCompareBuilder::default()
    }

    fn rejects(&self, node: &Node) -> bool {
        self.attribute
            .value(node)
            .is_some_and(|value| self.cmp.holds(value, self.threshold))
    }

    fn process(&mut self, node: Node) -> Option<Node> {
        let rejected = self.rejects(&node);
        reject(node, rejected, self.hide_only, &mut self.notice)
    }
}

impl Transform for RejectByCompare {
    fn visit_folder(&mut self, folder: Folder, depth: usize) -> Option<Folder> {
        if depth == 0 {
            self.notice.reset();
        }
        if !self.targets.folders {
            return Some(folder);
        }
        self.process(Node::Folder(folder)).and_then(Node::into_folder)
    }

    fn visit_file(&mut self, file: File, _depth: usize) -> Option<File> {
        if !self.targets.files {
            return Some(file);
        }
        self.process(Node::File(file)).and_then(Node::into_file)
    }

    fn visit_error(&mut self, error: ErrorNode, _depth: usize) -> Option<ErrorNode> {
        if !self.targets.errors {
            return Some(error);
        }
        self.process(Node::Error(error)).and_then(Node::into_error)
    }
}

/// Rejects nodes matching an arbitrary predicate.
pub struct RejectBy<F> {
    predicate: F,
    targets: Targets,
    hide_only: bool,
    notice: DropNotice,
}

impl<F> RejectBy<F>
where
    F: Fn(&Node) -> bool,
{
    /// Drop every node the predicate matches.
    pub fn new(predicate: F) -> Self {
        Self {
            predicate,
            targets: Targets::default(),
            hide_only: false,
            notice: DropNotice::default(),
        }
    }

    /// Hide matches instead of dropping them.
    pub fn hide_only(mut self, hide_only: bool) -> Self {
        self.hide_only = hide_only;
        self
    }

    pub fn targets(mut self, targets: Targets) -> Self {
        self.targets = targets;
        self
    }

    fn process(&mut self, node: Node) -> Option<Node> {
        let rejected = (self.predicate)(&node);
        reject(node, rejected, self.hide_only, &mut self.notice)
    }
}

impl<F> Transform for RejectBy<F>
where
    F: Fn(&Node) -> bool,
{
    fn visit_folder(&mut self, folder: Folder, depth: usize) -> Option<Folder> {
        if depth == 0 {
            self.notice.reset();
        }
        if !self.targets.folders {
            return Some(folder);
        }
        self.process(Node::Folder(folder)).and_then(Node::into_folder)
    }

    fn visit_file(&mut self, file: File, _depth: usize) -> Option<File> {
        if !self.targets.files {
            return Some(file);
        }
        self.process(Node::File(file)).and_then(Node::into_file)
    }

    fn visit_error(&mut self, error: ErrorNode, _depth: usize) -> Option<ErrorNode> {
        if !self.targets.errors {
            return Some(error);
        }
        self.process(Node::Error(error)).and_then(Node::into_error)
    }
}

/// Options for the size helpers. Errors have no size and are never targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneOptions {
    pub files: bool,
    pub folders: bool,
    pub hide_only: bool,
}

impl Default for PruneOptions {
    fn default() -> Self {
        Self {
            files: true,
            folders: true,
            hide_only: false,
        }
    }
}

/// Reject files and folders whose size compares true against `value unit`.
///
/// `None` when the root itself is dropped.
pub fn by_size(
    tree: Folder,
    cmp: Cmp,
    value: f64,
    unit: Unit,
    options: PruneOptions,
) -> Option<Folder> {
    RejectByCompare {
        attribute: Attribute::Bytes,
        cmp,
        threshold: units::to_bytes(value, unit),
        targets: Targets {
            files: options.files,
            folders: options.folders,
            errors: false,
        },
        hide_only: options.hide_only,
        notice: DropNotice::default(),
    }
    .apply(tree)
}

static SIZE_EXPR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(==|!=|>=|<=|>|<)\s*(\d+(?:\.\d+)?)\s*([A-Za-z]+)?\s*$")
        .expect("SIZE_EXPR regex is invalid")
});

/// A parsed size comparison such as `< 10 KB`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeExpr {
    pub cmp: Cmp,
    pub value: f64,
    pub unit: Unit,
}

impl std::str::FromStr for SizeExpr {
    type Err = SnoopError;

    /// The unit is optional and defaults to bytes.
    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let caps = SIZE_EXPR
            .captures(expr)
            .ok_or_else(|| SnoopError::parse(expr, "expected `<op> <number> [unit]`, e.g. `< 10 KB`"))?;

        let cmp = caps[1]
            .parse::<Cmp>()
            .map_err(|e| SnoopError::parse(expr, e.to_string()))?;
        let value = caps[2]
            .parse::<f64>()
            .map_err(|e| SnoopError::parse(expr, e.to_string()))?;
        let unit = match caps.get(3) {
            Some(unit) => unit
                .as_str()
                .parse::<Unit>()
                .map_err(|_| SnoopError::parse(expr, format!("unknown unit {:?}", unit.as_str())))?,
            None => Unit::B,
        };

        Ok(Self { cmp, value, unit })
    }
}

/// Parse `expr` (e.g. `"< 10 KB"`) and prune by size.
///
/// Fails before touching the tree when the expression does not parse.
pub fn by_size_expr(
    tree: Folder,
    expr: &str,
    options: PruneOptions,
) -> Result<Option<Folder>, SnoopError> {
    let SizeExpr { cmp, value, unit } = expr.parse()?;
    Ok(by_size(tree, cmp, value, unit, options))
}
