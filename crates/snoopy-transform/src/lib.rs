//! Tree transforms for snoopy.
//!
//! This crate rewrites trees produced by the walker:
//!
//! - **Transform engine** - a [`Transform`] visits every node with its depth
//!   and keeps, rewrites or drops it
//! - **Sorting** - stable per-folder ordering by size, time, counts, name or kind
//! - **Pruning** - hide or drop nodes by attribute comparison or predicate
//!
//! # Sorting
//!
//! ```rust,no_run
//! use snoopy_scan::{WalkConfig, Walker};
//! use snoopy_transform::sort;
//!
//! let tree = Walker::new().walk(&WalkConfig::new("/path/to/walk")).unwrap();
//! let tree = sort::by_size(tree, true);
//! ```
//!
//! # Pruning
//!
//! Hiding keeps every node and leaves aggregates untouched; dropping removes
//! nodes and changes the sizes and counts of their ancestors.
//!
//! ```rust,no_run
//! use snoopy_scan::{WalkConfig, Walker};
//! use snoopy_transform::{PruneOptions, prune};
//!
//! let tree = Walker::new().walk(&WalkConfig::new("/path/to/walk")).unwrap();
//! let options = PruneOptions { hide_only: true, ..Default::default() };
//! let tree = prune::by_size_expr(tree, "< 10 KB", options).unwrap();
//! ```

mod engine;
pub mod prune;
pub mod sort;

pub use engine::{Transform, visit_children};
pub use prune::{Attribute, Cmp, PruneOptions, RejectBy, RejectByCompare, SizeExpr, Targets};
pub use sort::{Sort, SortKey};

// Re-export core types
pub use snoopy_core::{ErrorNode, File, Folder, Node, SnoopError};
