//! Core types for snoopy.
//!
//! This crate provides the in-memory tree built by a walk (folders, files
//! and captured enumeration errors), the byte unit converter, the error
//! taxonomy and the walk configuration shared by the other crates.

mod config;
mod error;
mod node;
mod tree;
pub mod units;

pub use config::{OnError, WalkConfig, WalkConfigBuilder};
pub use error::{FaultKind, SnoopError};
pub use node::{Entry, ErrorNode, File, Node, NodeKind, Timestamps};
pub use tree::{Folder, Traverse, TraversePost};
pub use units::{Converter, Unit};
