//! Text rendering for snoopy trees.
//!
//! A [`Formatter`] turns a [`Folder`] into indented lines, one per node,
//! with per-kind caps, depth limits and a summary of what was left out.
//!
//! ```rust,no_run
//! use snoopy_render::{Formatter, RenderOptions, Sink, write_to};
//! use snoopy_scan::{WalkConfig, Walker};
//!
//! let tree = Walker::new().walk(&WalkConfig::new(".")).unwrap();
//! let options = RenderOptions::builder()
//!     .max_depth(2usize)
//!     .max_files(10usize)
//!     .build()
//!     .unwrap();
//!
//! let text = Formatter::new(options).render(&tree);
//! write_to(&Sink::Stdout, &text).unwrap();
//! ```

mod formatter;
pub mod labels;
mod sink;

pub use formatter::{
    ERROR_PREFIX, FILE_PREFIX, FOLDER_PREFIX, Formatter, RenderOptions, RenderOptionsBuilder,
    Remaining,
};
pub use labels::{Detailed, HumanSize, Label, NameOnly, NumFilesOnly, SizeOnly, format_size};
pub use sink::{Sink, write_to};

pub use snoopy_core::Folder;
