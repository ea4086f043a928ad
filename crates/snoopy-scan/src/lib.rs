//! Directory walking for snoopy.
//!
//! This crate turns a directory on disk into a [`Folder`] tree.
//!
//! # Overview
//!
//! - **Sequential, depth-first walk** with per-directory error capture
//! - **Ignore filters** for folders, files and errors, composable with [`AnyOf`]
//! - **Progress counters** readable from another thread, plus a [`Ticker`]
//!   that repaints a status line while a walk runs
//!
//! # Example
//!
//! ```rust,no_run
//! use snoopy_scan::{Dotfiles, OnError, WalkConfig, Walker};
//!
//! let config = WalkConfig::builder()
//!     .root("/path/to/walk")
//!     .on_error(OnError::Continue)
//!     .build()
//!     .unwrap();
//!
//! let tree = Walker::new()
//!     .ignore_folder(Dotfiles)
//!     .walk(&config)
//!     .unwrap();
//!
//! println!("Total size: {} bytes", tree.bytes());
//! println!("Total files: {}", tree.deep_files().len());
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use snoopy_scan::{Ticker, TickerStyle, WalkConfig, Walker};
//!
//! let walker = Walker::new();
//! let ticker = Ticker::start(walker.progress(), TickerStyle::Counters, Duration::from_millis(100));
//! let tree = walker.walk(&WalkConfig::new("."));
//! ticker.stop();
//! ```

mod filter;
mod progress;
mod walker;

pub use filter::{AnyOf, Dotfiles, Filter, Names, Never, Not, Patterns};
pub use progress::{ScanProgress, Ticker, TickerStyle, WalkProgress};
pub use walker::{Walker, walk};

// Re-export core types for convenience
pub use snoopy_core::{
    Entry, ErrorNode, FaultKind, File, Folder, Node, NodeKind, OnError, SnoopError, Timestamps,
    WalkConfig, WalkConfigBuilder,
};
