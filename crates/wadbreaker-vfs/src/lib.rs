//! wadbreaker Data Source layer
//!
//! Provides a uniform view over named, sized, re-openable binary resources:
//! - Local files
//! - In-memory buffers
//! - Windowed sub-ranges of a parent source (archive entries)
//! - Shared single-handle streams serialized behind a lock
//!
//! Every handle obtained from a source starts at that source's logical
//! offset 0, even when the source is a window into something larger.
//!
//! # Example
//! ```
//! use wadbreaker_vfs::{DataSource, MemorySource, WindowedSource};
//! use std::sync::Arc;
//!
//! let parent = Arc::new(MemorySource::new("blob", vec![0, 1, 2, 3, 4, 5]));
//! let window = WindowedSource::new(parent, 2, 3).unwrap();
//!
//! assert_eq!(window.read_all().unwrap(), vec![2, 3, 4]);
//! ```

pub mod locked;
pub mod source;
pub mod window;

pub use locked::LockedSource;
pub use source::{DataSource, FileSource, MemorySource, ReadSeek};
pub use window::WindowedSource;
