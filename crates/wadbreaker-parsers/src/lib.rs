//! wadbreaker-parsers
//!
//! Container parsers and the format registry for the Steam releases of
//! DR1 and DR2.
//!
//! # Supported Formats
//!
//! | Format | Extension | Description |
//! |--------|-----------|-------------|
//! | WAD    | `.wad`    | Main game archive (AGAR layout) |
//! | AWB    | `.awb`    | Audio cue container (windowed entries) |
//! | SHTX   | `.shtx`   | Palette/raw texture |
//! | TGA    | `.tga`    | Truevision raster dump |
//! | PNG    | `.png`    | Delegated raster format |
//! | JPEG   | `.jpg`    | Delegated raster format |
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wadbreaker_parsers::wad::Wad;
//! use wadbreaker_vfs::FileSource;
//!
//! let source = Arc::new(FileSource::new("dr1_data_us.wad")?);
//! let wad = Wad::parse(source)?;
//! println!("{} files", wad.file_count());
//! ```

pub mod archive;
pub mod awb;
pub mod logging;
pub mod registry;
pub mod wad;

// Re-export main types
pub use archive::{Archive, ArchiveType, CpkArchive, CpkFileTable, WadArchive};
pub use awb::{Awb, AwbEntry};
pub use registry::FormatKind;
pub use wad::{Wad, WadDirectory, WadFileEntry, WadSubfile};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
