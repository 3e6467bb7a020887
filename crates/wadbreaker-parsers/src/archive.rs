//! Archive adapter contract
//!
//! Wraps the concrete container types behind one entry-listing interface,
//! and records whether a container supports compiling a modified copy.

use std::sync::Arc;

use wadbreaker_core::{Error, Result};
use wadbreaker_vfs::{DataSource, WindowedSource};

use crate::registry::FormatKind;
use crate::wad::Wad;

/// Kind of a wrapped archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    Wad,
    Cpk,
}

/// Common contract over parsed containers.
///
/// `nice_compile_formats` records which lossy source formats should be
/// downgraded to a safer intermediate before re-insertion; informational
/// for containers that do not compile.
pub trait Archive: Send + Sync {
    fn archive_type(&self) -> ArchiveType;

    /// All entries as `(name, source)` pairs
    fn entries(&self) -> Result<Vec<(String, Arc<dyn DataSource>)>>;

    /// Whether this archive can compile a modified copy of itself
    fn supports_compilation(&self) -> bool {
        false
    }

    /// Compile a modified copy from replacement entries
    fn compile(&self, entries: &[(String, Arc<dyn DataSource>)]) -> Result<()>;

    /// Preferred downgrade targets when preparing entries for re-insertion
    fn nice_compile_formats(&self) -> &[(FormatKind, FormatKind)] {
        &[]
    }
}

/// WAD archive behind the adapter contract
pub struct WadArchive {
    wad: Wad,
}

impl WadArchive {
    pub fn new(wad: Wad) -> Self {
        Self { wad }
    }

    pub fn wad(&self) -> &Wad {
        &self.wad
    }
}

impl Archive for WadArchive {
    fn archive_type(&self) -> ArchiveType {
        ArchiveType::Wad
    }

    fn entries(&self) -> Result<Vec<(String, Arc<dyn DataSource>)>> {
        self.wad.entries()
    }

    fn compile(&self, _entries: &[(String, Arc<dyn DataSource>)]) -> Result<()> {
        Err(Error::NotImplemented("WAD compilation"))
    }
}

/// File table of an externally-parsed CPK container.
///
/// The CPK header/UTF-table decoding happens outside this crate; this type
/// only carries the resolved `(name, size, offset)` rows over the backing
/// source.
pub struct CpkFileTable {
    source: Arc<dyn DataSource>,
    rows: Vec<(String, u64, u64)>,
}

impl CpkFileTable {
    pub fn from_rows(
        source: Arc<dyn DataSource>,
        rows: Vec<(String, u64, u64)>,
    ) -> Self {
        Self { source, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Downgrade preferences shared by read-only containers: lossy raster
/// sources become TGA before any re-insertion.
const LOSSY_TO_TGA: &[(FormatKind, FormatKind)] = &[
    (FormatKind::Png, FormatKind::Tga),
    (FormatKind::Jpeg, FormatKind::Tga),
    (FormatKind::Shtx, FormatKind::Tga),
];

/// CPK archive behind the adapter contract.
///
/// Write-back is unsupported: `compile` fails fast instead of silently
/// doing nothing.
pub struct CpkArchive {
    table: CpkFileTable,
}

impl CpkArchive {
    pub fn new(table: CpkFileTable) -> Self {
        Self { table }
    }
}

impl Archive for CpkArchive {
    fn archive_type(&self) -> ArchiveType {
        ArchiveType::Cpk
    }

    fn entries(&self) -> Result<Vec<(String, Arc<dyn DataSource>)>> {
        self.table
            .rows
            .iter()
            .map(|(name, size, offset)| {
                let source =
                    WindowedSource::new(Arc::clone(&self.table.source), *offset, *size)?;
                Ok((name.clone(), Arc::new(source) as Arc<dyn DataSource>))
            })
            .collect()
    }

    fn compile(&self, _entries: &[(String, Arc<dyn DataSource>)]) -> Result<()> {
        Err(Error::NotImplemented("CPK compilation"))
    }

    fn nice_compile_formats(&self) -> &[(FormatKind, FormatKind)] {
        LOSSY_TO_TGA
    }
}
