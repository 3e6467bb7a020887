//! AWB windowed-entry container
//!
//! AWB archives hold audio cues addressed by a flat id/size/offset table.
//! Parsing the outer AFS2 header happens elsewhere; this layer takes the
//! already-decoded triples and manufactures one windowed entry per triple
//! over the parent source. There is no name table and no directory tree.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use wadbreaker_core::{Error, Result};
use wadbreaker_vfs::{DataSource, WindowedSource};

/// Magic tag of the outer AFS2 container (used for detection only)
pub const AWB_MAGIC: &[u8; 4] = b"AFS2";

/// One cue of an AWB container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AwbEntry {
    /// Cue id from the outer header
    pub id: u32,
    /// Payload size in bytes
    pub size: u64,
    /// Absolute byte offset into the parent source
    pub offset: u64,
}

/// An AWB container: a parent source plus its cue table
pub struct Awb {
    source: Arc<dyn DataSource>,
    entries: Vec<AwbEntry>,
}

impl std::fmt::Debug for Awb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Awb")
            .field("source", &self.source.location())
            .field("entries", &self.entries)
            .finish()
    }
}

impl Awb {
    /// Build a container from already-parsed `(id, size, offset)` triples.
    ///
    /// Every triple is validated against the parent's size up front; a
    /// table pointing outside the parent fails construction.
    pub fn from_table(
        source: Arc<dyn DataSource>,
        triples: impl IntoIterator<Item = (u32, u64, u64)>,
    ) -> Result<Self> {
        let parent_size = source.size();
        let mut entries = Vec::new();
        for (id, size, offset) in triples {
            let end = offset.checked_add(size).ok_or(Error::WindowBounds {
                requested: u64::MAX,
                available: parent_size,
            })?;
            if end > parent_size {
                return Err(Error::WindowBounds {
                    requested: end,
                    available: parent_size,
                });
            }
            entries.push(AwbEntry { id, size, offset });
        }

        debug!(
            location = %source.location(),
            entries = entries.len(),
            "indexed AWB table"
        );

        Ok(Self { source, entries })
    }

    pub fn entry_table(&self) -> &[AwbEntry] {
        &self.entries
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Windowed view over one cue's payload bytes
    pub fn entry_source(&self, index: usize) -> Result<WindowedSource> {
        let entry = self.entries.get(index).ok_or_else(|| {
            Error::corrupted(format!("cue index {} out of range", index))
        })?;
        WindowedSource::new(Arc::clone(&self.source), entry.offset, entry.size)
    }

    /// All cues as `(name, source)` pairs with synthetic `cue_{id}` names
    pub fn entries(&self) -> Result<Vec<(String, Arc<dyn DataSource>)>> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let source = self.entry_source(idx)?;
                Ok((
                    format!("cue_{}", entry.id),
                    Arc::new(source) as Arc<dyn DataSource>,
                ))
            })
            .collect()
    }
}
