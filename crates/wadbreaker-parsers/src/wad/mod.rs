//! WAD Archive Parser
//!
//! The WAD format is the main asset archive used by the Steam releases of
//! DR1 and DR2. It is an uncompressed offset-table layout:
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │ "AGAR"  magic (4 bytes)                        │
//! │ major   version (u32)                          │
//! │ minor   version (u32)                          │
//! │ header  length (u32) + opaque header bytes     │
//! ├────────────────────────────────────────────────┤
//! │ file count (u32)                               │
//! │   per file: name len (u32), name (UTF-8),      │
//! │             size (u64), offset (u64)           │
//! ├────────────────────────────────────────────────┤
//! │ directory count (u32)                          │
//! │   per dir: name len (u32), name,               │
//! │            subfile count (u32),                │
//! │            per subfile: name len, name,        │
//! │                         is-directory (u8)      │
//! ├────────────────────────────────────────────────┤
//! │ data region: entry offsets are relative to the │
//! │ stream position reached right here             │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! All multi-byte integers are little-endian. Parsing is a single eager
//! pass at construction; the resulting index is immutable.

mod entry;

pub use entry::{WadDirectory, WadFileEntry, WadSubfile};

use std::io::Read;
use std::sync::Arc;

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::debug;

use wadbreaker_core::{Error, Result};
use wadbreaker_vfs::{DataSource, WindowedSource};

/// Magic tag opening every WAD archive
pub const WAD_MAGIC: &[u8; 4] = b"AGAR";

/// Reserved entry name whose payload is surfaced as archive metadata
pub const WAD_METADATA_ENTRY: &str = "Spiral-Header";

/// Cap on buffer preallocation from untrusted length/count fields; a
/// hostile header must earn its memory by actually delivering bytes.
const PREALLOC_LIMIT: usize = 64 * 1024;

/// A fully indexed WAD archive.
///
/// Owns its entry and directory tables; entry payloads stay in the backing
/// source and are read through windowed views on demand.
pub struct Wad {
    source: Arc<dyn DataSource>,
    major: u32,
    minor: u32,
    header: Vec<u8>,
    files: Vec<WadFileEntry>,
    directories: Vec<WadDirectory>,
    data_offset: u64,
    metadata: Option<Vec<u8>>,
}

impl std::fmt::Debug for Wad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wad")
            .field("source", &self.source.location())
            .field("major", &self.major)
            .field("minor", &self.minor)
            .field("header", &self.header)
            .field("files", &self.files)
            .field("directories", &self.directories)
            .field("data_offset", &self.data_offset)
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl Wad {
    /// Parse a WAD archive from a data source.
    ///
    /// Either the full index parses, or this fails with a container error
    /// and no partial archive is observable.
    pub fn parse(source: Arc<dyn DataSource>) -> Result<Self> {
        let mut reader = CountingReader::new(source.open_forward()?);

        let mut magic = [0u8; 4];
        reader.read_exact_or_truncated(&mut magic)?;
        if &magic != WAD_MAGIC {
            return Err(Error::InvalidMagic {
                expected: WAD_MAGIC.to_vec(),
                found: magic.to_vec(),
            });
        }

        let major = reader.read_u32()?;
        let minor = reader.read_u32()?;
        let header_len = reader.read_u32()? as usize;
        let header = reader.read_bytes(header_len)?;

        let file_count = reader.read_u32()?;
        let mut files = Vec::with_capacity((file_count as usize).min(PREALLOC_LIMIT));
        for _ in 0..file_count {
            let name = reader.read_name()?;
            let size = reader.read_u64()?;
            let offset = reader.read_u64()?;
            files.push(WadFileEntry { name, size, offset });
        }

        let directory_count = reader.read_u32()?;
        let mut directories =
            Vec::with_capacity((directory_count as usize).min(PREALLOC_LIMIT));
        for _ in 0..directory_count {
            let name = reader.read_name()?;
            let subfile_count = reader.read_u32()?;
            let mut subfiles =
                Vec::with_capacity((subfile_count as usize).min(PREALLOC_LIMIT));
            for _ in 0..subfile_count {
                let sub_name = reader.read_name()?;
                let flag = reader.read_u8()?;
                subfiles.push(WadSubfile {
                    name: sub_name,
                    is_directory: flag == 1,
                });
            }
            directories.push(WadDirectory { name, subfiles });
        }

        // Entry offsets are relative to the position reached right after
        // the directory table.
        let data_offset = reader.position();

        debug!(
            location = %source.location(),
            files = files.len(),
            directories = directories.len(),
            data_offset,
            "parsed WAD index"
        );

        let mut wad = Self {
            source,
            major,
            minor,
            header,
            files,
            directories,
            data_offset,
            metadata: None,
        };

        if let Some(idx) = wad.index_of(WAD_METADATA_ENTRY) {
            wad.metadata = Some(wad.entry_source(idx)?.read_all()?);
        }

        Ok(wad)
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Opaque header blob stored between the version tag and the file table
    pub fn header(&self) -> &[u8] {
        &self.header
    }

    pub fn has_header(&self) -> bool {
        !self.header.is_empty()
    }

    pub fn files(&self) -> &[WadFileEntry] {
        &self.files
    }

    pub fn directories(&self) -> &[WadDirectory] {
        &self.directories
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    /// Absolute offset of the data region in the backing source
    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    /// Payload of the reserved metadata entry, if the archive carries one
    pub fn metadata(&self) -> Option<&[u8]> {
        self.metadata.as_deref()
    }

    /// Index of the entry with the given name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.files.iter().position(|f| f.name == name)
    }

    /// Windowed view over one entry's payload bytes
    pub fn entry_source(&self, index: usize) -> Result<WindowedSource> {
        let entry = self.files.get(index).ok_or_else(|| {
            Error::corrupted(format!("entry index {} out of range", index))
        })?;
        let start = self.data_offset.checked_add(entry.offset).ok_or_else(|| {
            Error::corrupted(format!("entry {} offset overflows", entry.name))
        })?;
        WindowedSource::new(Arc::clone(&self.source), start, entry.size)
    }

    /// All entries as `(name, source)` pairs
    pub fn entries(&self) -> Result<Vec<(String, Arc<dyn DataSource>)>> {
        self.files
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                let source = self.entry_source(idx)?;
                Ok((entry.name.clone(), Arc::new(source) as Arc<dyn DataSource>))
            })
            .collect()
    }
}

/// Forward reader that tracks its absolute position and maps premature
/// end-of-stream to a container truncation error.
struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R: Read> CountingReader<R> {
    fn new(inner: R) -> Self {
        Self { inner, count: 0 }
    }

    fn position(&self) -> u64 {
        self.count
    }

    fn read_exact_or_truncated(&mut self, buf: &mut [u8]) -> Result<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.count += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Err(Error::Truncated { offset: self.count })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact_or_truncated(&mut buf)?;
        Ok(buf[0])
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact_or_truncated(&mut buf)?;
        Ok((&buf[..]).read_u32::<LittleEndian>()?)
    }

    fn read_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.read_exact_or_truncated(&mut buf)?;
        Ok((&buf[..]).read_u64::<LittleEndian>()?)
    }

    /// Read exactly `len` bytes, growing the buffer in bounded chunks so a
    /// hostile declared length cannot force a huge allocation up front.
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT));
        let mut chunk = [0u8; 4096];
        let mut remaining = len;
        while remaining > 0 {
            let take = remaining.min(chunk.len());
            self.read_exact_or_truncated(&mut chunk[..take])?;
            buf.extend_from_slice(&chunk[..take]);
            remaining -= take;
        }
        Ok(buf)
    }

    fn read_name(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes)
            .map_err(|_| Error::corrupted("entry name is not valid UTF-8"))
    }
}
