//! Data source abstraction over re-openable binary resources

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use wadbreaker_core::{Error, Result};

/// Combined reader trait for seekable handles
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// A named, sized, re-openable binary resource.
///
/// Each `open_*` call returns an independent handle positioned at the
/// source's logical offset 0; opening two handles concurrently must not
/// corrupt either stream's position.
pub trait DataSource: Send + Sync {
    /// Human-readable origin of this source
    fn location(&self) -> String;

    /// Total byte length of this source
    fn size(&self) -> u64;

    /// Open an independent single-pass forward-reading handle
    fn open_forward(&self) -> Result<Box<dyn Read + Send>>;

    /// Open an independent seekable handle
    fn open_seekable(&self) -> Result<Box<dyn ReadSeek + Send>>;

    /// Read the entire source into memory
    fn read_all(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.size() as usize);
        self.open_forward()?.read_to_end(&mut out)?;
        Ok(out)
    }
}

/// File-backed data source; each handle is a freshly opened file
pub struct FileSource {
    path: PathBuf,
    size: u64,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = std::fs::metadata(&path)?;
        if !metadata.is_file() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            )));
        }
        Ok(Self {
            path,
            size: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for FileSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn open_forward(&self) -> Result<Box<dyn Read + Send>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn open_seekable(&self) -> Result<Box<dyn ReadSeek + Send>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Memory-backed data source; handles are independent cursors over a
/// shared buffer
#[derive(Clone)]
pub struct MemorySource {
    location: String,
    data: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(location: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            location: location.into(),
            data: data.into().into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

impl DataSource for MemorySource {
    fn location(&self) -> String {
        self.location.clone()
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn open_forward(&self) -> Result<Box<dyn Read + Send>> {
        Ok(Box::new(Cursor::new(Arc::clone(&self.data))))
    }

    fn open_seekable(&self) -> Result<Box<dyn ReadSeek + Send>> {
        Ok(Box::new(Cursor::new(Arc::clone(&self.data))))
    }

    fn read_all(&self) -> Result<Vec<u8>> {
        Ok(self.data.to_vec())
    }
}
