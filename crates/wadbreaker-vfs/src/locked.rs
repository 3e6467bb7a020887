//! Lock-serialized source for backing streams that cannot cheaply vend
//! independent handles.
//!
//! Each handle carries its own logical position and re-seeks the shared
//! stream under the lock before every read, so two handles never observe
//! each other's cursor movement.

use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

use parking_lot::Mutex;
use wadbreaker_core::Result;

use crate::source::{DataSource, ReadSeek};

/// Data source over a single shared seekable stream, guarded by a mutex
pub struct LockedSource {
    location: String,
    size: u64,
    inner: Arc<Mutex<Box<dyn ReadSeek + Send>>>,
}

impl LockedSource {
    /// Wrap a stream; its length is determined by seeking to the end once.
    pub fn new(location: impl Into<String>, mut stream: Box<dyn ReadSeek + Send>) -> Result<Self> {
        let size = stream.seek(SeekFrom::End(0))?;
        stream.seek(SeekFrom::Start(0))?;
        Ok(Self {
            location: location.into(),
            size,
            inner: Arc::new(Mutex::new(stream)),
        })
    }

    fn handle(&self) -> LockedHandle {
        LockedHandle {
            inner: Arc::clone(&self.inner),
            size: self.size,
            pos: 0,
        }
    }
}

impl DataSource for LockedSource {
    fn location(&self) -> String {
        self.location.clone()
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn open_forward(&self) -> Result<Box<dyn Read + Send>> {
        Ok(Box::new(self.handle()))
    }

    fn open_seekable(&self) -> Result<Box<dyn ReadSeek + Send>> {
        Ok(Box::new(self.handle()))
    }
}

/// Independent cursor over the shared stream
struct LockedHandle {
    inner: Arc<Mutex<Box<dyn ReadSeek + Send>>>,
    size: u64,
    pos: u64,
}

impl Read for LockedHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.size {
            return Ok(0);
        }
        let mut guard = self.inner.lock();
        guard.seek(SeekFrom::Start(self.pos))?;
        let n = guard.read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl Seek for LockedHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(p) => p as i128,
            SeekFrom::Current(d) => self.pos as i128 + d as i128,
            SeekFrom::End(d) => self.size as i128 + d as i128,
        };
        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of stream",
            ));
        }
        self.pos = target as u64;
        Ok(self.pos)
    }
}
