//! Windowed views over a parent data source
//!
//! A window exposes `[start, start + len)` of a parent source as a source
//! in its own right. Handles never return bytes outside that range, and a
//! parent that runs out early produces a short read rather than padding.

use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

use wadbreaker_core::{Error, Result};

use crate::source::{DataSource, ReadSeek};

/// A data source restricted to a sub-range of a parent source
#[derive(Clone)]
pub struct WindowedSource {
    parent: Arc<dyn DataSource>,
    start: u64,
    len: u64,
}

impl WindowedSource {
    /// Create a window over `[start, start + len)` of `parent`.
    ///
    /// Rejects windows reaching past the parent's declared size.
    pub fn new(parent: Arc<dyn DataSource>, start: u64, len: u64) -> Result<Self> {
        let end = start
            .checked_add(len)
            .ok_or(Error::WindowBounds {
                requested: u64::MAX,
                available: parent.size(),
            })?;
        if end > parent.size() {
            return Err(Error::WindowBounds {
                requested: end,
                available: parent.size(),
            });
        }
        Ok(Self { parent, start, len })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn parent(&self) -> &Arc<dyn DataSource> {
        &self.parent
    }
}

impl std::fmt::Debug for WindowedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowedSource")
            .field("parent", &self.parent.location())
            .field("start", &self.start)
            .field("len", &self.len)
            .finish()
    }
}

impl DataSource for WindowedSource {
    fn location(&self) -> String {
        format!("{}, offset {} bytes", self.parent.location(), self.start)
    }

    fn size(&self) -> u64 {
        self.len
    }

    fn open_forward(&self) -> Result<Box<dyn Read + Send>> {
        let mut inner = self.parent.open_forward()?;
        // Discard the leading bytes; a short parent simply yields a
        // shorter window.
        io::copy(&mut inner.by_ref().take(self.start), &mut io::sink())?;
        Ok(Box::new(inner.take(self.len)))
    }

    fn open_seekable(&self) -> Result<Box<dyn ReadSeek + Send>> {
        let mut inner = self.parent.open_seekable()?;
        inner.seek(SeekFrom::Start(self.start))?;
        Ok(Box::new(WindowReader {
            inner,
            start: self.start,
            len: self.len,
            pos: 0,
        }))
    }
}

/// Seekable handle over a window; all coordinates are window-relative
struct WindowReader {
    inner: Box<dyn ReadSeek + Send>,
    start: u64,
    len: u64,
    pos: u64,
}

impl Read for WindowReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.len.saturating_sub(self.pos);
        if remaining == 0 {
            return Ok(0);
        }
        let cap = remaining.min(buf.len() as u64) as usize;
        let n = self.inner.read(&mut buf[..cap])?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl Seek for WindowReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(p) => p as i128,
            SeekFrom::Current(d) => self.pos as i128 + d as i128,
            SeekFrom::End(d) => self.len as i128 + d as i128,
        };
        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of window",
            ));
        }
        let target = target as u64;
        self.inner.seek(SeekFrom::Start(self.start + target))?;
        self.pos = target;
        Ok(self.pos)
    }
}
