//! WAD archive entry structures

use serde::Serialize;

/// One indexed file inside a WAD archive.
///
/// `offset` is relative to the archive's data region start, not to the
/// start of the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WadFileEntry {
    /// Full path within the archive
    pub name: String,
    /// Payload size in bytes
    pub size: u64,
    /// Byte offset relative to the data region
    pub offset: u64,
}

impl WadFileEntry {
    /// Get the filename without path
    pub fn filename(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Get the file extension
    pub fn extension(&self) -> Option<&str> {
        let filename = self.filename();
        filename.rfind('.').map(|idx| &filename[idx + 1..])
    }
}

/// One directory node of a WAD archive's metadata tree.
///
/// Directory nodes list subordinate names only; they never reference
/// payload bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WadDirectory {
    pub name: String,
    pub subfiles: Vec<WadSubfile>,
}

/// One subordinate listed by a directory node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WadSubfile {
    pub name: String,
    pub is_directory: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_entry(name: &str) -> WadFileEntry {
        WadFileEntry {
            name: name.to_string(),
            size: 64,
            offset: 0,
        }
    }

    #[test]
    fn test_filename() {
        assert_eq!(make_entry("Dr1/data/us/bin/bin_pb_anon_fine.pak").filename(), "bin_pb_anon_fine.pak");
        assert_eq!(make_entry("readme.txt").filename(), "readme.txt");
    }

    #[test]
    fn test_extension() {
        assert_eq!(make_entry("a/b/texture.tga").extension(), Some("tga"));
        assert_eq!(make_entry("a/b/noext").extension(), None);
    }
}
