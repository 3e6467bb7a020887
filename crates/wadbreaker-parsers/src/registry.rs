//! Format registry and conversion graph
//!
//! A closed catalogue of format descriptors. Each variant carries a display
//! name, an optional canonical extension, a content-detection predicate,
//! and a statically declared list of directly convertible targets. The
//! catalogue is fixed; new formats are added by adding a variant plus its
//! table entries, never at runtime.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::trace;

use wadbreaker_vfs::DataSource;

use crate::awb::AWB_MAGIC;
use crate::wad::WAD_MAGIC;

/// Magic tag opening every SHTX texture
pub const SHTX_MAGIC: &[u8; 4] = b"SHTX";

const PNG_SIGNATURE: &[u8; 8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8; 3] = &[0xFF, 0xD8, 0xFF];

/// Catalogued binary formats.
///
/// `Unknown` and `Binary` are sentinels: `Unknown` never detects, `Binary`
/// always does (fallback sink). Both are excluded from sniffing candidate
/// sets to avoid false positives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatKind {
    Wad,
    Awb,
    Tga,
    Shtx,
    Png,
    Jpeg,
    Unknown,
    Binary,
}

/// Every catalogued format, in registry iteration order
pub const ALL_FORMATS: &[FormatKind] = &[
    FormatKind::Wad,
    FormatKind::Awb,
    FormatKind::Tga,
    FormatKind::Shtx,
    FormatKind::Png,
    FormatKind::Jpeg,
    FormatKind::Unknown,
    FormatKind::Binary,
];

/// Candidate set for content sniffing; excludes the two sentinels
pub const DETECT_FORMATS: &[FormatKind] = &[
    FormatKind::Wad,
    FormatKind::Awb,
    FormatKind::Tga,
    FormatKind::Shtx,
    FormatKind::Png,
    FormatKind::Jpeg,
];

static EXTENSION_INDEX: Lazy<HashMap<&'static str, FormatKind>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for format in ALL_FORMATS {
        if let Some(ext) = format.extension() {
            map.entry(ext).or_insert(*format);
        }
    }
    map
});

impl FormatKind {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            FormatKind::Wad => "WAD",
            FormatKind::Awb => "AWB",
            FormatKind::Tga => "TGA",
            FormatKind::Shtx => "SHTX",
            FormatKind::Png => "PNG",
            FormatKind::Jpeg => "JPEG",
            FormatKind::Unknown => "Unknown",
            FormatKind::Binary => "Binary",
        }
    }

    /// Canonical extension, if this format has one
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            FormatKind::Wad => Some("wad"),
            FormatKind::Awb => Some("awb"),
            FormatKind::Tga => Some("tga"),
            FormatKind::Shtx => Some("shtx"),
            FormatKind::Png => Some("png"),
            FormatKind::Jpeg => Some("jpg"),
            FormatKind::Unknown | FormatKind::Binary => None,
        }
    }

    /// Declared direct conversion targets, in preference order.
    ///
    /// Fixed per variant; `can_convert` is pure membership with no
    /// transitive closure.
    pub fn conversions(&self) -> &'static [FormatKind] {
        match self {
            FormatKind::Tga => &[FormatKind::Png, FormatKind::Shtx],
            FormatKind::Shtx => &[FormatKind::Tga, FormatKind::Png],
            FormatKind::Png => &[FormatKind::Tga, FormatKind::Shtx, FormatKind::Jpeg],
            FormatKind::Jpeg => &[FormatKind::Png, FormatKind::Tga],
            FormatKind::Wad
            | FormatKind::Awb
            | FormatKind::Unknown
            | FormatKind::Binary => &[],
        }
    }

    /// Whether a direct conversion edge to `target` is declared
    pub fn can_convert(&self, target: FormatKind) -> bool {
        self.conversions().contains(&target)
    }

    /// Run this format's detection predicate against a source
    pub fn detect(&self, source: &dyn DataSource) -> bool {
        let matched = match self {
            FormatKind::Unknown => false,
            FormatKind::Binary => true,
            FormatKind::Wad => prefix_matches(source, WAD_MAGIC),
            FormatKind::Awb => prefix_matches(source, AWB_MAGIC),
            FormatKind::Shtx => prefix_matches(source, SHTX_MAGIC),
            FormatKind::Png => prefix_matches(source, PNG_SIGNATURE),
            FormatKind::Jpeg => prefix_matches(source, JPEG_SIGNATURE),
            FormatKind::Tga => tga_header_plausible(source),
        };
        trace!(format = self.name(), location = %source.location(), matched, "detect");
        matched
    }

    /// Exact, case-sensitive extension lookup
    pub fn for_extension(ext: &str) -> Option<FormatKind> {
        EXTENSION_INDEX.get(ext).copied()
    }

    /// Case-insensitive display name lookup
    pub fn for_name(name: &str) -> Option<FormatKind> {
        ALL_FORMATS
            .iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
            .copied()
    }

    /// First candidate whose detection predicate matches, in candidate order
    pub fn for_data(source: &dyn DataSource, candidates: &[FormatKind]) -> Option<FormatKind> {
        candidates.iter().find(|f| f.detect(source)).copied()
    }

    /// Resolve a source: extension fast-path from its location, else
    /// sniffing over the non-sentinel candidate set.
    pub fn identify(source: &dyn DataSource) -> Option<FormatKind> {
        let location = source.location();
        let by_ext = Path::new(&location)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::for_extension);
        by_ext.or_else(|| Self::for_data(source, DETECT_FORMATS))
    }
}

impl std::fmt::Display for FormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Read up to `n` leading bytes of a source; errors read as empty
fn read_prefix(source: &dyn DataSource, n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    let mut total = 0;
    if let Ok(mut reader) = source.open_forward() {
        while total < n {
            match reader.read(&mut buf[total..]) {
                Ok(0) | Err(_) => break,
                Ok(k) => total += k,
            }
        }
    }
    buf.truncate(total);
    buf
}

fn prefix_matches(source: &dyn DataSource, magic: &[u8]) -> bool {
    read_prefix(source, magic.len()) == magic
}

/// TGA has no magic; check the 18-byte header for plausibility instead
fn tga_header_plausible(source: &dyn DataSource) -> bool {
    let header = read_prefix(source, 18);
    if header.len() < 18 {
        return false;
    }

    let colormap_type = header[1];
    let image_type = header[2];
    let width = u16::from_le_bytes([header[12], header[13]]);
    let height = u16::from_le_bytes([header[14], header[15]]);
    let bpp = header[16];

    if colormap_type > 1 {
        return false;
    }
    if !matches!(image_type, 1 | 2 | 3 | 9 | 10 | 11) {
        return false;
    }
    // Color-mapped image types require a color map
    if matches!(image_type, 1 | 9) && colormap_type != 1 {
        return false;
    }
    width > 0 && height > 0 && matches!(bpp, 8 | 16 | 24 | 32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wadbreaker_vfs::MemorySource;

    fn source(name: &str, bytes: &[u8]) -> Arc<MemorySource> {
        Arc::new(MemorySource::new(name, bytes.to_vec()))
    }

    #[test]
    fn test_extension_lookup_case_sensitive() {
        assert_eq!(FormatKind::for_extension("wad"), Some(FormatKind::Wad));
        assert_eq!(FormatKind::for_extension("WAD"), None);
        assert_eq!(FormatKind::for_extension("jpg"), Some(FormatKind::Jpeg));
    }

    #[test]
    fn test_name_lookup_case_insensitive() {
        assert_eq!(FormatKind::for_name("shtx"), Some(FormatKind::Shtx));
        assert_eq!(FormatKind::for_name("ShTx"), Some(FormatKind::Shtx));
        assert_eq!(FormatKind::for_name("nope"), None);
    }

    #[test]
    fn test_sentinel_detection() {
        let s = source("anything.bin", b"arbitrary");
        assert!(!FormatKind::Unknown.detect(s.as_ref()));
        assert!(FormatKind::Binary.detect(s.as_ref()));
    }

    #[test]
    fn test_sentinels_excluded_from_sniffing() {
        assert!(!DETECT_FORMATS.contains(&FormatKind::Unknown));
        assert!(!DETECT_FORMATS.contains(&FormatKind::Binary));
    }

    #[test]
    fn test_magic_detection() {
        assert!(FormatKind::Wad.detect(source("x", b"AGAR\x01\x00\x00\x00").as_ref()));
        assert!(!FormatKind::Wad.detect(source("x", b"AGA").as_ref()));
        assert!(FormatKind::Awb.detect(source("x", b"AFS2....").as_ref()));
        assert!(FormatKind::Shtx.detect(source("x", b"SHTXFs\x02\x00\x02\x00\x00\x00").as_ref()));
    }

    #[test]
    fn test_identify_prefers_extension() {
        // SHTX bytes but a .wad name: extension fast-path wins
        let s = source("title.wad", b"SHTXFs\x01\x00\x01\x00\x00\x00");
        assert_eq!(FormatKind::identify(s.as_ref()), Some(FormatKind::Wad));
    }

    #[test]
    fn test_identify_falls_back_to_sniffing() {
        let s = source("blob.dat", b"AGAR\x01\x00\x00\x00");
        assert_eq!(FormatKind::identify(s.as_ref()), Some(FormatKind::Wad));
    }

    #[test]
    fn test_sniff_order_is_candidate_order() {
        // Binary would match everything, but it is not a candidate; an
        // unrecognized blob identifies as nothing.
        let s = source("blob.dat", b"\x00\x00\x00\x00\x00\x00");
        assert_eq!(FormatKind::identify(s.as_ref()), None);
    }

    #[test]
    fn test_conversion_graph_is_direct_only() {
        // JPEG -> SHTX is reachable via PNG but not declared
        assert!(FormatKind::Jpeg.can_convert(FormatKind::Png));
        assert!(FormatKind::Png.can_convert(FormatKind::Shtx));
        assert!(!FormatKind::Jpeg.can_convert(FormatKind::Shtx));
    }

    #[test]
    fn test_containers_declare_no_conversions() {
        assert!(FormatKind::Wad.conversions().is_empty());
        assert!(FormatKind::Awb.conversions().is_empty());
        assert!(FormatKind::Unknown.conversions().is_empty());
        assert!(FormatKind::Binary.conversions().is_empty());
    }

    #[test]
    fn test_tga_plausibility() {
        // Minimal valid-looking type-2 header: 2x2, 32bpp
        let mut header = vec![0u8; 18];
        header[2] = 2;
        header[12] = 2;
        header[14] = 2;
        header[16] = 32;
        assert!(FormatKind::Tga.detect(source("x", &header).as_ref()));

        // Zero dimensions fail
        let mut bad = header.clone();
        bad[12] = 0;
        assert!(!FormatKind::Tga.detect(source("x", &bad).as_ref()));
    }
}
