//! Batch identification and conversion reports
//!
//! Batch operations never abort on a bad item: every input produces one
//! serializable row, with failures recorded inline so a report over a
//! thousand-entry archive survives a handful of corrupt textures.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use wadbreaker_parsers::FormatKind;
use wadbreaker_vfs::DataSource;

use crate::convert::{convert_to_bytes, ConvertParams};

/// One row of a batch identification report
#[derive(Debug, Clone, Serialize)]
pub struct IdentifyReport {
    pub name: String,
    pub location: String,
    /// Registry name of the identified format, if any candidate matched
    pub format: Option<String>,
}

/// One row of a batch conversion report
#[derive(Debug, Serialize)]
pub struct ConvertReport {
    pub name: String,
    pub from: Option<String>,
    pub to: String,
    pub success: bool,
    pub error: Option<String>,
    /// Converted bytes on success; not part of the serialized report
    #[serde(skip)]
    pub output: Option<Vec<u8>>,
}

/// Identify every item, one row per input
pub fn identify_batch(items: &[(String, Arc<dyn DataSource>)]) -> Vec<IdentifyReport> {
    items
        .iter()
        .map(|(name, source)| IdentifyReport {
            name: name.clone(),
            location: source.location(),
            format: FormatKind::identify(source.as_ref()).map(|f| f.name().to_string()),
        })
        .collect()
}

/// Convert every item to `target`, one row per input.
///
/// The source format of each item is identified individually; items that
/// identify as nothing, or whose conversion fails, get a failure row and
/// the batch continues.
pub fn convert_batch(
    items: &[(String, Arc<dyn DataSource>)],
    target: FormatKind,
    params: &ConvertParams,
) -> Vec<ConvertReport> {
    items
        .iter()
        .map(|(name, source)| {
            let from = FormatKind::identify(source.as_ref());
            let row = match from {
                None => ConvertReport {
                    name: name.clone(),
                    from: None,
                    to: target.name().to_string(),
                    success: false,
                    error: Some("no format matched".to_string()),
                    output: None,
                },
                Some(from) => match convert_to_bytes(from, target, source.as_ref(), params) {
                    Ok(output) => ConvertReport {
                        name: name.clone(),
                        from: Some(from.name().to_string()),
                        to: target.name().to_string(),
                        success: true,
                        error: None,
                        output: Some(output),
                    },
                    Err(e) => ConvertReport {
                        name: name.clone(),
                        from: Some(from.name().to_string()),
                        to: target.name().to_string(),
                        success: false,
                        error: Some(e.to_string()),
                        output: None,
                    },
                },
            };
            if !row.success {
                warn!(name = %row.name, error = ?row.error, "batch item failed");
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wadbreaker_vfs::MemorySource;

    fn item(name: &str, bytes: Vec<u8>) -> (String, Arc<dyn DataSource>) {
        (
            name.to_string(),
            Arc::new(MemorySource::new(name, bytes)) as Arc<dyn DataSource>,
        )
    }

    #[test]
    fn test_identify_batch_rows() {
        let items = vec![
            item("a.wad", b"AGAR\x01\x00\x00\x00".to_vec()),
            item("mystery", vec![0; 8]),
        ];
        let rows = identify_batch(&items);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].format.as_deref(), Some("WAD"));
        assert_eq!(rows[1].format, None);
    }

    #[test]
    fn test_identify_rows_serialize() {
        let items = vec![item("a.wad", b"AGAR\x01\x00\x00\x00".to_vec())];
        let json = serde_json::to_string(&identify_batch(&items)).unwrap();
        assert!(json.contains("\"format\":\"WAD\""));
    }
}
