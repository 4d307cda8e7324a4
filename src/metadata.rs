//! Match metadata persistence.
//!
//! Records are stored as a pretty-printed JSON array (four-space indent).
//! Each write replaces the previous file wholesale.

use crate::error::Result;
use crate::highlight::MatchRecord;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Serialize `records` as indented JSON.
pub fn to_json(records: &[MatchRecord]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    records.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Write `records` to `destination`.
///
/// The data goes to a sibling temporary file first and is then renamed
/// over the destination, so readers never see a partial file.
pub fn write_metadata(records: &[MatchRecord], destination: impl AsRef<Path>) -> Result<()> {
    let destination = destination.as_ref();
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = destination.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = destination.with_file_name(tmp_name);

    fs::write(&tmp, to_json(records)?)?;
    if let Err(e) = fs::rename(&tmp, destination) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    log::info!("Wrote {} records to {}", records.len(), destination.display());
    Ok(())
}

/// Read records written by [`write_metadata`].
pub fn read_metadata(source: impl AsRef<Path>) -> Result<Vec<MatchRecord>> {
    let data = fs::read(source.as_ref())?;
    Ok(serde_json::from_slice(&data)?)
}
