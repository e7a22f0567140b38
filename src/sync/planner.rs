use std::fs;
use std::io;
use std::path::Path;

use super::config::SyncConfig;
use crate::catalog::CatalogItem;
use crate::output::{dedup_suffix, ExportFormat};

/// What to do with one catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    /// A file for this speech is already in the destination
    SkipExisting,
    /// Listed text is shorter than the configured minimum
    SkipFiltered { length: usize },
    Download,
}

/// Decide what happens to `item`
///
/// The existence check runs first, so a downloaded speech is never
/// re-evaluated by the length filter.
pub fn plan(item: &CatalogItem, config: &SyncConfig) -> io::Result<SyncDecision> {
    if !config.overwrite && already_downloaded(&item.speech_id, &config.destination, config.format)?
    {
        return Ok(SyncDecision::SkipExisting);
    }

    if let Some(text) = item.filter_text() {
        let length = text.chars().count();
        if length < config.min_length {
            return Ok(SyncDecision::SkipFiltered { length });
        }
    }

    Ok(SyncDecision::Download)
}

/// Whether `dir` holds a file named `*_<speech_id>.<ext>`
///
/// Scans the directory on every call: the destination is the only record
/// of past downloads and may change between checks.
pub fn already_downloaded(speech_id: &str, dir: &Path, format: ExportFormat) -> io::Result<bool> {
    let suffix = dedup_suffix(speech_id, format);

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    for entry in entries {
        let entry = entry?;
        if entry.file_name().to_string_lossy().ends_with(&suffix) {
            return Ok(true);
        }
    }

    Ok(false)
}
