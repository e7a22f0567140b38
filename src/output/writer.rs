use anyhow::{Context, Result};
use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

use super::filename::transcript_filename;
use super::format::ExportFormat;
use super::header::render_header;
use crate::catalog::CatalogItem;

/// Persists exported transcripts into the destination directory
#[derive(Debug, Clone)]
pub struct DestinationWriter {
    dir: PathBuf,
    format: ExportFormat,
    include_metadata: bool,
}

impl DestinationWriter {
    pub fn new(dir: impl Into<PathBuf>, format: ExportFormat, include_metadata: bool) -> Self {
        Self {
            dir: dir.into(),
            format,
            include_metadata,
        }
    }

    /// Write one transcript and stamp its modification time
    ///
    /// Returns the path written. An existing file with the same name is replaced.
    pub fn write(&self, item: &CatalogItem, body: &[u8]) -> Result<PathBuf> {
        let path = self.dir.join(transcript_filename(item, self.format));

        let written = if self.include_metadata && self.format.is_text() {
            let mut content = render_header(item);
            content.push_str(&String::from_utf8_lossy(body));
            fs::write(&path, content)
        } else {
            fs::write(&path, body)
        };
        written.with_context(|| format!("Failed to write {}", path.display()))?;

        // Best effort: the file is already written
        if let Some(created) = item.creation_time() {
            match epoch_time(created) {
                Some(time) => {
                    if let Err(e) = stamp_times(&path, time) {
                        warn!("Failed to set timestamp on {}: {}", path.display(), e);
                    }
                }
                None => warn!(
                    "Creation time {} of {} is out of range, timestamp not set",
                    created, item.speech_id
                ),
            }
        }

        debug!("Wrote {} ({} bytes)", path.display(), body.len());
        Ok(path)
    }
}

/// `epoch_secs` as a `SystemTime`, `None` when the platform can't represent it
fn epoch_time(epoch_secs: i64) -> Option<SystemTime> {
    let offset = Duration::from_secs(epoch_secs.unsigned_abs());
    if epoch_secs >= 0 {
        UNIX_EPOCH.checked_add(offset)
    } else {
        UNIX_EPOCH.checked_sub(offset)
    }
}

/// Set access and modification time
fn stamp_times(path: &Path, time: SystemTime) -> std::io::Result<()> {
    let file = File::options().write(true).open(path)?;
    file.set_times(FileTimes::new().set_accessed(time).set_modified(time))
}
