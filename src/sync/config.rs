use std::path::PathBuf;
use std::time::Duration;

use crate::config::expand_path;
use crate::output::ExportFormat;

/// Where downloads land unless configured otherwise
pub const DEFAULT_DESTINATION: &str = "~/Dropbox/Otter-Export";

/// Configuration for one sync run
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Destination directory, created if missing
    pub destination: PathBuf,

    /// Export format, also the file extension
    pub format: ExportFormat,

    /// Download even when a file for the speech already exists
    pub overwrite: bool,

    /// Pause after every download attempt
    /// Default: 500 ms
    pub delay: Duration,

    /// Speeches whose listed transcript/summary is shorter than this are skipped
    /// Default: 200 characters
    pub min_length: usize,

    /// Stop after this many successful downloads
    pub max_downloads: Option<usize>,

    /// Prepend a metadata header to text transcripts
    pub include_metadata: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            destination: expand_path(DEFAULT_DESTINATION),
            format: ExportFormat::Txt,
            overwrite: false,
            delay: Duration::from_millis(500),
            min_length: 200,
            max_downloads: None,
            include_metadata: false,
        }
    }
}
