//! Destination side of a sync
//!
//! Filenames are derived from `(title, speech_id)` only, so the same speech
//! always lands at the same path and later runs can find it again.

mod filename;
mod format;
mod header;
mod writer;

pub use filename::{dedup_suffix, slugify, transcript_filename, MAX_SLUG_LENGTH};
pub use format::ExportFormat;
pub use header::{iso_timestamp, render_header, TOP_TOPICS};
pub use writer::DestinationWriter;
