use serde::{Deserialize, Serialize};
use std::fmt;

/// File format requested from the export endpoint
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Txt,
    Pdf,
    Srt,
    Docx,
}

impl ExportFormat {
    /// File extension, also the value of the export `formats` field
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Srt => "srt",
            ExportFormat::Docx => "docx",
        }
    }

    /// Whether exported files are UTF-8 text a metadata header can be prepended to
    pub fn is_text(&self) -> bool {
        matches!(self, ExportFormat::Txt | ExportFormat::Srt)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
