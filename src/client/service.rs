use crate::catalog::{CatalogItem, Cursor, Page, Source};
use crate::error::ClientResult;
use crate::output::ExportFormat;

/// Parameters of one listing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub folder_id: i64,
    pub page_size: usize,
    pub source: Source,
    pub cursor: Option<Cursor>,
}

/// The two upstream calls a sync needs
///
/// Implementations:
/// - [`super::Session`]: the real HTTP API
/// - test doubles scripting pages and export results
#[async_trait::async_trait]
pub trait TranscriptService: Send + Sync {
    /// Fetch one page of the catalog, already normalized
    async fn list_page(&self, request: &PageRequest) -> ClientResult<Page>;

    /// Export one speech in the given format and return the raw file bytes
    async fn fetch_transcript(
        &self,
        item: &CatalogItem,
        format: ExportFormat,
    ) -> ClientResult<Vec<u8>>;
}
