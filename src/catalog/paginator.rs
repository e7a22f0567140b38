use futures::stream::{self, Stream};
use tracing::{debug, info, warn};

use super::item::{CatalogItem, Cursor, Page, Source};
use crate::client::{PageRequest, TranscriptService};
use crate::error::ClientResult;

/// Page size for a full catalog walk
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Largest page the listing endpoint will serve
pub const MAX_PAGE_SIZE: usize = 530;

/// Circuit breaker: no walk fetches more pages than this
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// How the catalog is walked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    pub folder_id: i64,
    pub source: Source,

    /// Items requested per page, clamped to `1..=MAX_PAGE_SIZE`
    pub page_size: usize,

    /// Hard ceiling on listing requests
    pub max_pages: usize,

    /// Stop after this many items (bounded-prefix mode)
    pub limit: Option<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            folder_id: 0,
            source: Source::Owned,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            limit: None,
        }
    }
}

impl PaginationConfig {
    /// Only the first `limit` items, fetched in pages as large as upstream allows
    pub fn prefix(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Page size actually requested
    pub fn effective_page_size(&self) -> usize {
        self.limit
            .unwrap_or(self.page_size)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// Cursor-driven walk over the listing endpoint
///
/// Ends on any of: end-of-list, empty page, short page, missing cursor,
/// item limit reached, or the page ceiling.
pub struct Paginator<'a, S: TranscriptService + ?Sized> {
    service: &'a S,
    config: PaginationConfig,
    cursor: Option<Cursor>,
    pages_fetched: usize,
    items_yielded: usize,
    finished: bool,
}

impl<'a, S: TranscriptService + ?Sized> Paginator<'a, S> {
    pub fn new(service: &'a S, config: PaginationConfig) -> Self {
        Self {
            service,
            config,
            cursor: None,
            pages_fetched: 0,
            items_yielded: 0,
            finished: false,
        }
    }

    /// Fetch the next page, or `None` once the walk is over
    pub async fn next_page(&mut self) -> ClientResult<Option<Page>> {
        if self.finished {
            return Ok(None);
        }
        if self.config.limit.is_some_and(|limit| self.items_yielded >= limit) {
            self.finished = true;
            return Ok(None);
        }
        if self.pages_fetched >= self.config.max_pages {
            warn!(
                "Page ceiling reached ({} pages, {} speeches), stopping",
                self.pages_fetched, self.items_yielded
            );
            self.finished = true;
            return Ok(None);
        }

        let page_size = self.config.effective_page_size();
        let request = PageRequest {
            folder_id: self.config.folder_id,
            page_size,
            source: self.config.source,
            cursor: self.cursor.clone(),
        };

        let mut page = match self.service.list_page(&request).await {
            Ok(page) => page,
            Err(e) => {
                self.finished = true;
                return Err(e);
            }
        };
        self.pages_fetched += 1;

        let batch = page.batch_size();
        let mut done = page.end_of_list || batch < page_size || page.cursor.is_none();

        if let Some(limit) = self.config.limit {
            let remaining = limit.saturating_sub(self.items_yielded);
            if page.items.len() >= remaining {
                page.items.truncate(remaining);
                done = true;
            }
        }

        if !done && self.pages_fetched >= self.config.max_pages {
            warn!(
                "Page ceiling reached ({} pages), upstream never reported the end of the list",
                self.pages_fetched
            );
            done = true;
        }

        debug!(
            "Page {}: {} speeches, end_of_list={}, cursor={:?}",
            self.pages_fetched, batch, page.end_of_list, page.cursor
        );

        self.items_yielded += page.items.len();
        self.cursor = page.cursor.clone();
        self.finished = done;

        if done {
            info!(
                "Catalog listing complete: {} speeches in {} pages",
                self.items_yielded, self.pages_fetched
            );
        }

        if page.items.is_empty() {
            Ok(None)
        } else {
            Ok(Some(page))
        }
    }

    /// Walk to the end and gather every item
    pub async fn collect_items(mut self) -> ClientResult<Vec<CatalogItem>> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await? {
            items.extend(page.items);
        }
        Ok(items)
    }

    /// The walk as a lazy stream of pages
    pub fn into_stream(self) -> impl Stream<Item = ClientResult<Page>> + 'a {
        stream::try_unfold(self, |mut paginator| async move {
            Ok(paginator.next_page().await?.map(|page| (page, paginator)))
        })
    }
}
