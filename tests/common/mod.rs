// Scripted TranscriptService used by the pagination and sync tests

#![allow(dead_code)]

use otter_sync::{
    CatalogItem, ClientError, ClientResult, Cursor, ExportFormat, Page, PageRequest,
    TranscriptService,
};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

pub struct FakeService {
    /// Pages returned in order
    pages: Mutex<VecDeque<Page>>,

    /// Returned forever once `pages` runs dry (defaults to an empty page)
    repeat: Option<Page>,

    /// Speech ids whose export answers HTTP 500
    failing: HashSet<String>,

    pub requests: Mutex<Vec<PageRequest>>,
    pub exports: Mutex<Vec<String>>,
}

impl FakeService {
    pub fn with_pages(pages: Vec<Page>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            repeat: None,
            failing: HashSet::new(),
            requests: Mutex::new(Vec::new()),
            exports: Mutex::new(Vec::new()),
        }
    }

    /// Every call returns the same page
    pub fn endless(page: Page) -> Self {
        let mut service = Self::with_pages(Vec::new());
        service.repeat = Some(page);
        service
    }

    pub fn failing_export(mut self, speech_id: &str) -> Self {
        self.failing.insert(speech_id.to_string());
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn export_count(&self) -> usize {
        self.exports.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl TranscriptService for FakeService {
    async fn list_page(&self, request: &PageRequest) -> ClientResult<Page> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.pages.lock().unwrap().pop_front();
        Ok(next
            .or_else(|| self.repeat.clone())
            .unwrap_or_else(Page::empty))
    }

    async fn fetch_transcript(
        &self,
        item: &CatalogItem,
        format: ExportFormat,
    ) -> ClientResult<Vec<u8>> {
        self.exports.lock().unwrap().push(item.speech_id.clone());
        if item.otid.is_none() {
            return Err(ClientError::MissingOtid {
                speech_id: item.speech_id.clone(),
            });
        }
        if self.failing.contains(&item.speech_id) {
            return Err(ClientError::ExportFailed {
                status: 500,
                title: item.display_title().to_string(),
            });
        }
        Ok(format!("Transcript of {} ({})", item.display_title(), format).into_bytes())
    }
}

/// Speech with a long enough transcript to pass the default filter
pub fn item(id: &str, title: &str) -> CatalogItem {
    CatalogItem {
        speech_id: id.to_string(),
        otid: Some(format!("ot-{}", id)),
        title: Some(title.to_string()),
        ..Default::default()
    }
}

/// `count` speeches numbered from `start`
pub fn items(start: usize, count: usize) -> Vec<CatalogItem> {
    (start..start + count)
        .map(|i| item(&format!("sp{:04}", i), &format!("Meeting {}", i)))
        .collect()
}

/// Non-final page carrying a cursor
pub fn page(items: Vec<CatalogItem>, cursor: &str) -> Page {
    Page::new(items, false, Cursor::new(cursor))
}

pub fn last_page(items: Vec<CatalogItem>) -> Page {
    Page::new(items, true, None)
}
