//! Catalog model and pagination
//!
//! Items and pages are rebuilt from upstream on every run; nothing here is cached.

mod item;
mod paginator;

pub use item::{CatalogItem, Cursor, Page, Source, Speaker, UNTITLED};
pub use paginator::{
    PaginationConfig, Paginator, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
