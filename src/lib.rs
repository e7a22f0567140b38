pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod sync;

pub use catalog::{CatalogItem, Cursor, Page, PaginationConfig, Paginator, Source, Speaker};
pub use client::{authenticate, AuthOutcome, AuthState, PageRequest, Session, TranscriptService};
pub use crate::config::Config;
pub use error::{ClientError, ClientResult};
pub use output::{slugify, transcript_filename, DestinationWriter, ExportFormat};
pub use sync::{RunStats, SyncConfig, SyncDecision, SyncRunner};
