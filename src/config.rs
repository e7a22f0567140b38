use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::{PaginationConfig, Source, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use crate::client::DEFAULT_BASE_URL;
use crate::output::ExportFormat;
use crate::sync::{SyncConfig, DEFAULT_DESTINATION};

/// Settings file plus `OTTER_SYNC__<SECTION>__<KEY>` environment overrides
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub catalog: CatalogConfig,
    pub sync: SyncSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
            user_agent: concat!("otter-sync/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub folder_id: i64,
    pub source: Source,
    pub page_size: usize,
    pub max_pages: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            folder_id: 0,
            source: Source::Owned,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    pub destination: String,
    pub format: ExportFormat,
    pub overwrite: bool,
    pub delay_secs: f64,
    pub min_length: usize,
    pub max_downloads: Option<usize>,
    pub include_metadata: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            destination: DEFAULT_DESTINATION.to_string(),
            format: ExportFormat::Txt,
            overwrite: false,
            delay_secs: 0.5,
            min_length: 200,
            max_downloads: None,
            include_metadata: false,
        }
    }
}

impl Config {
    /// Load `path` (any extension the `config` crate knows, optional) and
    /// apply environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("OTTER_SYNC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Catalog walk settings
    pub fn pagination(&self) -> PaginationConfig {
        PaginationConfig {
            folder_id: self.catalog.folder_id,
            source: self.catalog.source,
            page_size: self.catalog.page_size,
            max_pages: self.catalog.max_pages,
            limit: None,
        }
    }

    /// Run settings, with `~` expanded in the destination
    pub fn sync_config(&self) -> Result<SyncConfig> {
        let delay = Duration::try_from_secs_f64(self.sync.delay_secs)
            .context("sync.delay_secs must be a non-negative number of seconds")?;

        Ok(SyncConfig {
            destination: expand_path(&self.sync.destination),
            format: self.sync.format,
            overwrite: self.sync.overwrite,
            delay,
            min_length: self.sync.min_length,
            max_downloads: self.sync.max_downloads,
            include_metadata: self.sync.include_metadata,
        })
    }
}

/// Expand a leading `~` to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
