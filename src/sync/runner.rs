use anyhow::{Context, Result};
use futures::stream::TryStreamExt;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::config::SyncConfig;
use super::planner::{plan, SyncDecision};
use super::stats::RunStats;
use crate::catalog::{CatalogItem, PaginationConfig, Paginator};
use crate::client::TranscriptService;
use crate::output::DestinationWriter;

/// Drives one sync: walk the catalog, plan each item, download and write
///
/// Strictly sequential. A failed export or write is counted and the run
/// moves on; only listing failures and an unreadable destination abort it.
pub struct SyncRunner<'a, S: TranscriptService + ?Sized> {
    /// Upstream the catalog is read from
    service: &'a S,

    /// How the catalog is walked
    pagination: PaginationConfig,

    /// Run configuration
    config: SyncConfig,

    writer: DestinationWriter,
}

impl<'a, S: TranscriptService + ?Sized> SyncRunner<'a, S> {
    pub fn new(service: &'a S, pagination: PaginationConfig, config: SyncConfig) -> Self {
        let writer = DestinationWriter::new(
            config.destination.clone(),
            config.format,
            config.include_metadata,
        );

        Self {
            service,
            pagination,
            config,
            writer,
        }
    }

    /// Run to completion and return the counters
    pub async fn run(&self) -> Result<RunStats> {
        fs::create_dir_all(&self.config.destination).with_context(|| {
            format!(
                "Failed to create destination {}",
                self.config.destination.display()
            )
        })?;

        info!(
            "Syncing speeches to {} (format={}, overwrite={}, min_length={}, max_downloads={:?})",
            self.config.destination.display(),
            self.config.format,
            self.config.overwrite,
            self.config.min_length,
            self.config.max_downloads
        );

        let mut stats = RunStats::default();

        if self.cap_reached(&stats) {
            return Ok(stats);
        }

        let pages = Paginator::new(self.service, self.pagination.clone()).into_stream();
        futures::pin_mut!(pages);

        'pages: while let Some(page) = pages
            .try_next()
            .await
            .context("Failed to list speeches")?
        {
            for item in &page.items {
                stats.total += 1;

                let decision = plan(item, &self.config).with_context(|| {
                    format!(
                        "Failed to scan destination {}",
                        self.config.destination.display()
                    )
                })?;

                match decision {
                    SyncDecision::SkipExisting => {
                        stats.skipped += 1;
                        debug!("Already downloaded: {}", item.display_title());
                    }
                    SyncDecision::SkipFiltered { length } => {
                        stats.filtered += 1;
                        info!(
                            "Skipped: {} (too short - {} chars)",
                            item.display_title(),
                            length
                        );
                    }
                    SyncDecision::Download => {
                        match self.download(item).await {
                            Ok(path) => {
                                stats.downloaded += 1;
                                info!("Downloaded: {} -> {}", item.display_title(), path.display());
                            }
                            Err(e) => {
                                stats.errors += 1;
                                warn!("{:#}", e);
                            }
                        }

                        if !self.config.delay.is_zero() {
                            tokio::time::sleep(self.config.delay).await;
                        }

                        if self.cap_reached(&stats) {
                            break 'pages;
                        }
                    }
                }
            }
        }

        info!(
            "Sync finished: {} scanned, {} downloaded, {} skipped, {} filtered, {} errors",
            stats.total, stats.downloaded, stats.skipped, stats.filtered, stats.errors
        );

        Ok(stats)
    }

    /// Export one speech and write it out
    async fn download(&self, item: &CatalogItem) -> Result<PathBuf> {
        let body = self
            .service
            .fetch_transcript(item, self.config.format)
            .await
            .with_context(|| format!("Speech {}", item.speech_id))?;

        self.writer.write(item, &body)
    }

    fn cap_reached(&self, stats: &RunStats) -> bool {
        match self.config.max_downloads {
            Some(max) if stats.downloaded >= max => {
                info!("Downloaded maximum limit ({} files)", max);
                true
            }
            _ => false,
        }
    }
}
