//! Sync orchestration
//!
//! This module provides the `SyncRunner` abstraction that manages:
//! - Catalog pagination through a `TranscriptService`
//! - Per-item planning against the destination directory
//! - Sequential, paced downloads with per-item failure isolation
//! - Run statistics

mod config;
mod planner;
mod runner;
mod stats;

pub use self::config::{SyncConfig, DEFAULT_DESTINATION};
pub use planner::{already_downloaded, plan, SyncDecision};
pub use runner::SyncRunner;
pub use stats::RunStats;
