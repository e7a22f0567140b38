//! Session/auth gateway to the Otter.ai HTTP API
//!
//! - `session`: login, listing and export calls
//! - `messages`: response bodies and listing shape normalization
//! - `service`: the [`TranscriptService`] seam the sync core is written against

pub mod messages;
pub mod service;
pub mod session;

/// Base URL of the upstream API
pub const DEFAULT_BASE_URL: &str = "https://otter.ai/forward/api/v1";

pub use messages::normalize_listing;
pub use service::{PageRequest, TranscriptService};
pub use session::{authenticate, AuthOutcome, AuthState, Session};
