//! Error types for the upstream client
//!
//! Credential rejection is not an error: it is reported through
//! [`crate::client::AuthOutcome::Rejected`]. Everything here is either a
//! fault that stops the run (transport, API, not authenticated) or a
//! per-item failure the sync runner absorbs (export failed, missing otid).

use thiserror::Error;

/// Result type alias for client operations
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Errors raised while talking to the transcription service
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection-level failure (DNS, TLS, timeout, reset)
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status outside of exports
    #[error("upstream returned HTTP {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or explanation
        message: String,
    },

    /// Response body could not be decoded
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A call was made on a session that never logged in
    #[error("not authenticated, please login first")]
    NotAuthenticated,

    /// Export call for a single speech did not return 200
    #[error("download failed: {title} (server error {status})")]
    ExportFailed {
        /// HTTP status code of the export response
        status: u16,
        /// Title of the speech that failed
        title: String,
    },

    /// The listing carried no transport id for this speech
    #[error("speech {speech_id} has no otid, cannot export")]
    MissingOtid {
        /// Stable id of the speech
        speech_id: String,
    },
}

impl ClientError {
    /// Whether this failure only concerns one speech and the run may continue
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            ClientError::ExportFailed { .. } | ClientError::MissingOtid { .. }
        )
    }
}

/// Classify an upstream error message as a credential rejection
pub fn is_credential_rejection(message: &str) -> bool {
    let lowered = message.to_lowercase();
    lowered.contains("unauthorized") || lowered.contains("invalid")
}
