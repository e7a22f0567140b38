use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::messages::{normalize_listing, LoginResponse};
use super::service::{PageRequest, TranscriptService};
use crate::catalog::{CatalogItem, Page};
use crate::config::ServiceConfig;
use crate::error::{is_credential_rejection, ClientError, ClientResult};
use crate::output::ExportFormat;

const REFERER: &str = "https://otter.ai/";

/// Formatting flags sent with every export: speaker names on, timestamps
/// off, same-speaker segments merged, highlights and annotations off
const EXPORT_FLAGS: [(&str, &str); 9] = [
    ("speaker_names", "1"),
    ("speaker_timestamps", "0"),
    ("merge_same_speaker_segments", "1"),
    ("show_highlights", "0"),
    ("inline_pictures", "0"),
    ("monologue", "0"),
    ("highlight_only", "0"),
    ("branding", "false"),
    ("annotations", "0"),
];

/// Whether a session has logged in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
}

/// Result of a login attempt
#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated(Session),
    /// Upstream refused the credentials
    Rejected { reason: String },
}

/// One connection to the transcription service
///
/// Holds the HTTP client (with its cookie store), the user id returned by
/// login and the CSRF token the export endpoint requires.
#[derive(Debug)]
pub struct Session {
    http: reqwest::Client,
    base_url: String,
    user_id: Option<String>,
    csrf_token: Option<String>,
    state: AuthState,
}

/// Log in and hand back an authenticated session, or the rejection
pub async fn authenticate(
    config: &ServiceConfig,
    username: &str,
    password: &str,
) -> ClientResult<AuthOutcome> {
    let mut session = Session::connect(config)?;
    match session.login(username, password).await? {
        None => Ok(AuthOutcome::Authenticated(session)),
        Some(reason) => Ok(AuthOutcome::Rejected { reason }),
    }
}

impl Session {
    /// Build an unauthenticated session
    pub fn connect(config: &ServiceConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_id: None,
            csrf_token: None,
            state: AuthState::Unauthenticated,
        })
    }

    /// Log in with basic auth
    ///
    /// Returns `Ok(None)` on success and `Ok(Some(reason))` when the
    /// credentials were refused. Any other failure is an error.
    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<Option<String>> {
        info!("Logging in to {} as {}", self.base_url, username);

        let response = self
            .http
            .get(self.endpoint("login"))
            .query(&[("username", username)])
            .basic_auth(username, Some(password))
            .send()
            .await?;

        let status = response.status();
        let csrf_token = response
            .cookies()
            .find(|cookie| cookie.name() == "csrftoken")
            .map(|cookie| cookie.value().to_string());
        let body = response.text().await?;

        if !status.is_success() {
            let message = format!("{} {}", status, body.trim());
            if status == StatusCode::UNAUTHORIZED
                || status == StatusCode::FORBIDDEN
                || is_credential_rejection(&message)
            {
                warn!("Login rejected: {}", message);
                self.state = AuthState::Unauthenticated;
                return Ok(Some(message));
            }
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let login: LoginResponse = serde_json::from_str(&body)?;
        let user_id = match login.userid {
            Some(Value::String(id)) if !id.is_empty() => id,
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message: "login response carried no userid".to_string(),
                })
            }
        };

        if csrf_token.is_none() {
            warn!("Login response set no csrftoken cookie, exports may be refused");
        }

        info!("Authenticated as user {}", user_id);
        self.user_id = Some(user_id);
        self.csrf_token = csrf_token;
        self.state = AuthState::Authenticated;
        Ok(None)
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    fn require_user(&self) -> ClientResult<&str> {
        match (self.state, self.user_id.as_deref()) {
            (AuthState::Authenticated, Some(user_id)) => Ok(user_id),
            _ => Err(ClientError::NotAuthenticated),
        }
    }
}

#[async_trait::async_trait]
impl TranscriptService for Session {
    async fn list_page(&self, request: &PageRequest) -> ClientResult<Page> {
        let user_id = self.require_user()?;

        let mut query = vec![
            ("userid", user_id.to_string()),
            ("folder", request.folder_id.to_string()),
            ("page_size", request.page_size.to_string()),
            ("source", request.source.as_str().to_string()),
        ];
        if let Some(cursor) = &request.cursor {
            query.push(("last_load_ts", cursor.as_str().to_string()));
        }

        debug!(
            "Listing speeches (page_size={}, cursor={:?})",
            request.page_size, request.cursor
        );

        let response = self
            .http
            .get(self.endpoint("speeches"))
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        Ok(normalize_listing(&body))
    }

    async fn fetch_transcript(
        &self,
        item: &CatalogItem,
        format: ExportFormat,
    ) -> ClientResult<Vec<u8>> {
        let user_id = self.require_user()?;
        let otid = item
            .otid
            .as_deref()
            .ok_or_else(|| ClientError::MissingOtid {
                speech_id: item.speech_id.clone(),
            })?;

        let mut request = self
            .http
            .post(self.endpoint("bulk_export"))
            .query(&[("userid", user_id)])
            .query(&EXPORT_FLAGS)
            .header("referer", REFERER)
            .form(&[("formats", format.extension()), ("speech_otid_list", otid)]);

        if let Some(token) = &self.csrf_token {
            request = request.header("x-csrftoken", token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ClientError::ExportFailed {
                status: status.as_u16(),
                title: item.display_title().to_string(),
            });
        }

        let bytes = response.bytes().await?;
        debug!("Exported {} ({} bytes)", item.speech_id, bytes.len());
        Ok(bytes.to_vec())
    }
}
