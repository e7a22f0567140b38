use serde::{Deserialize, Serialize};

/// Title used when a speech has none
pub const UNTITLED: &str = "Untitled";

/// Which part of the account the listing covers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Speeches recorded by the user
    #[default]
    Owned,
    /// Speeches shared with the user
    Shared,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Owned => "owned",
            Source::Shared => "shared",
        }
    }
}

/// Opaque pagination token returned by a listing page
///
/// Passed back to the next request exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a raw token, rejecting empty ones
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Build from the JSON value upstream put in `last_load_ts`
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Self::new(s.clone()),
            serde_json::Value::Number(n) => Self::new(n.to_string()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A participant of a speech
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub name: String,

    /// Number of transcript segments attributed to this speaker
    pub utterances: usize,
}

/// One recorded and transcribed speech
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Stable identifier, the only key used for dedup
    pub speech_id: String,

    /// Transport identifier, needed only by the export call
    pub otid: Option<String>,

    pub title: Option<String>,

    /// Epoch seconds
    pub created_at: Option<i64>,
    pub start_time: Option<i64>,
    pub displayed_start_time: Option<i64>,

    /// Transcript or summary text carried by the listing, if any
    pub transcript: Option<String>,
    pub summary: Option<String>,

    pub speakers: Vec<Speaker>,
    pub topics: Vec<String>,

    pub duration_secs: Option<f64>,
    pub is_meeting: bool,
}

impl CatalogItem {
    /// Title for display and filenames, `Untitled` when missing or empty
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => UNTITLED,
        }
    }

    /// Creation time in epoch seconds: first present of created, start and
    /// displayed start time
    pub fn creation_time(&self) -> Option<i64> {
        self.created_at
            .or(self.start_time)
            .or(self.displayed_start_time)
    }

    /// Text the length filter applies to: the transcript, falling back to
    /// the summary when the transcript is absent or empty
    pub fn filter_text(&self) -> Option<&str> {
        [self.transcript.as_deref(), self.summary.as_deref()]
            .into_iter()
            .flatten()
            .find(|text| !text.is_empty())
    }
}

/// One result of the listing endpoint, already normalized
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub items: Vec<CatalogItem>,
    pub end_of_list: bool,
    pub cursor: Option<Cursor>,

    /// Entries upstream sent, counting any dropped as unreadable
    pub received: usize,
}

impl Page {
    pub fn new(items: Vec<CatalogItem>, end_of_list: bool, cursor: Option<Cursor>) -> Self {
        let received = items.len();
        Self {
            items,
            end_of_list,
            cursor,
            received,
        }
    }

    /// Page that carries nothing and ends the listing
    pub fn empty() -> Self {
        Self::new(Vec::new(), true, None)
    }

    /// Size of the batch as upstream returned it
    pub fn batch_size(&self) -> usize {
        self.received.max(self.items.len())
    }
}
