use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::{CatalogItem, Cursor, Page, Speaker};

/// Login response body
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub userid: Option<Value>,
}

/// Payload shapes the `speeches` endpoint has produced over time
///
/// Tried top to bottom; the first variant that fits wins.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListingData {
    Speeches {
        speeches: Vec<Value>,
        #[serde(default)]
        end_of_list: Option<bool>,
        #[serde(default)]
        last_load_ts: Option<Value>,
    },
    Results {
        results: Vec<Value>,
    },
    Bare(Vec<Value>),
}

/// Normalize a raw listing response body into a [`Page`]
///
/// The payload may sit under a `data` key or be the body itself. Bodies
/// that match no known shape become an empty, final page.
pub fn normalize_listing(body: &[u8]) -> Page {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            warn!("Listing response is not JSON, treating as end of list: {}", e);
            return Page::empty();
        }
    };

    let data = value.get("data").unwrap_or(&value);

    match ListingData::deserialize(data) {
        Ok(ListingData::Speeches {
            speeches,
            end_of_list,
            last_load_ts,
        }) => {
            let received = speeches.len();
            Page {
                items: parse_items(speeches),
                end_of_list: end_of_list.unwrap_or(true),
                cursor: last_load_ts.as_ref().and_then(Cursor::from_json),
                received,
            }
        }
        Ok(ListingData::Results { results }) => final_page(results),
        Ok(ListingData::Bare(speeches)) => final_page(speeches),
        Err(_) => {
            warn!("Unrecognized listing response shape, treating as end of list");
            Page::empty()
        }
    }
}

/// Shapes without pagination fields carry everything in one page
fn final_page(raw: Vec<Value>) -> Page {
    let received = raw.len();
    Page {
        items: parse_items(raw),
        end_of_list: true,
        cursor: None,
        received,
    }
}

fn parse_items(raw: Vec<Value>) -> Vec<CatalogItem> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value::<RawSpeech>(value) {
            Ok(speech) => {
                let id = speech.speech_id.as_ref().and_then(speech_id);
                match id {
                    Some(id) => Some(speech.into_item(id)),
                    None => {
                        warn!("Dropping speech without speech_id");
                        None
                    }
                }
            }
            Err(e) => {
                warn!("Dropping unreadable speech entry: {}", e);
                None
            }
        })
        .collect()
}

/// `speech_id` as a non-empty string; numeric ids are accepted
fn speech_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode an optional field, turning a value of the wrong type into `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decode a list field element by element, skipping elements that don't fit
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// One listing entry; only `speech_id` is required
#[derive(Debug, Deserialize)]
struct RawSpeech {
    #[serde(default)]
    speech_id: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    otid: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    created_at: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    start_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    displayed_start_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    transcript: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    speakers: Vec<RawSpeaker>,
    #[serde(default, deserialize_with = "lenient_list")]
    transcripts: Vec<RawSegment>,
    #[serde(default, alias = "keywords", deserialize_with = "lenient_list")]
    topics: Vec<RawTopic>,
    #[serde(default, deserialize_with = "lenient")]
    duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    is_meeting: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawSpeaker {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, alias = "name", deserialize_with = "lenient")]
    speaker_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    #[serde(default)]
    speaker_id: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTopic {
    Text(String),
    Tagged {
        #[serde(alias = "name")]
        text: String,
    },
}

impl RawSpeech {
    fn into_item(self, speech_id: String) -> CatalogItem {
        let segments = self.transcripts;

        let speakers = self
            .speakers
            .into_iter()
            .map(|speaker| {
                let utterances = match &speaker.id {
                    Some(id) => segments
                        .iter()
                        .filter(|s| s.speaker_id.as_ref() == Some(id))
                        .count(),
                    None => 0,
                };
                Speaker {
                    name: speaker
                        .speaker_name
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    utterances,
                }
            })
            .collect();

        let topics = self
            .topics
            .into_iter()
            .map(|topic| match topic {
                RawTopic::Text(text) | RawTopic::Tagged { text } => text,
            })
            .collect();

        debug!("Parsed speech {}", speech_id);

        CatalogItem {
            speech_id,
            otid: self.otid.filter(|o| !o.is_empty()),
            title: self.title,
            created_at: self.created_at.map(|t| t as i64),
            start_time: self.start_time.map(|t| t as i64),
            displayed_start_time: self.displayed_start_time.map(|t| t as i64),
            transcript: self.transcript,
            summary: self.summary,
            speakers,
            topics,
            duration_secs: self.duration,
            is_meeting: self.is_meeting.unwrap_or(false),
        }
    }
}
