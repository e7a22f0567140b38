use crate::catalog::CatalogItem;
use chrono::{DateTime, SecondsFormat};
use std::fmt::Write;

/// How many topics make it into the header
pub const TOP_TOPICS: usize = 10;

/// Render the front-matter block prepended to text transcripts
///
/// Strings are emitted as JSON string literals, which YAML reads as
/// double-quoted scalars. Absent fields are left out.
pub fn render_header(item: &CatalogItem) -> String {
    let mut out = String::from("---\n");

    field(&mut out, "speech_id", &quoted(&item.speech_id));
    if let Some(otid) = &item.otid {
        field(&mut out, "otid", &quoted(otid));
    }
    field(&mut out, "title", &quoted(item.display_title()));

    for (key, value) in [
        ("created_at", item.created_at),
        ("start_time", item.start_time),
        ("displayed_start_time", item.displayed_start_time),
    ] {
        if let Some(iso) = value.and_then(iso_timestamp) {
            field(&mut out, key, &iso);
        }
    }

    if let Some(duration) = item.duration_secs {
        field(&mut out, "duration_secs", &duration.to_string());
    }
    field(&mut out, "is_meeting", &item.is_meeting.to_string());

    if !item.speakers.is_empty() {
        out.push_str("speakers:\n");
        for speaker in &item.speakers {
            let _ = writeln!(out, "  - name: {}", quoted(&speaker.name));
            let _ = writeln!(out, "    utterances: {}", speaker.utterances);
        }
    }

    if !item.topics.is_empty() {
        let topics: Vec<String> = item
            .topics
            .iter()
            .take(TOP_TOPICS)
            .map(|t| quoted(t))
            .collect();
        field(&mut out, "topics", &format!("[{}]", topics.join(", ")));
    }

    if let Some(summary) = item.summary.as_deref().filter(|s| !s.is_empty()) {
        field(&mut out, "summary", &quoted(summary));
    }

    out.push_str("---\n\n");
    out
}

/// Epoch seconds as RFC 3339 in UTC
pub fn iso_timestamp(epoch_secs: i64) -> Option<String> {
    DateTime::from_timestamp(epoch_secs, 0).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn field(out: &mut String, key: &str, value: &str) {
    let _ = writeln!(out, "{}: {}", key, value);
}

fn quoted(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}
