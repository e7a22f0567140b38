use super::format::ExportFormat;
use crate::catalog::{CatalogItem, UNTITLED};

/// Longest slug kept in a transcript filename
pub const MAX_SLUG_LENGTH: usize = 80;

/// Turn a title into a filesystem-safe slug, preserving case
///
/// Whitespace, `/`, `|` and `_` become hyphens, anything that is not
/// alphanumeric, `-` or `.` is dropped, hyphen runs collapse and the result
/// is cut to `max_length` characters. Empty results become `Untitled`.
pub fn slugify(text: &str, max_length: usize) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut previous_hyphen = false;

    for ch in text.trim().chars() {
        let mapped = if ch.is_whitespace() || matches!(ch, '/' | '|' | '_' | '-') {
            '-'
        } else if ch.is_alphanumeric() || ch == '.' {
            ch
        } else {
            continue;
        };

        if mapped == '-' {
            if previous_hyphen {
                continue;
            }
            previous_hyphen = true;
        } else {
            previous_hyphen = false;
        }
        slug.push(mapped);
    }

    let trimmed = slug.trim_matches('-');
    let truncated: String = trimmed.chars().take(max_length).collect();
    let truncated = truncated.trim_end_matches('-');

    if truncated.is_empty() {
        UNTITLED.to_string()
    } else {
        truncated.to_string()
    }
}

/// `<slug>_<speech_id>.<ext>`; the embedded id is what dedup looks for
pub fn transcript_filename(item: &CatalogItem, format: ExportFormat) -> String {
    format!(
        "{}_{}.{}",
        slugify(item.display_title(), MAX_SLUG_LENGTH),
        item.speech_id,
        format.extension()
    )
}

/// Suffix every file downloaded for `speech_id` ends with
pub fn dedup_suffix(speech_id: &str, format: ExportFormat) -> String {
    format!("_{}.{}", speech_id, format.extension())
}
