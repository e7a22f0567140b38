// Tests for listing response normalization
//
// Every envelope the speeches endpoint has been seen returning must become
// the same normalized Page.

use otter_sync::client::normalize_listing;
use otter_sync::Cursor;
use serde_json::json;

fn body(value: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&value).unwrap()
}

#[test]
fn test_wrapped_speeches_envelope() {
    let page = normalize_listing(&body(json!({
        "status": 200,
        "data": {
            "speeches": [
                { "speech_id": "a", "otid": "oa", "title": "One" },
                { "speech_id": "b", "otid": "ob", "title": "Two" }
            ],
            "end_of_list": false,
            "last_load_ts": 1700000000.5
        }
    })));

    assert_eq!(page.items.len(), 2);
    assert!(!page.end_of_list);
    assert_eq!(page.cursor, Cursor::new("1700000000.5"));
}

#[test]
fn test_results_envelope() {
    let page = normalize_listing(&body(json!({
        "status": 200,
        "data": { "results": [ { "speech_id": "a" } ] }
    })));

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].speech_id, "a");
    assert!(page.end_of_list);
    assert_eq!(page.cursor, None);
}

#[test]
fn test_bare_array_envelope() {
    let page = normalize_listing(&body(json!({
        "status": 200,
        "data": [ { "speech_id": "a" }, { "speech_id": "b" } ]
    })));

    assert_eq!(page.items.len(), 2);
    assert!(page.end_of_list);
}

#[test]
fn test_unwrapped_body() {
    let page = normalize_listing(&body(json!({
        "status": "OK",
        "speeches": [ { "speech_id": "a" } ],
        "end_of_list": true,
        "last_load_ts": "1700000000"
    })));

    assert_eq!(page.items.len(), 1);
    assert!(page.end_of_list);
    assert_eq!(page.cursor, Cursor::new("1700000000"));
}

#[test]
fn test_missing_end_flag_means_final() {
    let page = normalize_listing(&body(json!({
        "data": { "speeches": [ { "speech_id": "a" } ] }
    })));

    assert!(page.end_of_list);
}

#[test]
fn test_malformed_shapes_become_empty_final_page() {
    for raw in [
        body(json!({ "status": 200 })),
        body(json!({ "status": 200, "data": null })),
        body(json!({ "status": 200, "data": "unexpected" })),
        body(json!({ "status": 200, "data": { "speeches": "nope" } })),
        b"<html>Bad Gateway</html>".to_vec(),
        Vec::new(),
    ] {
        let page = normalize_listing(&raw);
        assert!(page.items.is_empty());
        assert!(page.end_of_list);
        assert_eq!(page.cursor, None);
    }
}

#[test]
fn test_entries_without_id_are_dropped() {
    let page = normalize_listing(&body(json!({
        "data": {
            "speeches": [
                { "speech_id": "good", "otid": "og" },
                { "otid": "no-id" },
                { "speech_id": "" },
                "not an object",
                { "speech_id": 4711 }
            ],
            "end_of_list": true
        }
    })));

    let ids: Vec<_> = page.items.iter().map(|s| s.speech_id.as_str()).collect();
    assert_eq!(ids, vec!["good", "4711"]);
    assert_eq!(page.received, 5);
}

#[test]
fn test_mistyped_optional_fields_keep_the_speech() {
    let page = normalize_listing(&body(json!({
        "data": {
            "speeches": [
                { "speech_id": "a", "topics": [ { "id": 7 }, "kept" ] },
                { "speech_id": "b", "created_at": "2023-01-01", "start_time": 1700000000 },
                { "speech_id": "c", "title": 12, "duration": "n/a", "otid": "oc" },
                { "speech_id": "d", "speakers": "everyone", "is_meeting": "yes" }
            ],
            "end_of_list": true
        }
    })));

    assert_eq!(page.items.len(), 4);
    assert_eq!(page.items[0].topics, vec!["kept"]);
    assert_eq!(page.items[1].created_at, None);
    assert_eq!(page.items[1].creation_time(), Some(1_700_000_000));
    assert_eq!(page.items[2].display_title(), "Untitled");
    assert_eq!(page.items[2].duration_secs, None);
    assert_eq!(page.items[2].otid.as_deref(), Some("oc"));
    assert!(page.items[3].speakers.is_empty());
    assert!(!page.items[3].is_meeting);
}

#[test]
fn test_speech_metadata_fields() {
    let page = normalize_listing(&body(json!({
        "data": {
            "speeches": [{
                "speech_id": "a",
                "otid": "oa",
                "title": "Planning",
                "start_time": 1700000000,
                "summary": "We planned.",
                "duration": 1800.0,
                "is_meeting": true,
                "speakers": [
                    { "id": 1, "speaker_name": "Alice" },
                    { "id": 2, "speaker_name": "Bob" }
                ],
                "transcripts": [
                    { "speaker_id": 1 }, { "speaker_id": 2 }, { "speaker_id": 1 }
                ],
                "keywords": [ "roadmap", { "text": "budget" } ]
            }],
            "end_of_list": true
        }
    })));

    let speech = &page.items[0];
    assert_eq!(speech.creation_time(), Some(1_700_000_000));
    assert_eq!(speech.filter_text(), Some("We planned."));
    assert_eq!(speech.duration_secs, Some(1800.0));
    assert!(speech.is_meeting);
    assert_eq!(speech.speakers.len(), 2);
    assert_eq!(speech.speakers[0].name, "Alice");
    assert_eq!(speech.speakers[0].utterances, 2);
    assert_eq!(speech.speakers[1].utterances, 1);
    assert_eq!(speech.topics, vec!["roadmap", "budget"]);
}
