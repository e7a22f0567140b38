// Integration tests for the catalog paginator
//
// These tests verify the stop conditions of the cursor walk and that the
// cursor is threaded through requests unchanged.

mod common;

use anyhow::Result;
use common::{items, last_page, page, FakeService};
use futures::stream::TryStreamExt;
use otter_sync::catalog::{PaginationConfig, Paginator, MAX_PAGE_SIZE};
use otter_sync::client::normalize_listing;
use otter_sync::{Cursor, Page};
use serde_json::{json, Value};

#[tokio::test]
async fn test_short_third_page_ends_walk() -> Result<()> {
    let service = FakeService::with_pages(vec![
        page(items(0, 50), "1700000100"),
        page(items(50, 50), "1700000200"),
        page(items(100, 30), "1700000300"),
        page(items(130, 50), "1700000400"),
    ]);

    let mut paginator = Paginator::new(&service, PaginationConfig::default());
    let mut total = 0;
    let mut pages = 0;
    while let Some(page) = paginator.next_page().await? {
        total += page.items.len();
        pages += 1;
    }

    assert_eq!(total, 130);
    assert_eq!(pages, 3);
    assert_eq!(service.request_count(), 3, "No 4th request after a short page");

    Ok(())
}

#[tokio::test]
async fn test_cursor_threaded_unchanged() -> Result<()> {
    let service = FakeService::with_pages(vec![
        page(items(0, 50), "1700000100.25"),
        page(items(50, 50), "opaque-token"),
        last_page(items(100, 10)),
    ]);

    let all = Paginator::new(&service, PaginationConfig::default())
        .collect_items()
        .await?;
    assert_eq!(all.len(), 110);

    let requests = service.requests.lock().unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].cursor, None);
    assert_eq!(requests[1].cursor, Cursor::new("1700000100.25"));
    assert_eq!(requests[2].cursor, Cursor::new("opaque-token"));
    assert!(requests.iter().all(|r| r.page_size == 50 && r.folder_id == 0));

    Ok(())
}

#[tokio::test]
async fn test_page_ceiling_stops_endless_upstream() -> Result<()> {
    let service = FakeService::endless(page(items(0, 50), "1700000100"));

    let config = PaginationConfig {
        max_pages: 7,
        ..Default::default()
    };
    let mut paginator = Paginator::new(&service, config);
    let mut pages = 0;
    while paginator.next_page().await?.is_some() {
        pages += 1;
        assert!(pages <= 7, "Walk must stop at the page ceiling");
    }

    assert_eq!(pages, 7);
    assert_eq!(service.request_count(), 7);

    Ok(())
}

#[tokio::test]
async fn test_short_page_is_final_even_without_end_flag() -> Result<()> {
    let service = FakeService::with_pages(vec![
        page(items(0, 49), "1700000100"),
        page(items(49, 50), "1700000200"),
    ]);

    let all = Paginator::new(&service, PaginationConfig::default())
        .collect_items()
        .await?;

    assert_eq!(all.len(), 49);
    assert_eq!(service.request_count(), 1);

    Ok(())
}

fn listing(speeches: Vec<Value>, cursor: &str, end_of_list: bool) -> Page {
    let body = json!({
        "status": 200,
        "data": {
            "speeches": speeches,
            "end_of_list": end_of_list,
            "last_load_ts": cursor
        }
    });
    normalize_listing(&serde_json::to_vec(&body).unwrap())
}

fn raw_speeches(start: usize, count: usize) -> Vec<Value> {
    (start..start + count)
        .map(|i| json!({ "speech_id": format!("sp{:04}", i), "otid": format!("ot{}", i) }))
        .collect()
}

#[tokio::test]
async fn test_dropped_entry_does_not_shorten_page() -> Result<()> {
    let mut first = raw_speeches(0, 50);
    first[3] = json!({ "otid": "no-speech-id", "title": "Broken" });

    let service = FakeService::with_pages(vec![
        listing(first, "1700000100", false),
        listing(raw_speeches(50, 50), "1700000200", false),
        listing(raw_speeches(100, 10), "1700000300", false),
    ]);

    let all = Paginator::new(&service, PaginationConfig::default())
        .collect_items()
        .await?;

    assert_eq!(all.len(), 109);
    assert_eq!(service.request_count(), 3);

    Ok(())
}

#[tokio::test]
async fn test_missing_cursor_ends_walk() -> Result<()> {
    let full_without_cursor = Page::new(items(0, 50), false, None);
    let service =
        FakeService::with_pages(vec![full_without_cursor, page(items(50, 50), "1700000200")]);

    let all = Paginator::new(&service, PaginationConfig::default())
        .collect_items()
        .await?;

    assert_eq!(all.len(), 50);
    assert_eq!(service.request_count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_end_of_list_flag_ends_walk() -> Result<()> {
    let mut first = page(items(0, 50), "1700000100");
    first.end_of_list = true;
    let service = FakeService::with_pages(vec![first, page(items(50, 50), "1700000200")]);

    let all = Paginator::new(&service, PaginationConfig::default())
        .collect_items()
        .await?;

    assert_eq!(all.len(), 50);
    assert_eq!(service.request_count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_empty_page_yields_nothing() -> Result<()> {
    let service = FakeService::with_pages(vec![page(Vec::new(), "1700000100")]);

    let mut paginator = Paginator::new(&service, PaginationConfig::default());
    assert!(paginator.next_page().await?.is_none());
    assert!(paginator.next_page().await?.is_none());
    assert_eq!(service.request_count(), 1);

    Ok(())
}

#[tokio::test]
async fn test_prefix_mode_requests_large_page_and_truncates() -> Result<()> {
    let service = FakeService::with_pages(vec![page(items(0, 530), "1700000100")]);

    let all = Paginator::new(&service, PaginationConfig::prefix(25))
        .collect_items()
        .await?;

    assert_eq!(all.len(), 25);
    assert_eq!(service.request_count(), 1);
    assert_eq!(service.requests.lock().unwrap()[0].page_size, 25);

    Ok(())
}

#[tokio::test]
async fn test_prefix_mode_caps_page_size_at_upstream_ceiling() -> Result<()> {
    let service = FakeService::with_pages(vec![
        page(items(0, MAX_PAGE_SIZE), "1700000100"),
        page(items(MAX_PAGE_SIZE, MAX_PAGE_SIZE), "1700000200"),
    ]);

    let all = Paginator::new(&service, PaginationConfig::prefix(600))
        .collect_items()
        .await?;

    assert_eq!(all.len(), 600);
    let requests = service.requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.page_size == MAX_PAGE_SIZE));

    Ok(())
}

#[tokio::test]
async fn test_stream_yields_pages_lazily() -> Result<()> {
    let service = FakeService::with_pages(vec![
        page(items(0, 50), "1700000100"),
        last_page(items(50, 5)),
    ]);

    let stream = Paginator::new(&service, PaginationConfig::default()).into_stream();
    futures::pin_mut!(stream);

    let first = stream.try_next().await?.expect("first page");
    assert_eq!(first.items.len(), 50);
    assert_eq!(service.request_count(), 1, "Second page not fetched yet");

    let second = stream.try_next().await?.expect("second page");
    assert_eq!(second.items.len(), 5);
    assert!(stream.try_next().await?.is_none());
    assert_eq!(service.request_count(), 2);

    Ok(())
}
