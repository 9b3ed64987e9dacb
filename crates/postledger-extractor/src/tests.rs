//! Tests for link extraction

use crate::{extract_link, LinkExtractor};

#[test]
fn test_bare_link() {
    assert_eq!(
        extract_link("https://t.me/news/123").as_deref(),
        Some("https://t.me/news/123")
    );
}

#[test]
fn test_link_inside_prose() {
    let text = "Forwarded from @news:\nsee https://t.me/news/456, it is big";
    assert_eq!(extract_link(text).as_deref(), Some("https://t.me/news/456"));
}

#[test]
fn test_telegram_me_alias_and_http() {
    assert_eq!(
        extract_link("http://telegram.me/some_channel/7").as_deref(),
        Some("http://telegram.me/some_channel/7")
    );
}

#[test]
fn test_channel_only() {
    assert_eq!(
        extract_link("join https://t.me/my_channel today").as_deref(),
        Some("https://t.me/my_channel")
    );
}

#[test]
fn test_post_id_with_sub_path() {
    assert_eq!(
        extract_link("https://t.me/c/1234/56").as_deref(),
        Some("https://t.me/c/1234/56")
    );
    assert_eq!(
        extract_link("https://t.me/news/99/comments?x=1").as_deref(),
        Some("https://t.me/news/99/comments")
    );
}

#[test]
fn test_alphanumeric_segment_not_truncated() {
    assert_eq!(
        extract_link("https://t.me/news/123abc").as_deref(),
        Some("https://t.me/news/123abc")
    );
}

#[test]
fn test_first_of_many() {
    let text = "https://t.me/first/1 and https://t.me/second/2";
    assert_eq!(extract_link(text).as_deref(), Some("https://t.me/first/1"));
}

#[test]
fn test_no_link() {
    assert_eq!(extract_link(""), None);
    assert_eq!(extract_link("just some words"), None);
    assert_eq!(extract_link("https://example.com/news/1"), None);
    assert_eq!(extract_link("t.me/news/1"), None);
}

#[test]
fn test_host_lookalikes_rejected() {
    assert_eq!(extract_link("https://t.me.evil.com/news/1"), None);
    assert_eq!(extract_link("https://nott.me/news/1"), None);
    assert_eq!(extract_link("https://t.me/"), None);
}

#[test]
fn test_owned_extractor_matches_shared() {
    let extractor = LinkExtractor::new();
    let text = "see https://t.me/news/42";
    assert!(extractor.contains_link(text));
    assert_eq!(extractor.extract(text), extract_link(text));
    assert!(!extractor.contains_link("nothing"));
}
