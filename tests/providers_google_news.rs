// tests/providers_google_news.rs
use fdi_latam_monitor::ingest::providers::google_news_rss::GoogleNewsRss;
use fdi_latam_monitor::ingest::types::CandidateSource;
use fdi_latam_monitor::record::Origin;

const FIXTURE: &str = include_str!("fixtures/google_news_rss.xml");

#[tokio::test]
async fn fixture_yields_feed_candidates() {
    let src = GoogleNewsRss::from_fixture(FIXTURE);
    let items = src.fetch_candidates().await.expect("parse fixture");
    assert_eq!(items.len(), 4);

    let first = &items[0];
    assert_eq!(
        first.title,
        "Automaker announces greenfield factory expansion project in Mexico - Reuters"
    );
    assert_eq!(
        first.summary_snippet,
        "Automaker announces greenfield factory expansion project in Mexico Reuters"
    );
    assert_eq!(first.url, "https://news.example.test/articles/mexico-factory");
    assert_eq!(first.source_name, "Reuters");
    assert_eq!(first.published, "Mon, 14 Oct 2024 07:00:00 GMT");
    assert_eq!(first.origin, Origin::Feed);
    assert!(first.raw_text.is_empty());

    // no <source> element
    assert_eq!(items[2].source_name, "Google News");
}

#[tokio::test]
async fn file_snapshot_is_read_from_disk() {
    let src = GoogleNewsRss::from_path("tests/fixtures/google_news_rss.xml");
    let items = src.fetch_candidates().await.expect("read fixture file");
    assert_eq!(items.len(), 4);
    assert_eq!(items[1].source_name, "BNamericas");
}

#[tokio::test]
async fn missing_snapshot_is_an_error() {
    let src = GoogleNewsRss::from_path("tests/fixtures/does_not_exist.xml");
    assert!(src.fetch_candidates().await.is_err());
    assert_eq!(src.name(), "Google News");
}
