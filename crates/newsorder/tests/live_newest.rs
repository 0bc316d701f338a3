//! Live run against news.ycombinator.com.
//!
//! Needs Chromium and network access:
//! `cargo test -p newsorder --features browser -- --ignored`

#![allow(clippy::expect_used, clippy::unwrap_used)]

use newsorder::{
    run_newest_scenario, with_news_page, BrowserConfig, Session, SessionConfig, SortBy,
    DEFAULT_SAMPLE_SIZE, PAGINATION_THRESHOLD,
};

fn config() -> SessionConfig {
    let mut browser = BrowserConfig::default().with_no_sandbox();
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        browser = browser.with_chromium_path(path);
    }
    SessionConfig::default().with_browser(browser)
}

#[tokio::test]
#[ignore = "requires chromium and network access"]
async fn sort_hacker_news_articles() {
    let session = Session::launch(config()).await.expect("launch chromium");
    let report = session.run_newest().await.expect("newest listing is sorted");

    assert_eq!(report.sort, SortBy::New);
    assert!(report.collected > PAGINATION_THRESHOLD);
    assert_eq!(report.ordering.checked, DEFAULT_SAMPLE_SIZE);
}

#[tokio::test]
#[ignore = "requires chromium and network access"]
async fn home_page_shows_title() {
    let session = Session::launch(config()).await.expect("launch chromium");
    let page = session.news_page().await.unwrap();
    let outcome = with_news_page(page, |page| Box::pin(page.goto(""))).await;
    session.close().await.unwrap();
    outcome.unwrap();
}

#[tokio::test]
#[ignore = "requires chromium and network access"]
async fn newest_via_fixture() {
    let session = Session::launch(config()).await.expect("launch chromium");
    let page = session.news_page().await.unwrap();
    let report = with_news_page(page, |page| Box::pin(run_newest_scenario(page))).await;
    session.close().await.unwrap();
    assert!(report.unwrap().pages >= 4);
}
