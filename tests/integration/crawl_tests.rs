//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use crate::fixtures::{
    html_page, long_paragraph, mount_html, mount_html_expect, mount_never_fetched, pdf_bytes,
    Workspace,
};
use std::time::{Duration, Instant};
use site_ingest::crawler::crawl;
use site_ingest::output::{export_chunks, load_statistics};
use site_ingest::storage::{FileType, RunStatus, Storage};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let workspace = Workspace::new();

    let intro = long_paragraph("Welcome to the college.");
    mount_html(
        &mock_server,
        "/",
        html_page(
            "Home",
            &[("Welcome", intro.as_str()), ("Note", "Too short to keep.")],
            &["/about", "/about#team", "https://other.example/outside"],
        ),
    )
    .await;

    let history = long_paragraph("Founded in 1956.");
    let mission = long_paragraph("Our mission is teaching.");
    mount_html(
        &mock_server,
        "/about",
        html_page(
            "About",
            &[("History", &history), ("Mission", &mission)],
            &["/"],
        ),
    )
    .await;
    mount_never_fetched(&mock_server, "/nav-only").await;
    mount_never_fetched(&mock_server, "/footer-only").await;

    let summary = crawl(&workspace.config(&base_url), "hash")
        .await
        .expect("Crawl failed");

    assert_eq!(summary.pages_visited, 2, "Each page visited once");
    assert_eq!(summary.pages_failed, 0);
    assert_eq!(summary.records_written, 3);

    let storage = workspace.storage();
    let records = storage.indexable_records().unwrap();
    let keys: Vec<_> = records
        .iter()
        .map(|r| (r.title.as_str(), r.section_title.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![("Home", "Welcome"), ("About", "History"), ("About", "Mission")]
    );
    assert!(records.iter().all(|r| r.file_type == FileType::Html));

    let about = storage
        .find_by_url(&format!("{}/about", base_url))
        .unwrap()
        .expect("About page record");
    assert_eq!(about.content, history.trim());

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "hash");
    assert_eq!(run.pages_visited, 2);
    assert_eq!(run.records_written, 3);
}

#[tokio::test]
async fn test_excluded_and_media_links_never_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let workspace = Workspace::new();

    mount_html(
        &mock_server,
        "/",
        html_page(
            "Home",
            &[("Welcome", &long_paragraph("Hello."))],
            &[
                "/gallery/photo.jpg#x",
                "/gallery/index.html",
                "/media/campus.MP4",
                "/downloads/forms.zip",
            ],
        ),
    )
    .await;
    mount_never_fetched(&mock_server, "/gallery/photo.jpg").await;
    mount_never_fetched(&mock_server, "/gallery/index.html").await;
    mount_never_fetched(&mock_server, "/media/campus.MP4").await;
    mount_never_fetched(&mock_server, "/downloads/forms.zip").await;

    let mut config = workspace.config(&base_url);
    config.crawler.excluded_paths = vec!["/gallery".to_string()];

    let summary = crawl(&config, "hash").await.expect("Crawl failed");

    assert_eq!(summary.records_written, 1);
    assert_eq!(summary.pages_skipped, 4);
}

#[tokio::test]
async fn test_non_html_content_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let workspace = Workspace::new();

    mount_html(
        &mock_server,
        "/",
        html_page("Home", &[("Welcome", &long_paragraph("Hi."))], &["/feed"]),
    )
    .await;

    // JSON containing a link that must not be followed
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"next": "<a href=\"/hidden\">x</a>"}"#,
            "application/json",
        ))
        .mount(&mock_server)
        .await;
    mount_never_fetched(&mock_server, "/hidden").await;

    let summary = crawl(&workspace.config(&base_url), "hash")
        .await
        .expect("Crawl failed");

    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.pages_skipped, 1);
    assert_eq!(workspace.storage().count_distinct_urls().unwrap(), 1);
}

#[tokio::test]
async fn test_failed_pages_do_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let workspace = Workspace::new();

    mount_html(
        &mock_server,
        "/",
        html_page(
            "Home",
            &[("Welcome", &long_paragraph("Hi."))],
            &["/missing", "/broken", "/contact"],
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_html(
        &mock_server,
        "/contact",
        html_page("Contact", &[("Office", &long_paragraph("Call us."))], &[]),
    )
    .await;

    let summary = crawl(&workspace.config(&base_url), "hash")
        .await
        .expect("Crawl failed");

    // /missing is a wiremock 404, /broken a 500
    assert_eq!(summary.pages_visited, 4);
    assert_eq!(summary.pages_failed, 2);
    assert_eq!(summary.records_written, 2);
}

#[tokio::test]
async fn test_recrawl_is_idempotent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let workspace = Workspace::new();

    mount_html(
        &mock_server,
        "/",
        html_page(
            "Home",
            &[
                ("Welcome", &long_paragraph("Hi.")),
                ("Programs", &long_paragraph("We teach.")),
            ],
            &[],
        ),
    )
    .await;

    let config = workspace.config(&base_url);

    let first = crawl(&config, "hash").await.expect("First crawl failed");
    let after_first = workspace.storage().indexable_records().unwrap();

    let second = crawl(&config, "hash").await.expect("Second crawl failed");
    let after_second = workspace.storage().indexable_records().unwrap();

    assert_eq!(first.records_written, 2);
    assert_eq!(second.records_written, 0);
    assert_eq!(after_first, after_second);

    let storage = workspace.storage();
    let latest = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(latest.id, second.run_id);
    assert_ne!(first.run_id, second.run_id);
    assert_eq!(
        storage.get_run(first.run_id).unwrap().status,
        RunStatus::Completed
    );
}

#[tokio::test]
async fn test_concurrent_workers_visit_each_page_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let workspace = Workspace::new();

    let routes: Vec<String> = (0..12).map(|i| format!("/dept/{}", i)).collect();
    let all_links: Vec<&str> = routes.iter().map(String::as_str).collect();

    mount_html_expect(
        &mock_server,
        "/",
        html_page("Home", &[("Welcome", &long_paragraph("Hi."))], &all_links),
        1,
    )
    .await;

    for (i, route) in routes.iter().enumerate() {
        // Every page links to every other page and back home
        let mut links = all_links.clone();
        links.push("/");
        let heading = format!("Department {}", i);
        let body = long_paragraph(&heading);
        mount_html_expect(
            &mock_server,
            route,
            html_page(&heading, &[(heading.as_str(), body.as_str())], &links),
            1,
        )
        .await;
    }

    let mut config = workspace.config(&base_url);
    config.crawler.workers = 4;

    let summary = crawl(&config, "hash").await.expect("Crawl failed");

    assert_eq!(summary.pages_visited, 13);
    assert_eq!(summary.records_written, 13);
    assert_eq!(workspace.storage().count_distinct_urls().unwrap(), 13);
    // Mock expectations (one GET per page) are verified when the server drops
}

#[tokio::test]
async fn test_external_and_non_http_links_ignored() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let workspace = Workspace::new();

    mount_html(
        &mock_server,
        "/",
        html_page(
            "Home",
            &[("Welcome", &long_paragraph("Hi."))],
            &["https://example.org/", "mailto:office@example.org"],
        ),
    )
    .await;

    let summary = crawl(&workspace.config(&base_url), "hash")
        .await
        .expect("Crawl failed");

    assert_eq!(summary.pages_visited, 1);
}

#[tokio::test]
async fn test_stats_and_chunk_export_after_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let workspace = Workspace::new();

    let long_body = long_paragraph("Scholarships.").repeat(6);
    mount_html(
        &mock_server,
        "/",
        html_page(
            "Home",
            &[("Welcome", &long_paragraph("Hi.")), ("Funding", &long_body)],
            &[],
        ),
    )
    .await;

    crawl(&workspace.config(&base_url), "hash")
        .await
        .expect("Crawl failed");

    let storage = workspace.storage();
    let stats = load_statistics(&storage).unwrap();
    assert_eq!(stats.total_records, 2);
    assert_eq!(stats.records_by_file_type.get(&FileType::Html), Some(&2));
    assert_eq!(stats.latest_run.as_ref().unwrap().status, RunStatus::Completed);

    let export_path = workspace.dir.path().join("chunks.jsonl");
    let count = export_chunks(&storage, &export_path).unwrap();
    assert!(count >= 3, "Long section spans several windows");

    let lines = std::fs::read_to_string(&export_path).unwrap();
    assert_eq!(lines.lines().count(), count);
}

#[tokio::test]
async fn test_politeness_delay_follows_html_pages_only() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let workspace = Workspace::new();

    mount_html(
        &mock_server,
        "/",
        html_page(
            "Home",
            &[("Welcome", &long_paragraph("Hi."))],
            &[
                "/programs",
                "/gallery/1",
                "/gallery/2",
                "/logo.png",
                "/intro.mp4",
                "/a.pdf",
                "/b.pdf",
            ],
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/programs",
        html_page("Programs", &[("Degrees", &long_paragraph("We teach."))], &[]),
    )
    .await;
    for route in ["/a.pdf", "/b.pdf"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(pdf_bytes(&["Short notice."]), "application/pdf"),
            )
            .mount(&mock_server)
            .await;
    }

    let delay = Duration::from_millis(400);
    let mut config = workspace.config(&base_url);
    config.crawler.politeness_delay = delay.as_millis() as u64;
    config.crawler.excluded_paths = vec!["/gallery".to_string()];

    let start = Instant::now();
    let summary = crawl(&config, "hash").await.expect("Crawl failed");
    let elapsed = start.elapsed();

    assert_eq!(summary.pages_visited, 8);
    assert_eq!(summary.pages_skipped, 4);

    // Two HTML pages wait; the four skips and two documents do not
    assert!(elapsed >= delay * 2, "Delay not applied: {:?}", elapsed);
    assert!(elapsed < delay * 6, "Delay applied too often: {:?}", elapsed);
}

#[tokio::test]
async fn test_page_decoded_with_declared_charset() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let workspace = Workspace::new();

    let body = long_paragraph("Le café ouvre à huit heures.");
    let html = html_page("Cafétéria", &[("Horaires du café", body.as_str())], &[]);
    // Every character is below U+0100, so this is its ISO-8859-1 encoding
    let latin1: Vec<u8> = html.chars().map(|c| c as u8).collect();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(latin1, "text/html; charset=iso-8859-1"),
        )
        .mount(&mock_server)
        .await;

    crawl(&workspace.config(&base_url), "hash")
        .await
        .expect("Crawl failed");

    let record = workspace
        .storage()
        .find_by_url(&format!("{}/", base_url))
        .unwrap()
        .expect("Home record");
    assert_eq!(record.title, "Cafétéria");
    assert_eq!(record.section_title, "Horaires du café");
    assert!(record.content.starts_with("Le café ouvre à huit heures."));
}
