use super::{create_test_client, server_url};
use chrono::{TimeZone, Utc};
use futures::StreamExt;
use sumi_robots::sitemap::SitemapOptions;
use sumi_robots::{RobotsTxt, SitemapError, UrlSetItem};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn url_set(server: &MockServer, pages: &[(&str, Option<&str>)]) -> String {
    let urls: String = pages
        .iter()
        .map(|(page, lastmod)| match lastmod {
            Some(lastmod) => format!(
                "<url><loc>{}{}</loc><lastmod>{}</lastmod></url>",
                server.uri(),
                page,
                lastmod
            ),
            None => format!("<url><loc>{}{}</loc></url>", server.uri(), page),
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        urls
    )
}

fn sitemap_index(server: &MockServer, children: &[(&str, &str)]) -> String {
    let sitemaps: String = children
        .iter()
        .map(|(child, lastmod)| {
            format!(
                "<sitemap><loc>{}{}</loc><lastmod>{}</lastmod></sitemap>",
                server.uri(),
                child,
                lastmod
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        sitemaps
    )
}

async fn mount_xml(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/xml"))
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn load(server: &MockServer) -> RobotsTxt {
    create_test_client()
        .load_robots_txt(&server_url(server, "/"))
        .await
        .unwrap()
}

fn paths(items: Vec<Result<UrlSetItem, SitemapError>>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.unwrap().location.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_default_sitemap_location() {
    let mock_server = MockServer::start().await;

    mount_robots(&mock_server, "User-agent: *\nAllow: /\n".to_string()).await;
    mount_xml(
        &mock_server,
        "/sitemap.xml",
        url_set(&mock_server, &[("/a", None), ("/b", Some("2024-01-15"))]),
    )
    .await;

    let client = create_test_client();
    let robots = load(&mock_server).await;
    let items: Vec<_> = robots
        .load_sitemap(&client, SitemapOptions::default())
        .collect()
        .await;

    assert_eq!(paths(items), vec!["/a", "/b"]);
}

#[tokio::test]
async fn test_sitemap_index_is_resolved() {
    let mock_server = MockServer::start().await;

    mount_robots(
        &mock_server,
        format!("Sitemap: {}/sitemap_index.xml\n\nUser-agent: *\nAllow: /\n", mock_server.uri()),
    )
    .await;
    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        sitemap_index(
            &mock_server,
            &[("/sitemap-pages.xml", "2024-01-10"), ("/sitemap-text.txt", "2024-01-10")],
        ),
    )
    .await;
    mount_xml(
        &mock_server,
        "/sitemap-pages.xml",
        url_set(&mock_server, &[("/page-1", None), ("/page-2", None)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/sitemap-text.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "{0}/page-2\n\n{0}/page-3\n",
            mock_server.uri()
        )))
        .mount(&mock_server)
        .await;

    let client = create_test_client();
    let robots = load(&mock_server).await;
    let items: Vec<_> = robots
        .load_sitemap(&client, SitemapOptions::default())
        .collect()
        .await;

    assert_eq!(paths(items), vec!["/page-1", "/page-2", "/page-3"]);
}

#[tokio::test]
async fn test_modified_since_filters_index_and_pages() {
    let mock_server = MockServer::start().await;

    mount_robots(
        &mock_server,
        format!("Sitemap: {}/sitemap_index.xml\n", mock_server.uri()),
    )
    .await;
    mount_xml(
        &mock_server,
        "/sitemap_index.xml",
        sitemap_index(
            &mock_server,
            &[("/old.xml", "2023-01-01"), ("/new.xml", "2024-06-01")],
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/old.xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_xml(
        &mock_server,
        "/new.xml",
        url_set(
            &mock_server,
            &[
                ("/stale", Some("2023-12-31")),
                ("/fresh", Some("2024-06-01T08:00:00Z")),
                ("/undated", None),
            ],
        ),
    )
    .await;

    let client = create_test_client();
    let robots = load(&mock_server).await;
    let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let items: Vec<_> = robots
        .load_sitemap(&client, SitemapOptions::default().modified_since(since))
        .collect()
        .await;

    assert_eq!(paths(items), vec!["/fresh", "/undated"]);
}

#[tokio::test]
async fn test_index_cycle_terminates() {
    let mock_server = MockServer::start().await;

    mount_robots(&mock_server, format!("Sitemap: {}/a.xml\n", mock_server.uri())).await;
    mount_xml(
        &mock_server,
        "/a.xml",
        sitemap_index(&mock_server, &[("/b.xml", "2024-01-01")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/b.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            sitemap_index(&mock_server, &[("/a.xml", "2024-01-01"), ("/pages.xml", "2024-01-01")]),
            "application/xml",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_xml(
        &mock_server,
        "/pages.xml",
        url_set(&mock_server, &[("/only-page", None)]),
    )
    .await;

    let client = create_test_client();
    let robots = load(&mock_server).await;
    let items: Vec<_> = robots
        .load_sitemap(&client, SitemapOptions::default())
        .collect()
        .await;

    assert_eq!(paths(items), vec!["/only-page"]);
}

#[tokio::test]
async fn test_missing_sitemap_contributes_nothing() {
    let mock_server = MockServer::start().await;

    mount_robots(
        &mock_server,
        format!(
            "Sitemap: {0}/missing.xml\nSitemap: {0}/present.xml\n",
            mock_server.uri()
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_xml(
        &mock_server,
        "/present.xml",
        url_set(&mock_server, &[("/page", None)]),
    )
    .await;

    let client = create_test_client();
    let robots = load(&mock_server).await;
    let items: Vec<_> = robots
        .load_sitemap(&client, SitemapOptions::default())
        .collect()
        .await;

    assert_eq!(paths(items), vec!["/page"]);
}

#[tokio::test]
async fn test_malformed_sitemap_ends_stream_with_error() {
    let mock_server = MockServer::start().await;

    mount_robots(&mock_server, "User-agent: *\n".to_string()).await;
    mount_xml(
        &mock_server,
        "/sitemap.xml",
        url_set(&mock_server, &[("/page", Some("not-a-date"))]),
    )
    .await;

    let client = create_test_client();
    let robots = load(&mock_server).await;
    let items: Vec<_> = robots
        .load_sitemap(&client, SitemapOptions::default())
        .collect()
        .await;

    assert_eq!(items.len(), 1);
    assert!(matches!(items[0], Err(SitemapError::InvalidDate { .. })));
}
