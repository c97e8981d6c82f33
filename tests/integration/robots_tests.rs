use super::{create_test_client, server_url, USER_AGENT};
use sumi_robots::{ClientError, ProductToken, RobotsTxtError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_bot() -> ProductToken {
    ProductToken::parse("TestBot").unwrap()
}

fn other_bot() -> ProductToken {
    ProductToken::parse("OtherBot").unwrap()
}

#[tokio::test]
async fn test_robots_txt_is_parsed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "User-agent: TestBot\nDisallow: /private\nAllow: /private/open\nCrawl-delay: 5\n\nUser-agent: *\nDisallow: /\n",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client();
    let robots = client
        .load_robots_txt(&server_url(&mock_server, "/some/page?x=1"))
        .await
        .unwrap();

    assert!(robots.is_allowed(&test_bot(), "/"));
    assert!(!robots.is_allowed(&test_bot(), "/private/data"));
    assert!(robots.is_allowed(&test_bot(), "/private/open/data"));
    assert_eq!(robots.crawl_delay(&test_bot()), Some(5));

    assert!(!robots.is_allowed(&other_bot(), "/"));
    assert!(robots.is_allowed(&other_bot(), "/robots.txt"));
    assert_eq!(robots.crawl_delay(&other_bot()), None);
}

#[tokio::test]
async fn test_missing_robots_txt_allows_all() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = create_test_client();
    let robots = client
        .load_robots_txt(&server_url(&mock_server, "/"))
        .await
        .unwrap();

    assert!(robots.rules_for(&test_bot()).is_none());
    assert!(robots.is_allowed(&test_bot(), "/"));
    assert!(robots.is_allowed(&other_bot(), "/anything"));
}

#[tokio::test]
async fn test_server_error_denies_all() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = create_test_client();
    let robots = client
        .load_robots_txt(&server_url(&mock_server, "/"))
        .await
        .unwrap();

    assert!(robots.rules_for(&test_bot()).is_some());
    assert!(!robots.is_allowed(&test_bot(), "/"));
    assert!(!robots.is_allowed(&other_bot(), "/page"));
}

#[tokio::test]
async fn test_redirect_is_followed() {
    let mock_server = MockServer::start().await;

    let location = format!("{}/real-robots.txt", mock_server.uri());
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", location.as_str()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/real-robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /admin\n"))
        .mount(&mock_server)
        .await;

    let client = create_test_client();
    let robots = client
        .load_robots_txt(&server_url(&mock_server, "/"))
        .await
        .unwrap();

    assert!(!robots.is_allowed(&test_bot(), "/admin"));
    assert!(robots.is_allowed(&test_bot(), "/"));
}

#[tokio::test]
async fn test_host_and_sitemaps() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "Host: https://robots.example.com\nSitemap: https://robots.example.com/sitemap-a.xml\n\nUser-agent: *\nAllow: /\n",
        ))
        .mount(&mock_server)
        .await;

    let client = create_test_client();
    let robots = client
        .load_robots_txt(&server_url(&mock_server, "/"))
        .await
        .unwrap();

    assert_eq!(robots.host(), Some("robots.example.com"));
    assert_eq!(
        robots.sitemap_urls(),
        vec![url::Url::parse("https://robots.example.com/sitemap-a.xml").unwrap()]
    );
}

#[tokio::test]
async fn test_invalid_host_falls_back_to_origin() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Host: invalid/host\n"))
        .mount(&mock_server)
        .await;

    let client = create_test_client();
    let robots = client
        .load_robots_txt(&server_url(&mock_server, "/"))
        .await
        .unwrap();

    assert_eq!(robots.host(), None);
    assert_eq!(robots.host_or_default(), "127.0.0.1");
}

#[tokio::test]
async fn test_oversized_robots_txt_is_rejected() {
    let mock_server = MockServer::start().await;

    let mut body = String::from("User-agent: *\n");
    while body.len() <= 500 * 1024 {
        body.push_str("Disallow: /padding-to-push-the-document-over-the-ceiling\n");
    }

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let client = create_test_client();
    let result = client.load_robots_txt(&server_url(&mock_server, "/")).await;

    assert!(matches!(
        result,
        Err(ClientError::RobotsTxt(RobotsTxtError::ResourceLimitExceeded { limit: 512_000 }))
    ));
}
