//! End-to-end tests for the blog feed pipeline: serve a feed document over
//! HTTP, run the full fetch-detect-extract-normalize pass, and check the
//! resulting post list.
//!
//! Each test mounts its own mock server so tests stay independent.

use atelier::blog::{latest_posts, Dialect, FetchError, MAX_POSTS};
use wiremock::matchers::{header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(body: &str) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("Content-Type", "application/xml"),
        )
        .mount(&mock_server)
        .await;
    mock_server
}

// ============================================================================
// Atom Feeds
// ============================================================================

#[tokio::test]
async fn test_atom_feed_full_pipeline() {
    let feed = r#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:media="http://search.yahoo.com/mrss/">
  <title>Studio Notebook</title>
  <entry>
    <title>New canvases for spring</title>
    <link rel="self" href="https://blog.example.com/feeds/1"/>
    <link rel="alternate" href="https://blog.example.com/2024/03/spring.html"/>
    <published>2024-03-10T09:00:00Z</published>
    <media:thumbnail url="https://img.example.com/a/b/s72-c/spring.jpg"/>
    <content type="html">&lt;p&gt;Fresh off the easel.&lt;/p&gt;</content>
  </entry>
  <entry>
    <title>Open studio weekend</title>
    <link rel="alternate" href="https://blog.example.com/2024/02/open-studio.html"/>
    <published>2024-02-20T12:00:00Z</published>
    <content type="html">&lt;p&gt;Come by! &lt;img src="https://img.example.com/open.jpg"&gt;&lt;/p&gt;</content>
  </entry>
  <entry>
    <title>Untitled notes</title>
    <link rel="alternate" href="https://blog.example.com/2024/01/notes.html"/>
    <published>2024-01-05T08:00:00Z</published>
  </entry>
</feed>"#;

    let server = serve(feed).await;
    let client = reqwest::Client::new();
    let digest = latest_posts(&client, &server.uri(), "test-agent/1.0")
        .await
        .unwrap();

    assert_eq!(digest.dialect, Dialect::Atom);
    assert_eq!(digest.skipped, 0);
    assert_eq!(digest.posts.len(), 3);

    // Document order preserved
    assert_eq!(digest.posts[0].title, "New canvases for spring");
    assert_eq!(digest.posts[1].title, "Open studio weekend");
    assert_eq!(digest.posts[2].title, "Untitled notes");

    // Thumbnail upscaled from the 72px crop to the 320px rendition
    assert_eq!(
        digest.posts[0].image.as_deref(),
        Some("https://img.example.com/a/b/s320/spring.jpg")
    );
    // No thumbnail: first inline image from content
    assert_eq!(
        digest.posts[1].image.as_deref(),
        Some("https://img.example.com/open.jpg")
    );
    // No image anywhere
    assert!(digest.posts[2].image.is_none());

    // rel="alternate" link chosen, not rel="self"
    assert_eq!(
        digest.posts[0].link,
        "https://blog.example.com/2024/03/spring.html"
    );
}

#[tokio::test]
async fn test_atom_entry_cap() {
    let mut feed = String::from(r#"<?xml version="1.0"?><feed xmlns="http://www.w3.org/2005/Atom">"#);
    for i in 0..15 {
        feed.push_str(&format!(
            "<entry><title>Post {i}</title>\
             <link rel=\"alternate\" href=\"https://blog.example.com/{i}\"/>\
             <published>2024-01-{:02}T00:00:00Z</published></entry>",
            i + 1
        ));
    }
    feed.push_str("</feed>");

    let server = serve(&feed).await;
    let client = reqwest::Client::new();
    let digest = latest_posts(&client, &server.uri(), "test-agent/1.0")
        .await
        .unwrap();

    assert_eq!(digest.posts.len(), MAX_POSTS);
    assert_eq!(digest.posts[0].title, "Post 0");
    assert_eq!(digest.posts[9].title, "Post 9");
}

// ============================================================================
// RSS Feeds
// ============================================================================

#[tokio::test]
async fn test_rss_feed_with_skipped_entries() {
    let feed = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Studio Notebook</title>
    <item>
      <title>Gallery opening</title>
      <link>https://blog.example.com/opening</link>
      <pubDate>Mon, 11 Mar 2024 09:00:00 GMT</pubDate>
      <description><![CDATA[<p>Photos from the night. <img src="https://img.example.com/s72-c/night.jpg"></p>]]></description>
    </item>
    <item>
      <title>Missing date, dropped</title>
      <link>https://blog.example.com/dropped</link>
    </item>
    <item>
      <title>Second post</title>
      <link>https://blog.example.com/second</link>
      <pubDate>Tue, 05 Mar 2024 10:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    let server = serve(feed).await;
    let client = reqwest::Client::new();
    let digest = latest_posts(&client, &server.uri(), "test-agent/1.0")
        .await
        .unwrap();

    assert_eq!(digest.dialect, Dialect::Rss);
    assert_eq!(digest.posts.len(), 2);
    assert_eq!(digest.skipped, 1);

    // Inline image from CDATA description, upscaled
    assert_eq!(
        digest.posts[0].image.as_deref(),
        Some("https://img.example.com/s320/night.jpg")
    );
    assert_eq!(digest.posts[1].title, "Second post");
    assert!(digest.posts[1].image.is_none());
}

// ============================================================================
// Failure Modes
// ============================================================================

#[tokio::test]
async fn test_http_error_aborts_pipeline() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::new();
    let err = latest_posts(&client, &mock_server.uri(), "test-agent/1.0")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::HttpStatus(503)));
}

#[tokio::test]
async fn test_user_agent_reaches_server() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "Mozilla/5.0 (compatible; AtelierSite/1.0)"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<rss version="2.0"><channel></channel></rss>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = reqwest::Client::new();
    let digest = latest_posts(
        &client,
        &mock_server.uri(),
        atelier::config::DEFAULT_USER_AGENT,
    )
    .await
    .unwrap();
    assert!(digest.posts.is_empty());
}

#[tokio::test]
async fn test_posts_serialize_without_null_image() {
    let feed = r#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <title>Plain post</title>
    <link rel="alternate" href="https://blog.example.com/plain"/>
    <published>2024-03-01T00:00:00Z</published>
  </entry>
</feed>"#;

    let server = serve(feed).await;
    let client = reqwest::Client::new();
    let digest = latest_posts(&client, &server.uri(), "test-agent/1.0")
        .await
        .unwrap();

    let json = serde_json::to_string(&digest.posts).unwrap();
    assert!(json.contains("\"title\":\"Plain post\""));
    // Absent image is omitted entirely rather than serialized as null
    assert!(!json.contains("image"));
}
