// src/fetch/http.rs
// =============================================================================
// The default fetcher: downloads a page over HTTP and extracts its links.
//
// Outcomes:
// - 2xx response        -> success, links extracted (if the body is HTML)
// - other status codes  -> answered but not usable: success = false
// - transport failures  -> Err(CrawlError::Fetch) (DNS, TLS, connect, ...)
//
// Redirects are followed (up to 5) and links are resolved against the final
// URL, so relative links on a redirected page still point to the right place.
//
// Bodies are read in chunks and cut off at `max_body_bytes`; links past the
// cut are not seen.
// =============================================================================

use super::links::parse_page;
use super::{Fetcher, PageLinks, PageResult};
use crate::canon::CanonicalUrl;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Payload kept for each fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlPage {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content_length: usize,
}

/// Default cap on how much of a page body is read (5 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Builds the HTTP client. This is the only step that can fail before a
    /// crawl starts, apart from parsing the seed URL.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("scope-crawler/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    // Reads at most max_body_bytes of the body, chunk by chunk
    async fn read_body(&self, mut response: reqwest::Response) -> Result<String> {
        let mut body = Vec::new();

        while let Some(chunk) = response.chunk().await? {
            let room = self.max_body_bytes - body.len();
            if chunk.len() > room {
                body.extend_from_slice(&chunk[..room]);
                debug!("Body of {} cut at {} bytes", response.url(), body.len());
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    type Payload = HtmlPage;

    async fn fetch(&self, url: &CanonicalUrl) -> Result<PageResult<HtmlPage>> {
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        let final_url = response.url().clone();
        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(true);

        let body = self.read_body(response).await?;
        let success = status.is_success();

        debug!(
            "GET {} -> {} ({} bytes, html: {})",
            url,
            status.as_u16(),
            body.len(),
            is_html
        );

        // scraper's Html is not Send, so parsing stays in this sync call
        let (links, title) = if success && is_html {
            parse_page(&body, &final_url)
        } else {
            (PageLinks::default(), None)
        };

        Ok(PageResult {
            url: url.to_string(),
            success,
            links,
            payload: HtmlPage {
                status: status.as_u16(),
                title,
                content_length: body.len(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::canonicalize;
    use crate::crawl::{CrawlConfig, Traverser};
    use crate::error::CrawlError;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let mock_server = MockServer::start().await;

        let html = format!(
            r#"<html><head><title>Docs</title></head><body>
                <a href="/docs/guide">Guide</a>
                <a href="{}/docs/api#types">API</a>
                <a href="https://www.rust-lang.org">Rust</a>
            </body></html>"#,
            mock_server.uri()
        );

        Mock::given(method("GET"))
            .and(path("/docs"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
            .mount(&mock_server)
            .await;

        let url = canonicalize(&format!("{}/docs", mock_server.uri())).unwrap();
        let page = fetcher().fetch(&url).await.unwrap();

        assert!(page.success);
        assert_eq!(page.url, url.to_string());
        assert_eq!(
            page.links.internal,
            vec![
                format!("{}/docs/guide", mock_server.uri()),
                format!("{}/docs/api#types", mock_server.uri()),
            ]
        );
        assert_eq!(page.links.external, vec!["https://www.rust-lang.org/"]);
        assert_eq!(page.payload.status, 200);
        assert_eq!(page.payload.title.as_deref(), Some("Docs"));
    }

    #[tokio::test]
    async fn test_not_found_is_unsuccessful() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_raw("<a href=\"/x\">x</a>", "text/html"))
            .mount(&mock_server)
            .await;

        let url = canonicalize(&format!("{}/missing", mock_server.uri())).unwrap();
        let page = fetcher().fetch(&url).await.unwrap();

        assert!(!page.success);
        assert_eq!(page.payload.status, 404);
        assert!(page.links.internal.is_empty());
    }

    #[tokio::test]
    async fn test_non_html_body_has_no_links() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(r#"{"href": "/a"}"#, "application/json"),
            )
            .mount(&mock_server)
            .await;

        let url = canonicalize(&format!("{}/data.json", mock_server.uri())).unwrap();
        let page = fetcher().fetch(&url).await.unwrap();

        assert!(page.success);
        assert_eq!(page.links, PageLinks::default());
        assert_eq!(page.payload.title, None);
    }

    #[tokio::test]
    async fn test_body_is_cut_at_limit() {
        let mock_server = MockServer::start().await;

        let mut html = String::from(r#"<a href="/early">early</a>"#);
        html.push_str(&"x".repeat(4096));
        html.push_str(r#"<a href="/late">late</a>"#);

        Mock::given(method("GET"))
            .and(path("/big"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
            .mount(&mock_server)
            .await;

        let url = canonicalize(&format!("{}/big", mock_server.uri())).unwrap();
        let page = fetcher()
            .with_max_body_bytes(1024)
            .fetch(&url)
            .await
            .unwrap();

        assert!(page.success);
        assert_eq!(page.payload.content_length, 1024);
        assert_eq!(
            page.links.internal,
            vec![format!("{}/early", mock_server.uri())]
        );
    }

    // The real fetcher driving a whole crawl: absolute hrefs from the page are
    // joined and scope-checked, a 404 lands in failures, and nothing outside
    // the scope or past max depth is requested.
    #[tokio::test]
    async fn test_crawl_site_with_http_fetcher() {
        let mock_server = MockServer::start().await;
        let html = |body: &str| {
            ResponseTemplate::new(200).set_body_raw(format!("<html><body>{}</body></html>", body), "text/html")
        };

        Mock::given(method("GET"))
            .and(path("/docs"))
            .respond_with(html(
                r##"<a href="/docs/a">A</a>
                    <a href="/guide">Guide</a>
                    <a href="#x">Here</a>
                    <a href="https://ext.test/docs/b">Elsewhere</a>"##,
            ))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/docs/a"))
            .respond_with(html(r#"<a href="/docs">Up</a><a href="/docs/a/deep">Deep</a>"#))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/docs/guide"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let traverser = Traverser::new(fetcher(), CrawlConfig::default().with_max_depth(1));
        let report = traverser
            .crawl(&format!("{}/docs", mock_server.uri()))
            .await
            .unwrap();

        let pages: Vec<_> = report.pages.keys().map(|url| url.path()).collect();
        assert_eq!(pages, vec!["/docs", "/docs/a"]);

        let docs = &report.pages[0];
        assert_eq!(docs.links.external, vec!["https://ext.test/docs/b"]);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].url.path(), "/docs/guide");
        assert_eq!(report.failures[0].depth, 1);
        assert_eq!(report.failures[0].reason, "page not successful");

        let requests: Vec<String> = mock_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|request| request.url.path().to_string())
            .collect();
        assert_eq!(requests, vec!["/docs", "/docs/a", "/docs/guide"]);
    }

    #[tokio::test]
    async fn test_connection_refused_is_error() {
        // Nothing listens on port 9 (discard) on the loopback interface
        let url = canonicalize("http://127.0.0.1:9/page").unwrap();
        let result = fetcher().fetch(&url).await;
        assert!(matches!(result, Err(CrawlError::Fetch(_))));
    }
}
