//! Web search via the DuckDuckGo HTML endpoint.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use casescout_shared::{CaseScoutError, ResearchOptions, Result};

/// User-Agent string for search requests.
const USER_AGENT: &str = concat!("CaseScout/", env!("CARGO_PKG_VERSION"));

/// Public DuckDuckGo HTML endpoint (no API key required).
const DUCKDUCKGO_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A relevance-ordered URL search.
///
/// Implementations return at most `limit` URLs, possibly none. An empty
/// result is not an error; transport and HTTP failures are.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>>;
}

// ---------------------------------------------------------------------------
// DuckDuckGo
// ---------------------------------------------------------------------------

/// Search provider scraping the DuckDuckGo HTML endpoint.
pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
    region: String,
}

impl DuckDuckGoSearch {
    /// Create a provider with the configured region and timeout.
    pub fn new(opts: &ResearchOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(opts.http_timeout_secs))
            .build()
            .map_err(|e| CaseScoutError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: DUCKDUCKGO_ENDPOINT.to_string(),
            region: opts.search_region.clone(),
        })
    }

    /// Point the provider at a different endpoint (for integration tests).
    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let url = Url::parse_with_params(
            &self.endpoint,
            [("q", query), ("kl", self.region.as_str())],
        )
        .map_err(|e| CaseScoutError::parse(format!("search url: {e}")))?;

        debug!(%query, limit, "searching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CaseScoutError::Network(format!("search request: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CaseScoutError::Network(
                "search rate limited (HTTP 429)".into(),
            ));
        }
        if !status.is_success() {
            return Err(CaseScoutError::Network(format!("search: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CaseScoutError::Network(format!("search body read failed: {e}")))?;

        let results = parse_results(&body, limit);
        if results.is_empty() {
            warn!(%query, "search returned no results");
        }
        Ok(results)
    }
}

/// Extract result URLs from a DuckDuckGo HTML page, in page order.
fn parse_results(html: &str, limit: usize) -> Vec<String> {
    let doc = Html::parse_document(html);
    let link_sel = Selector::parse("a.result__a").unwrap();

    let mut seen = HashSet::new();
    let mut results = Vec::new();

    for el in doc.select(&link_sel) {
        if results.len() >= limit {
            break;
        }
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let Some(target) = resolve_result_href(href) else {
            continue;
        };
        if target.contains("duckduckgo.com") {
            continue;
        }
        if seen.insert(target.clone()) {
            results.push(target);
        }
    }

    results
}

/// Unwrap DuckDuckGo's `/l/?uddg=<encoded>` redirect wrapper, or pass
/// through links that are already absolute http(s) URLs.
fn resolve_result_href(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{href}")
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&absolute).ok()?;
    if let Some((_, target)) = parsed.query_pairs().find(|(k, _)| k == "uddg") {
        return Some(target.into_owned());
    }
    if parsed.scheme() == "http" || parsed.scheme() == "https" {
        return Some(absolute);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Cut-down version of what the HTML endpoint actually serves.
    const RESULTS_PAGE: &str = r#"<html><body>
        <div class="result">
            <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Facme.example%2F&amp;rut=abc">Acme Corp</a>
        </div>
        <div class="result">
            <a class="result__a" href="https://acme-blog.example/about">Acme blog</a>
        </div>
        <div class="result">
            <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Facme.example%2F">Acme again</a>
        </div>
    </body></html>"#;

    #[test]
    fn parse_results_unwraps_redirects_in_page_order() {
        let results = parse_results(RESULTS_PAGE, 5);
        assert_eq!(
            results,
            vec![
                "https://acme.example/".to_string(),
                "https://acme-blog.example/about".to_string(),
            ]
        );
    }

    #[test]
    fn parse_results_respects_limit() {
        let results = parse_results(RESULTS_PAGE, 1);
        assert_eq!(results, vec!["https://acme.example/".to_string()]);
    }

    #[test]
    fn resolve_href_variants() {
        assert_eq!(
            resolve_result_href("/l/?uddg=https%3A%2F%2Fexample.com%2Fdocs"),
            Some("https://example.com/docs".to_string())
        );
        assert_eq!(
            resolve_result_href("https://example.com/page"),
            Some("https://example.com/page".to_string())
        );
        assert_eq!(resolve_result_href("javascript:void(0)"), None);
    }

    #[tokio::test]
    async fn search_returns_urls_from_endpoint() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
            .mount(&server)
            .await;

        let provider = DuckDuckGoSearch::new(&ResearchOptions::default())
            .unwrap()
            .with_endpoint(format!("{}/html/", server.uri()));

        let results = provider.search("Acme Corp", 2).await.expect("search");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], "https://acme.example/");
    }

    #[tokio::test]
    async fn search_propagates_rate_limit() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let provider = DuckDuckGoSearch::new(&ResearchOptions::default())
            .unwrap()
            .with_endpoint(format!("{}/html/", server.uri()));

        let err = provider.search("Acme Corp", 2).await.unwrap_err();
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn empty_results_page_is_not_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>no results</body></html>"),
            )
            .mount(&server)
            .await;

        let provider = DuckDuckGoSearch::new(&ResearchOptions::default())
            .unwrap()
            .with_endpoint(format!("{}/html/", server.uri()));

        let results = provider.search("gibberish", 2).await.expect("search");
        assert!(results.is_empty());
    }
}
