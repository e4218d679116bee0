//! Page fetching: plain HTTP GET and headless-browser rendering.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use casescout_shared::{CaseScoutError, ResearchOptions, Result};

/// User-Agent string for fetch requests.
const USER_AGENT: &str = concat!("CaseScout/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Fetches one page's markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Plain HTTP
// ---------------------------------------------------------------------------

/// Plain HTTP fetcher; non-2xx statuses are errors.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher with the configured timeout.
    pub fn new(opts: &ResearchOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(opts.http_timeout_secs))
            .build()
            .map_err(|e| CaseScoutError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        debug!(%url, "fetching page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| CaseScoutError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaseScoutError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| CaseScoutError::Network(format!("{url}: body read failed: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Browser rendering
// ---------------------------------------------------------------------------

/// Rendering fetcher for pages that need script execution to populate
/// content.
///
/// Spawns `<browser> --headless=new --disable-gpu --dump-dom <url>` under a
/// bounded timeout, with the subprocess killed if the fetch is dropped.
/// When no binary is configured, or the configured one cannot be spawned,
/// the fetch degrades to a plain HTTP GET with a warning; render timeouts
/// and failing exits are real errors the caller observes.
pub struct BrowserFetcher {
    browser_cmd: Option<String>,
    timeout: Duration,
    http: HttpFetcher,
}

impl BrowserFetcher {
    /// Create a rendering fetcher from runtime options.
    pub fn new(opts: &ResearchOptions) -> Result<Self> {
        Ok(Self {
            browser_cmd: opts.browser_cmd.clone(),
            timeout: Duration::from_secs(opts.render_timeout_secs),
            http: HttpFetcher::new(opts)?,
        })
    }

    async fn render(&self, cmd: &str, url: &Url) -> Result<String> {
        debug!(%url, browser = %cmd, "rendering page");

        let child = tokio::process::Command::new(cmd)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--dump-dom")
            .arg(url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            // Config, not Network: any spawn failure (missing binary, no
            // exec permission) means the browser cannot start at all, and
            // `fetch` degrades on exactly this variant.
            .map_err(|e| CaseScoutError::config(format!("browser spawn failed: {cmd}: {e}")))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                CaseScoutError::Network(format!(
                    "{url}: render timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| CaseScoutError::Network(format!("{url}: browser: {e}")))?;

        if !output.status.success() {
            return Err(CaseScoutError::Network(format!(
                "{url}: browser exited with {}",
                output.status
            )));
        }

        let dom = String::from_utf8_lossy(&output.stdout).into_owned();
        if dom.trim().is_empty() {
            return Err(CaseScoutError::Network(format!(
                "{url}: browser produced no output"
            )));
        }
        Ok(dom)
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let Some(cmd) = &self.browser_cmd else {
            return self.http.fetch(url).await;
        };

        match self.render(cmd, url).await {
            Ok(dom) => Ok(dom),
            Err(CaseScoutError::Config { message }) => {
                warn!(%url, %message, "falling back to plain fetch");
                self.http.fetch(url).await
            }
            Err(e) => Err(e),
        }
    }
}
