//! Research orchestration for company and industry lookups.
//!
//! `ResearchAgent` turns a company name or industry label into structured
//! findings. Lookups never fail the caller: every error path degrades to an
//! empty or placeholder value and surfaces through the [`RunReporter`].

use std::sync::Arc;

use scraper::Html;
use tracing::{info, instrument, warn};
use url::Url;

use casescout_gemini::GeminiClient;
use casescout_shared::{
    CaseScoutError, CompanyInfo, IndustryInfo, ResearchOptions, Result, RunReporter,
};

use crate::extract::{ExtractionStrategy, KeywordExtractor};
use crate::fetch::{BrowserFetcher, HttpFetcher, PageFetcher};
use crate::search::{DuckDuckGoSearch, SearchProvider};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fragments kept per extraction pass.
const EXTRACT_LIMIT: usize = 5;

/// Offering placeholder when no model output is available.
pub const GENERAL_OFFERINGS: &str = "General product offerings";

/// Focus placeholder when no model output is available.
pub const GENERAL_FOCUS: &str = "General business focus";

/// Focus placeholder when a model brief has only one line.
pub const GENERAL_FOCUS_AREA: &str = "General focus area";

/// Trend placeholder when an industry page yields nothing.
pub const GENERAL_TRENDS: &str = "General industry trends";

/// Standards placeholder when an industry page yields nothing.
pub const GENERAL_STANDARDS: &str = "General industry standards";

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// Web research front-end over pluggable search, fetch, and extraction.
pub struct ResearchAgent {
    search: Arc<dyn SearchProvider>,
    renderer: Arc<dyn PageFetcher>,
    http: Arc<dyn PageFetcher>,
    gemini: GeminiClient,
    search_results: usize,
    offerings: Box<dyn ExtractionStrategy>,
    focus_areas: Box<dyn ExtractionStrategy>,
    trends: Box<dyn ExtractionStrategy>,
    standards: Box<dyn ExtractionStrategy>,
}

impl ResearchAgent {
    /// Assemble an agent from explicit collaborators.
    ///
    /// Company pages go through `renderer` (browser-rendered when one is
    /// configured); industry pages go through `http` directly.
    pub fn new(
        search: Arc<dyn SearchProvider>,
        renderer: Arc<dyn PageFetcher>,
        http: Arc<dyn PageFetcher>,
        gemini: GeminiClient,
        search_results: usize,
    ) -> Self {
        Self {
            search,
            renderer,
            http,
            gemini,
            search_results,
            offerings: Box::new(KeywordExtractor::new(
                "offerings",
                "li, p, span",
                &["product", "solution", "service", "offering"],
                EXTRACT_LIMIT,
            )),
            focus_areas: Box::new(KeywordExtractor::new(
                "focus-areas",
                "p, div",
                &["mission", "vision", "focus", "strategy"],
                EXTRACT_LIMIT,
            )),
            trends: Box::new(KeywordExtractor::new(
                "trends",
                "li",
                &["trend", "challenge"],
                EXTRACT_LIMIT,
            )),
            standards: Box::new(KeywordExtractor::new(
                "standards",
                "p",
                &["standard", "regulation"],
                EXTRACT_LIMIT,
            )),
        }
    }

    /// Wire up the default live collaborators from runtime options.
    pub fn from_options(options: &ResearchOptions, gemini: GeminiClient) -> Result<Self> {
        let search = Arc::new(DuckDuckGoSearch::new(options)?);
        let renderer = Arc::new(BrowserFetcher::new(options)?);
        let http = Arc::new(HttpFetcher::new(options)?);
        Ok(Self::new(
            search,
            renderer,
            http,
            gemini,
            options.search_results,
        ))
    }

    /// Swap the company-page extraction pair.
    pub fn with_company_strategies(
        mut self,
        offerings: Box<dyn ExtractionStrategy>,
        focus_areas: Box<dyn ExtractionStrategy>,
    ) -> Self {
        self.offerings = offerings;
        self.focus_areas = focus_areas;
        self
    }

    /// Swap the industry-page extraction pair.
    pub fn with_industry_strategies(
        mut self,
        trends: Box<dyn ExtractionStrategy>,
        standards: Box<dyn ExtractionStrategy>,
    ) -> Self {
        self.trends = trends;
        self.standards = standards;
        self
    }

    // -----------------------------------------------------------------------
    // Company research
    // -----------------------------------------------------------------------

    /// Research a company's offerings and focus areas from its website.
    ///
    /// Falls back to a model brief only when a page was fetched but either
    /// extraction came up empty. Search and fetch failures return empty
    /// findings instead, so the caller can tell "site unreachable" apart
    /// from "site said nothing useful".
    #[instrument(skip_all, fields(company = %company_name))]
    pub async fn company(&self, company_name: &str, reporter: &dyn RunReporter) -> CompanyInfo {
        let results = match self.search.search(company_name, self.search_results).await {
            Ok(results) => results,
            Err(e) => {
                warn!("company search failed: {e}");
                reporter.error(&format!("Error browsing website: {e}"));
                return CompanyInfo::default();
            }
        };

        let Some(first) = results.first() else {
            warn!("no search results for company");
            reporter.warning(&format!("No website found for {company_name}."));
            return CompanyInfo::default();
        };

        let url = match parse_result_url(first) {
            Ok(url) => url,
            Err(e) => {
                warn!("search result rejected: {e}");
                reporter.error(&format!("Error browsing website: {e}"));
                return CompanyInfo::default();
            }
        };

        let body = match self.renderer.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(url = %url, "company page fetch failed: {e}");
                reporter.error(&format!("Error browsing website: {e}"));
                return CompanyInfo::default();
            }
        };

        // Parsed documents are not Send; keep this scope free of awaits.
        let (offerings, focus_areas) = {
            let doc = Html::parse_document(&body);
            (
                self.offerings.extract(&doc),
                self.focus_areas.extract(&doc),
            )
        };

        if offerings.is_empty() || focus_areas.is_empty() {
            info!(url = %url, "page extraction came up short, asking the model");
            return self.model_brief(company_name, reporter).await;
        }

        info!(
            url = %url,
            offerings = offerings.len(),
            focus_areas = focus_areas.len(),
            "company research complete"
        );

        CompanyInfo {
            offerings,
            focus_areas,
            url: Some(url.to_string()),
        }
    }

    /// Ask the model for a two-line company brief; first line becomes the
    /// offerings entry, second the focus entry.
    async fn model_brief(&self, company_name: &str, reporter: &dyn RunReporter) -> CompanyInfo {
        let search_url =
            Url::parse_with_params("https://www.google.com/search", [("q", company_name)])
                .map(|url| url.to_string())
                .unwrap_or_else(|_| format!("https://www.google.com/search?q={company_name}"));

        if !self.gemini.is_available() {
            warn!("model fallback unavailable");
            reporter.warning("Gemini model not available for fallback search.");
            return placeholder_company(search_url);
        }

        let prompt = format!(
            "Provide a brief about {company_name}: key product offerings and strategic focus areas."
        );

        match self.gemini.generate(&prompt).await {
            Ok(text) => {
                let (offerings, focus) = split_brief(&text);
                info!("model brief accepted");
                CompanyInfo {
                    offerings: vec![offerings],
                    focus_areas: vec![focus],
                    url: Some(search_url),
                }
            }
            Err(e) => {
                warn!("model fallback failed: {e}");
                reporter.error(&format!("Error with Gemini fallback: {e}"));
                placeholder_company(search_url)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Industry research
    // -----------------------------------------------------------------------

    /// Research trends and standards for an industry.
    ///
    /// Industry pages are fetched over plain HTTP. Empty extractions are
    /// padded with placeholders; any failure before the page is parsed
    /// returns fully empty findings.
    #[instrument(skip_all, fields(industry = %industry))]
    pub async fn industry(&self, industry: &str, reporter: &dyn RunReporter) -> IndustryInfo {
        let query = format!("{industry} industry overview");

        let results = match self.search.search(&query, self.search_results).await {
            Ok(results) => results,
            Err(e) => {
                warn!("industry search failed: {e}");
                reporter.error(&format!("Error fetching industry info: {e}"));
                return IndustryInfo::default();
            }
        };

        let Some(first) = results.first() else {
            warn!("no search results for industry");
            reporter.warning(&format!("No industry info found for {industry}."));
            return IndustryInfo::default();
        };

        let url = match parse_result_url(first) {
            Ok(url) => url,
            Err(e) => {
                warn!("search result rejected: {e}");
                reporter.error(&format!("Error fetching industry info: {e}"));
                return IndustryInfo::default();
            }
        };

        let body = match self.http.fetch(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(url = %url, "industry page fetch failed: {e}");
                reporter.error(&format!("Error fetching industry info: {e}"));
                return IndustryInfo::default();
            }
        };

        let doc = Html::parse_document(&body);
        let mut trends = self.trends.extract(&doc);
        let mut standards = self.standards.extract(&doc);

        if trends.is_empty() {
            trends.push(GENERAL_TRENDS.to_string());
        }
        if standards.is_empty() {
            standards.push(GENERAL_STANDARDS.to_string());
        }

        info!(
            url = %url,
            trends = trends.len(),
            standards = standards.len(),
            "industry research complete"
        );

        IndustryInfo {
            trends,
            standards,
            url: Some(url.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a search result into a URL, defaulting the scheme to https.
fn parse_result_url(result: &str) -> Result<Url> {
    let candidate = if result.starts_with("http") {
        result.to_string()
    } else {
        format!("https://{result}")
    };

    Url::parse(&candidate)
        .map_err(|e| CaseScoutError::parse(format!("bad result URL {candidate:?}: {e}")))
}

/// Split a model brief into (offerings line, focus line).
fn split_brief(text: &str) -> (String, String) {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

    match (lines.next(), lines.next()) {
        (Some(first), Some(second)) => (first.to_string(), second.to_string()),
        (Some(first), None) => (first.to_string(), GENERAL_FOCUS_AREA.to_string()),
        (None, _) => (GENERAL_OFFERINGS.to_string(), GENERAL_FOCUS.to_string()),
    }
}

fn placeholder_company(search_url: String) -> CompanyInfo {
    CompanyInfo {
        offerings: vec![GENERAL_OFFERINGS.to_string()],
        focus_areas: vec![GENERAL_FOCUS.to_string()],
        url: Some(search_url),
    }
}
