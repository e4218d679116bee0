//! Web research for CaseScout.
//!
//! This crate turns free-text company and industry names into structured
//! research facts:
//! - [`SearchProvider`] / [`DuckDuckGoSearch`] — relevance-ordered URL search
//! - [`PageFetcher`] with [`HttpFetcher`] and [`BrowserFetcher`] — plain and
//!   rendered page retrieval
//! - [`ExtractionStrategy`] / [`KeywordExtractor`] — ordered text-fragment
//!   extraction from parsed HTML
//! - [`ResearchAgent`] — the stage boundary: masks every failure into an
//!   empty or fallback value and reports it, never returning an error

pub mod agent;
pub mod extract;
pub mod fetch;
pub mod search;

pub use agent::{
    GENERAL_FOCUS, GENERAL_FOCUS_AREA, GENERAL_OFFERINGS, GENERAL_STANDARDS, GENERAL_TRENDS,
    ResearchAgent,
};
pub use extract::{ExtractionStrategy, KeywordExtractor};
pub use fetch::{BrowserFetcher, HttpFetcher, PageFetcher};
pub use search::{DuckDuckGoSearch, SearchProvider};
