//! Core domain types for CaseScout research runs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel link recorded when no dataset could be found for a use case.
pub const NO_DATASET: &str = "No dataset found";

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for pipeline run identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// CompanyInfo
// ---------------------------------------------------------------------------

/// What the research stage learned about a company.
///
/// Both lists are always present. Empty lists mean research came up dry;
/// downstream stages substitute generic defaults instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// Offering-related text fragments, at most five, in document order.
    pub offerings: Vec<String>,
    /// Focus/strategy-related text fragments, at most five, in document order.
    pub focus_areas: Vec<String>,
    /// Page the facts came from, or a search-query URL for model fallbacks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// IndustryInfo
// ---------------------------------------------------------------------------

/// What the research stage learned about an industry.
///
/// On the success path both lists are non-empty (placeholder entries stand
/// in when extraction finds nothing). The all-empty form with `url: None`
/// only occurs when the industry lookup failed outright.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryInfo {
    /// Trend/challenge text fragments, at most five, in document order.
    pub trends: Vec<String>,
    /// Standard/regulation text fragments, at most five, in document order.
    pub standards: Vec<String>,
    /// Page the facts came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// DatasetIndex
// ---------------------------------------------------------------------------

/// One dataset lookup result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    /// The refined use case the lookup was issued for.
    pub use_case: String,
    /// First search hit, or [`NO_DATASET`].
    pub link: String,
}

/// Insertion-ordered mapping from use case to dataset pointer.
///
/// Carries exactly one entry per refined use case, in the order the use
/// cases were produced. Failed lookups map to [`NO_DATASET`], never to a
/// missing entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetIndex(Vec<DatasetEntry>);

impl DatasetIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an entry, preserving insertion order.
    pub fn insert(&mut self, use_case: impl Into<String>, link: impl Into<String>) {
        self.0.push(DatasetEntry {
            use_case: use_case.into(),
            link: link.into(),
        });
    }

    /// Look up the link recorded for a use case.
    pub fn get(&self, use_case: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.use_case == use_case)
            .map(|e| e.link.as_str())
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[DatasetEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries that carry a real link rather than the sentinel.
    pub fn found_count(&self) -> usize {
        self.0.iter().filter(|e| e.link != NO_DATASET).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_roundtrip() {
        let id = RunId::new();
        let s = id.to_string();
        let parsed: RunId = s.parse().expect("parse RunId");
        assert_eq!(id, parsed);
    }

    #[test]
    fn company_info_serialization() {
        let info = CompanyInfo {
            offerings: vec!["Cloud analytics suite".into()],
            focus_areas: vec!["Our mission is customer trust".into()],
            url: Some("https://example.com".into()),
        };

        let json = serde_json::to_string(&info).expect("serialize");
        let parsed: CompanyInfo = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, info);

        // An absent url is omitted from the wire form entirely.
        let empty = CompanyInfo::default();
        let json = serde_json::to_string(&empty).expect("serialize");
        assert!(!json.contains("url"));
    }

    #[test]
    fn dataset_index_preserves_insertion_order() {
        let mut index = DatasetIndex::new();
        index.insert("AI for improving retention", "https://data.example/a");
        index.insert("ML to optimize pricing", NO_DATASET);
        index.insert("GenAI to address churn", "https://data.example/c");

        let order: Vec<&str> = index.entries().iter().map(|e| e.use_case.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "AI for improving retention",
                "ML to optimize pricing",
                "GenAI to address churn",
            ]
        );
        assert_eq!(index.len(), 3);
        assert_eq!(index.found_count(), 2);
    }

    #[test]
    fn dataset_index_lookup() {
        let mut index = DatasetIndex::new();
        index.insert("ML to optimize pricing", NO_DATASET);

        assert_eq!(index.get("ML to optimize pricing"), Some(NO_DATASET));
        assert_eq!(index.get("unknown use case"), None);
    }
}
