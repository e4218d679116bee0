//! Dataset lookup per use case and the resources file writer.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use casescout_research::SearchProvider;
use casescout_shared::{CaseScoutError, DatasetIndex, NO_DATASET, Result, RunReporter};

/// Looks up one illustrative dataset pointer per use case.
pub struct DatasetFinder {
    search: Arc<dyn SearchProvider>,
}

impl DatasetFinder {
    pub fn new(search: Arc<dyn SearchProvider>) -> Self {
        Self { search }
    }

    /// Query `"<use case> dataset"` for each use case, strictly in order.
    ///
    /// The returned index always has exactly one entry per input. A failed
    /// or empty lookup records the [`NO_DATASET`] sentinel and the batch
    /// keeps going.
    #[instrument(skip_all, fields(use_cases = use_cases.len()))]
    pub async fn find_datasets(
        &self,
        use_cases: &[String],
        reporter: &dyn RunReporter,
    ) -> DatasetIndex {
        let mut index = DatasetIndex::new();
        let total = use_cases.len();

        for (i, use_case) in use_cases.iter().enumerate() {
            reporter.lookup_progress(i + 1, total, use_case);

            let link = match self.search.search(&format!("{use_case} dataset"), 1).await {
                Ok(results) => results
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| NO_DATASET.to_string()),
                Err(e) => {
                    warn!(use_case = %use_case, "dataset lookup failed: {e}");
                    NO_DATASET.to_string()
                }
            };

            index.insert(use_case.clone(), link);
        }

        info!(
            total,
            found = index.found_count(),
            "dataset lookup complete"
        );

        index
    }
}

/// Render the resource list as two-line blocks separated by blank lines.
///
/// Pure rendering, shared by [`save_resources`] and inline display.
pub fn render_resources(datasets: &DatasetIndex) -> String {
    let mut out = String::new();
    for entry in datasets.entries() {
        out.push_str(&format!(
            "Use Case: {}\nDataset Link: {}\n\n",
            entry.use_case, entry.link
        ));
    }
    out
}

/// Write the rendered resource list to disk.
pub fn save_resources(datasets: &DatasetIndex, path: &Path) -> Result<()> {
    std::fs::write(path, render_resources(datasets)).map_err(|e| CaseScoutError::io(path, e))?;
    debug!(path = %path.display(), entries = datasets.len(), "wrote resources file");
    Ok(())
}
