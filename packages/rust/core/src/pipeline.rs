//! End-to-end run: research → use cases → datasets → proposal → files.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};

use casescout_gemini::GeminiClient;
use casescout_research::{
    BrowserFetcher, DuckDuckGoSearch, HttpFetcher, PageFetcher, ResearchAgent, SearchProvider,
};
use casescout_shared::{
    CaseScoutError, CompanyInfo, DatasetIndex, IndustryInfo, ResearchOptions, Result, RunId,
    RunReporter,
};

use crate::proposal;
use crate::resource::{self, DatasetFinder};
use crate::usecase;

/// Output filename for the resource list.
pub const RESOURCES_FILE: &str = "resources.txt";

/// Output filename for the proposal document.
pub const PROPOSAL_FILE: &str = "proposal.txt";

/// Configuration for a single generation run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Company to research.
    pub company: String,
    /// Industry label.
    pub industry: String,
    /// Directory receiving the two output files.
    pub output_dir: PathBuf,
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct RunOutcome {
    /// Run identifier.
    pub run_id: RunId,
    /// Company research findings.
    pub company: CompanyInfo,
    /// Industry research findings.
    pub industry: IndustryInfo,
    /// Refined (or seed, in degraded mode) use cases.
    pub use_cases: Vec<String>,
    /// One dataset pointer per use case.
    pub datasets: DatasetIndex,
    /// Rendered proposal document.
    pub proposal: String,
    /// Where the resource list was written.
    pub resources_path: PathBuf,
    /// Where the proposal was written.
    pub proposal_path: PathBuf,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

// ---------------------------------------------------------------------------
// Stage collaborators
// ---------------------------------------------------------------------------

/// The stage collaborators a run is wired with.
pub struct Stages {
    research: ResearchAgent,
    datasets: DatasetFinder,
    gemini: GeminiClient,
}

impl Stages {
    /// Assemble stages from explicit parts.
    pub fn new(research: ResearchAgent, datasets: DatasetFinder, gemini: GeminiClient) -> Self {
        Self {
            research,
            datasets,
            gemini,
        }
    }

    /// Wire up the default live collaborators from runtime options.
    ///
    /// Research and dataset lookup share one search provider.
    pub fn from_options(options: &ResearchOptions, gemini: GeminiClient) -> Result<Self> {
        let search: Arc<dyn SearchProvider> = Arc::new(DuckDuckGoSearch::new(options)?);
        let renderer: Arc<dyn PageFetcher> = Arc::new(BrowserFetcher::new(options)?);
        let http: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(options)?);

        let research = ResearchAgent::new(
            Arc::clone(&search),
            renderer,
            http,
            gemini.clone(),
            options.search_results,
        );

        Ok(Self {
            research,
            datasets: DatasetFinder::new(search),
            gemini,
        })
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full generation pipeline.
///
/// Research, refinement, and lookup failures all degrade to placeholder
/// values inside their stage; the run itself fails only when one of the two
/// output files cannot be written.
#[instrument(skip_all, fields(company = %config.company, industry = %config.industry))]
pub async fn run(
    config: &RunConfig,
    stages: &Stages,
    reporter: &dyn RunReporter,
) -> Result<RunOutcome> {
    let start = Instant::now();
    let run_id = RunId::new();

    info!(%run_id, "starting generation run");

    // --- Phase 1: Research ---
    reporter.phase("Researching company");
    let company = stages.research.company(&config.company, reporter).await;

    reporter.phase("Researching industry");
    let industry = stages.research.industry(&config.industry, reporter).await;

    // --- Phase 2: Use cases ---
    reporter.phase("Deriving use cases");
    let seeds = usecase::generate_use_cases(&company, &industry);

    reporter.phase("Refining use cases");
    let use_cases = usecase::refine_use_cases(
        &stages.gemini,
        seeds,
        &config.company,
        &config.industry,
        reporter,
    )
    .await;

    // --- Phase 3: Dataset lookup ---
    reporter.phase("Looking up datasets");
    let datasets = stages.datasets.find_datasets(&use_cases, reporter).await;

    // --- Phase 4: Proposal ---
    reporter.phase("Assembling proposal");
    let proposal_text = proposal::create_proposal(&company, &use_cases, &datasets, &industry);

    // --- Phase 5: Persist ---
    reporter.phase("Writing output files");
    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| CaseScoutError::io(&config.output_dir, e))?;

    let resources_path = config.output_dir.join(RESOURCES_FILE);
    let proposal_path = config.output_dir.join(PROPOSAL_FILE);

    // Both writes are attempted before the run can fail, so a good proposal
    // still lands on disk when only the resources write is refused.
    let resources_result = resource::save_resources(&datasets, &resources_path);
    if let Err(e) = &resources_result {
        warn!("resources write failed: {e}");
        reporter.error(&format!("Error saving resources: {e}"));
    }

    let proposal_result = proposal::save_proposal(&proposal_text, &proposal_path);
    if let Err(e) = &proposal_result {
        warn!("proposal write failed: {e}");
        reporter.error(&format!("Error saving proposal: {e}"));
    }

    resources_result?;
    proposal_result?;

    let outcome = RunOutcome {
        run_id,
        company,
        industry,
        use_cases,
        datasets,
        proposal: proposal_text,
        resources_path,
        proposal_path,
        elapsed: start.elapsed(),
    };

    reporter.finished();

    info!(
        run_id = %outcome.run_id,
        use_cases = outcome.use_cases.len(),
        datasets_found = outcome.datasets.found_count(),
        elapsed_ms = outcome.elapsed.as_millis(),
        "generation run complete"
    );

    Ok(outcome)
}
