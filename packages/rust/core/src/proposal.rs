//! Proposal rendering and persistence.
//!
//! `create_proposal` is a pure function over the run's findings; missing
//! fields render as the literal `N/A`, never as an error.

use std::path::Path;

use tracing::debug;

use casescout_shared::{CaseScoutError, CompanyInfo, DatasetIndex, IndustryInfo, Result};

/// Render the final proposal document.
///
/// Output is fully determined by the inputs: same findings, same bytes.
pub fn create_proposal(
    company: &CompanyInfo,
    use_cases: &[String],
    datasets: &DatasetIndex,
    industry: &IndustryInfo,
) -> String {
    let mut doc = String::new();

    doc.push_str("**AI/GenAI Use Case Proposal**\n\n");
    doc.push_str(&format!(
        "**Company Research Source:** {}\n",
        render_url(company.url.as_deref())
    ));
    doc.push_str(&format!(
        "**Industry Research Source:** {}\n\n",
        render_url(industry.url.as_deref())
    ));

    doc.push_str("**Company Information:**\n");
    doc.push_str(&format!("- Offerings: {}\n", render_list(&company.offerings)));
    doc.push_str(&format!(
        "- Focus Areas: {}\n\n",
        render_list(&company.focus_areas)
    ));

    doc.push_str("**Industry Information:**\n");
    doc.push_str(&format!("- Trends: {}\n", render_list(&industry.trends)));
    doc.push_str(&format!(
        "- Standards: {}\n\n",
        render_list(&industry.standards)
    ));

    doc.push_str("**Refined AI Use Cases:**\n");
    for (i, use_case) in use_cases.iter().enumerate() {
        let dataset = datasets.get(use_case).unwrap_or("N/A");
        doc.push_str(&format!("{}. {use_case} (Dataset: {dataset})\n", i + 1));
    }

    doc
}

/// Write the proposal text to disk.
pub fn save_proposal(proposal: &str, path: &Path) -> Result<()> {
    std::fs::write(path, proposal).map_err(|e| CaseScoutError::io(path, e))?;
    debug!(path = %path.display(), bytes = proposal.len(), "wrote proposal file");
    Ok(())
}

fn render_url(url: Option<&str>) -> &str {
    url.unwrap_or("N/A")
}

fn render_list(items: &[String]) -> String {
    if items.is_empty() {
        "N/A".to_string()
    } else {
        items.join("; ")
    }
}
