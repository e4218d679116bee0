//! Use-case derivation: fixed templates plus optional model refinement.

use tracing::{info, instrument, warn};

use casescout_gemini::GeminiClient;
use casescout_shared::{CompanyInfo, IndustryInfo, RunReporter};

/// Focus-area phrase used when company research produced none.
const DEFAULT_FOCUS_AREA: &str = "business growth";

/// Offering phrase used when company research produced none.
const DEFAULT_OFFERING: &str = "product optimization";

/// Trend phrase used when industry research produced none.
const DEFAULT_TREND: &str = "industry trend";

/// Upper bound on refined use cases kept from a model reply.
const MAX_REFINED: usize = 5;

/// Derive the three seed use cases from research findings.
///
/// Always returns exactly three entries. Each template slot takes the first
/// entry of its source list, or a generic phrase when that list is empty.
pub fn generate_use_cases(company: &CompanyInfo, industry: &IndustryInfo) -> Vec<String> {
    let focus_area = company
        .focus_areas
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_FOCUS_AREA);
    let offering = company
        .offerings
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_OFFERING);
    let trend = industry
        .trends
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_TREND);

    vec![
        format!("AI for improving {focus_area}"),
        format!("ML to optimize {offering}"),
        format!("GenAI to address {trend}"),
    ]
}

/// Ask the model to refine seed use cases into at most five sharper ones.
///
/// Degrades to the input unchanged when the model is unavailable, the call
/// fails, or the reply cleans down to nothing.
#[instrument(skip_all, fields(company = %company_name, seeds = use_cases.len()))]
pub async fn refine_use_cases(
    gemini: &GeminiClient,
    use_cases: Vec<String>,
    company_name: &str,
    industry: &str,
    reporter: &dyn RunReporter,
) -> Vec<String> {
    if !gemini.is_available() {
        info!("model unavailable, keeping seed use cases");
        return use_cases;
    }

    let prompt = format!(
        "Given the company '{company_name}' in the '{industry}' industry,\n\
         refine the following AI use case ideas into more specific, impactful, \
         and innovative suggestions:\n\
         {}\n\
         Limit to {MAX_REFINED} refined use cases.",
        use_cases.join(", ")
    );

    match gemini.generate(&prompt).await {
        Ok(text) => {
            let refined = parse_refined(&text);
            if refined.is_empty() {
                warn!("model reply cleaned down to nothing, keeping seeds");
                return use_cases;
            }
            info!(refined = refined.len(), "use cases refined");
            refined
        }
        Err(e) => {
            warn!("refinement failed: {e}");
            reporter.error(&format!("Error refining use cases: {e}"));
            use_cases
        }
    }
}

/// Split a model reply into cleaned use-case lines, keeping at most five.
fn parse_refined(text: &str) -> Vec<String> {
    text.lines()
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .take(MAX_REFINED)
        .map(str::to_string)
        .collect()
}

/// Strip surrounding whitespace and bullet markers from one reply line.
fn clean_line(line: &str) -> &str {
    line.trim().trim_matches(['-', '*', ' ']).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use casescout_shared::GeminiConfig;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct RecordingReporter {
        errors: Mutex<Vec<String>>,
    }

    impl RunReporter for RecordingReporter {
        fn phase(&self, _name: &str) {}
        fn warning(&self, _message: &str) {}

        fn error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }

        fn lookup_progress(&self, _current: usize, _total: usize, _use_case: &str) {}
        fn finished(&self) {}
    }

    fn company(offerings: &[&str], focus_areas: &[&str]) -> CompanyInfo {
        CompanyInfo {
            offerings: offerings.iter().map(|s| s.to_string()).collect(),
            focus_areas: focus_areas.iter().map(|s| s.to_string()).collect(),
            url: None,
        }
    }

    fn industry(trends: &[&str]) -> IndustryInfo {
        IndustryInfo {
            trends: trends.iter().map(|s| s.to_string()).collect(),
            standards: vec![],
            url: None,
        }
    }

    fn gemini_against(server_uri: &str) -> GeminiClient {
        let config = GeminiConfig {
            base_url: server_uri.to_string(),
            ..GeminiConfig::default()
        };
        GeminiClient::with_api_key(&config, "test-key")
    }

    fn text_reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        }))
    }

    #[test]
    fn seed_use_cases_substitute_research_findings() {
        let use_cases = generate_use_cases(
            &company(&["checkout API"], &["merchant retention"]),
            &industry(&["instant payments"]),
        );

        assert_eq!(
            use_cases,
            vec![
                "AI for improving merchant retention".to_string(),
                "ML to optimize checkout API".to_string(),
                "GenAI to address instant payments".to_string(),
            ]
        );
    }

    #[test]
    fn seed_use_cases_default_per_empty_source_list() {
        let use_cases = generate_use_cases(
            &company(&[], &["merchant retention"]),
            &industry(&[]),
        );

        assert_eq!(use_cases.len(), 3);
        assert_eq!(use_cases[0], "AI for improving merchant retention");
        assert_eq!(use_cases[1], "ML to optimize product optimization");
        assert_eq!(use_cases[2], "GenAI to address industry trend");
    }

    #[test]
    fn seed_use_cases_all_defaults_on_empty_research() {
        let use_cases = generate_use_cases(&CompanyInfo::default(), &IndustryInfo::default());

        assert_eq!(
            use_cases,
            vec![
                "AI for improving business growth".to_string(),
                "ML to optimize product optimization".to_string(),
                "GenAI to address industry trend".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn unavailable_model_keeps_seeds_unchanged() {
        let seeds = vec!["AI for improving x".to_string()];
        let reporter = RecordingReporter::default();

        let refined = refine_use_cases(
            &GeminiClient::unavailable("no key"),
            seeds.clone(),
            "Acme",
            "Retail",
            &reporter,
        )
        .await;

        assert_eq!(refined, seeds);
        assert!(reporter.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn refinement_strips_bullets_and_caps_at_five() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(text_reply(
                "- Demand forecasting for produce\n\
                 * Vision-based shelf auditing\n\
                 \n\
                 Churn prediction for loyalty members\n\
                 - Generative planogram drafts\n\
                 - Supplier negotiation copilot\n\
                 - This sixth line is dropped",
            ))
            .mount(&server)
            .await;

        let reporter = RecordingReporter::default();
        let refined = refine_use_cases(
            &gemini_against(&server.uri()),
            vec!["seed".to_string()],
            "Acme",
            "Retail",
            &reporter,
        )
        .await;

        assert_eq!(
            refined,
            vec![
                "Demand forecasting for produce".to_string(),
                "Vision-based shelf auditing".to_string(),
                "Churn prediction for loyalty members".to_string(),
                "Generative planogram drafts".to_string(),
                "Supplier negotiation copilot".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn failed_refinement_returns_seeds_and_reports() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend down"))
            .mount(&server)
            .await;

        let seeds = vec!["AI for improving x".to_string(), "ML to optimize y".to_string()];
        let reporter = RecordingReporter::default();

        let refined = refine_use_cases(
            &gemini_against(&server.uri()),
            seeds.clone(),
            "Acme",
            "Retail",
            &reporter,
        )
        .await;

        assert_eq!(refined, seeds);
        let errors = reporter.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Error refining use cases:"));
    }

    #[tokio::test]
    async fn all_marker_reply_keeps_seeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(text_reply("---\n* *\n- -"))
            .mount(&server)
            .await;

        let seeds = vec!["seed".to_string()];
        let reporter = RecordingReporter::default();
        let refined = refine_use_cases(
            &gemini_against(&server.uri()),
            seeds.clone(),
            "Acme",
            "Retail",
            &reporter,
        )
        .await;

        assert_eq!(refined, seeds);
    }

    #[test]
    fn line_cleaning_handles_markers_and_space() {
        assert_eq!(clean_line("- Fraud triage"), "Fraud triage");
        assert_eq!(clean_line("  * Fraud triage  "), "Fraud triage");
        assert_eq!(clean_line("1. Fraud triage"), "1. Fraud triage");
        assert_eq!(clean_line("---"), "");
    }
}
