//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use casescout_core::pipeline::{self, RunConfig, Stages};
use casescout_gemini::GeminiClient;
use casescout_shared::{
    AppConfig, ResearchOptions, RunReporter, init_config, load_config, validate_api_key,
};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// CaseScout — research-backed AI use-case proposals.
#[derive(Parser)]
#[command(
    name = "casescout",
    version,
    about = "Research a company and industry, derive AI use cases, and draft a proposal.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Research a company and generate its use-case proposal.
    Generate {
        /// Company name to research.
        company: String,

        /// Industry label for trend and standards research.
        industry: String,

        /// Output directory for proposal.txt and resources.txt.
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "casescout=info",
        1 => "casescout=debug",
        _ => "casescout=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            company,
            industry,
            out,
        } => cmd_generate(&company, &industry, out.as_deref()).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_generate(company: &str, industry: &str, out: Option<&str>) -> Result<()> {
    let config = load_config()?;

    // A missing key is not fatal: research still runs, refinement and the
    // model fallback just degrade to placeholders.
    if let Err(e) = validate_api_key(&config) {
        warn!("no model available: {e}");
        eprintln!("{e}");
        eprintln!("Continuing without model refinement.");
    }

    let output_dir = match out {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(&config.defaults.output_dir),
    };

    let options = ResearchOptions::from(&config);
    let gemini = GeminiClient::from_config(&config.gemini);

    info!(company, industry, model = gemini.model(), "starting generation");

    let stages = Stages::from_options(&options, gemini)?;

    let run_config = RunConfig {
        company: company.to_string(),
        industry: industry.to_string(),
        output_dir,
    };

    let reporter = CliProgress::new();
    let outcome = pipeline::run(&run_config, &stages, &reporter)
        .await
        .wrap_err("Error generating or saving files.")?;

    // Print summary
    println!();
    println!("  Proposal generated successfully!");
    println!("  Run:       {}", outcome.run_id);
    println!("  Use cases: {}", outcome.use_cases.len());
    println!(
        "  Datasets:  {} of {} found",
        outcome.datasets.found_count(),
        outcome.datasets.len()
    );
    println!("  Proposal:  {}", outcome.proposal_path.display());
    println!("  Resources: {}", outcome.resources_path.display());
    println!("  Time:      {:.1}s", outcome.elapsed.as_secs_f64());
    println!();
    println!("{}", outcome.proposal);

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Progress reporter driving an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl RunReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn warning(&self, message: &str) {
        self.spinner.println(format!("  ! {message}"));
    }

    fn error(&self, message: &str) {
        self.spinner.println(format!("  ✗ {message}"));
    }

    fn lookup_progress(&self, current: usize, total: usize, use_case: &str) {
        self.spinner
            .set_message(format!("Looking up [{current}/{total}] {use_case}"));
    }

    fn finished(&self) {
        self.spinner.finish_and_clear();
    }
}
