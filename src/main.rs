use anyhow::{Context, Result};
use clap::Parser;
use scrutineye::cli::{Cli, Commands, RunArgs};
use scrutineye::config::{init_config, load_config, ScrutineyeConfig};
use scrutineye::observability::{init_logging, install_panic_hook};
use scrutineye::provider::search::{SearchBackend, SearchWorker};
use scrutineye::provider::seed::seed_fixture;
use scrutineye::provider::{BackgroundReportGenerator, DataProvider, Fixture, FixtureProvider};
use scrutineye::tui::app::{App, Clock, Collaborators};
use scrutineye::tui::DashboardExplorer;
use std::sync::Arc;
use std::time::Duration;

/// Simulated time a background report takes to generate.
const REPORT_DELAY: Duration = Duration::from_millis(1500);

fn main() -> Result<()> {
    let cli = Cli::parse();
    install_panic_hook();
    init_logging(cli.run.log_file.as_deref(), cli.run.verbosity)?;

    match cli.command {
        None | Some(Commands::Run) => run_dashboard(&cli.run),
        Some(Commands::Validate) => validate_fixture(&cli.run),
        Some(Commands::Init { force }) => {
            let dir = std::env::current_dir().context("failed to get current directory")?;
            let path = init_config(&dir, force)?;
            println!("Created {}", path.display());
            Ok(())
        }
        Some(Commands::DumpSeed) => {
            println!("{}", seed_fixture(chrono::Utc::now()).to_json_pretty()?);
            Ok(())
        }
    }
}

fn load_fixture(args: &RunArgs) -> Result<Fixture> {
    match &args.data {
        Some(path) => Fixture::from_json_file(path),
        None => Ok(seed_fixture(chrono::Utc::now())),
    }
}

/// CLI flags win over the config file.
fn apply_overrides(mut config: ScrutineyeConfig, args: &RunArgs) -> ScrutineyeConfig {
    if let Some(view) = &args.view {
        config.display.start_view = view.clone();
    }
    if args.dark {
        config.display.dark_mode = true;
    }
    config
}

fn run_dashboard(args: &RunArgs) -> Result<()> {
    let config = apply_overrides(load_config(args.config.as_deref())?, args);
    let provider = Arc::new(FixtureProvider::new(load_fixture(args)?)?);
    let templates = provider.report_templates()?;

    let collaborators = Collaborators {
        provider: provider.clone(),
        search: SearchBackend::Threaded(SearchWorker::spawn(provider)),
        reports: Box::new(BackgroundReportGenerator::spawn(templates, REPORT_DELAY)),
    };
    let app = App::new(collaborators, config, Clock::System);

    let mut explorer = DashboardExplorer::new(app)?;
    explorer.run()
}

fn validate_fixture(args: &RunArgs) -> Result<()> {
    let fixture = load_fixture(args)?;
    let problems = fixture.problems();
    let source = args
        .data
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in sample data".to_string());

    if problems.is_empty() {
        println!(
            "{}: OK ({} cases, {} sellers, {} rules)",
            source,
            fixture.cases.len(),
            fixture.sellers.len(),
            fixture.rules.len()
        );
        return Ok(());
    }

    for problem in &problems {
        eprintln!("  - {}", problem);
    }
    anyhow::bail!("{}: {} problem(s) found", source, problems.len())
}
