use clap::Parser;
use colored::Colorize;
use log::error;
use std::path::PathBuf;

use junit_html_report::report;
use junit_html_report::report::types::ReportModel;
use junit_html_report::utils::config::{default_template_dir, Config, ReportFormat};

#[derive(Parser)]
#[command(name = "junit2html")]
#[command(version)]
#[command(about = "Render a JUnit-style test result file as an HTML report", long_about = None)]
struct Cli {
    /// Path to the test results XML
    input: PathBuf,

    /// Output file path
    output: PathBuf,

    /// Workspace holding artifacts/screenshots and artifacts/coverage
    #[arg(long, env = "WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Directory containing report.template (defaults to templates/ next to the executable)
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Html)]
    format: ReportFormat,

    /// Enable debug logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if !cli.input.exists() {
        error!("Test results not found: {}", cli.input.display());
        std::process::exit(1);
    }

    let config = Config {
        workspace: cli.workspace.filter(|p| !p.as_os_str().is_empty()),
        template_dir: cli.templates.unwrap_or_else(default_template_dir),
        format: cli.format,
    };

    println!(
        "{} Generating report from: {}",
        "📊".to_string().blue(),
        cli.input.display()
    );

    let model = report::generate_report(&cli.input, &cli.output, &config)?;

    print_summary(&model);
    println!(
        "  Report saved to: {}",
        cli.output.display().to_string().cyan()
    );

    Ok(())
}

fn print_summary(model: &ReportModel) {
    let stats = &model.stats;
    println!(
        "  {} total, {} passed, {} failed, {} errors, {} skipped in {} classes",
        stats.total,
        stats.success.to_string().green(),
        stats.failure.to_string().red(),
        stats.error.to_string().red(),
        stats.skip.to_string().yellow(),
        model.report.len()
    );
}
