pub mod artifacts;
pub mod builder;
pub mod html;
pub mod json;
pub mod types;

use crate::parser;
use crate::utils::config::{Config, ReportFormat};
use anyhow::{Context, Result};
use artifacts::Workspace;
use html::{HandlebarsRenderer, Renderer};
use log::info;
use std::io::Write;
use std::path::Path;
use types::ReportModel;

/// Parse the run document and build the report model
pub fn build_report(input: &Path, workspace: &Workspace) -> Result<ReportModel> {
    let document = parser::parse_file(input)?;
    let mut cases = document.cases;

    workspace.attach_screenshots(&mut cases);

    Ok(builder::build_model(
        document.stats,
        cases,
        workspace.has_coverage(),
    ))
}

/// Render the model and write it to `output`. The file is only created once rendering succeeded.
pub fn write_report(model: &ReportModel, output: &Path, renderer: &dyn Renderer) -> Result<()> {
    let content = renderer.render(model).context("Failed to render report")?;
    write_output(output, &content)
}

/// Generate the report for `input` into `output`
pub fn generate_report(input: &Path, output: &Path, config: &Config) -> Result<ReportModel> {
    let workspace = Workspace::new(config.workspace.clone());
    let model = build_report(input, &workspace)?;

    match config.format {
        ReportFormat::Html => {
            let renderer = HandlebarsRenderer::from_dir(&config.template_dir)
                .context("Failed to load report template")?;
            write_report(&model, output, &renderer)?;
        }
        ReportFormat::Json => {
            let content = json::generate(&model)?;
            write_output(output, &content)?;
        }
    }

    info!("Report written to {}", output.display());
    Ok(model)
}

fn write_output(output: &Path, content: &str) -> Result<()> {
    let mut file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}
