use super::types::ReportModel;
use handlebars::{handlebars_helper, Handlebars};
use log::debug;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the template directory
pub const TEMPLATE_NAME: &str = "report.template";

const DEFAULT_TEMPLATE: &str = include_str!("../../templates/report.template");

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),
    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns a report model into the final document text
pub trait Renderer {
    fn render(&self, model: &ReportModel) -> Result<String, RenderError>;
}

handlebars_helper!(duration: |time: str| format_duration(time));

/// Handlebars-backed renderer for `report.template`
#[derive(Debug)]
pub struct HandlebarsRenderer {
    handlebars: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Renderer using the built-in template
    pub fn new() -> Result<Self, RenderError> {
        Self::with_template(DEFAULT_TEMPLATE)
    }

    /// Renderer using `<dir>/report.template`, or the built-in one when the file is absent
    pub fn from_dir(dir: &Path) -> Result<Self, RenderError> {
        let path = dir.join(TEMPLATE_NAME);
        if path.is_file() {
            debug!("Using template {}", path.display());
            let template = std::fs::read_to_string(&path)?;
            Self::with_template(&template)
        } else {
            debug!("No template at {}, using built-in", path.display());
            Self::new()
        }
    }

    pub fn with_template(template: &str) -> Result<Self, RenderError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_helper("duration", Box::new(duration));
        handlebars.register_template_string(TEMPLATE_NAME, template)?;
        Ok(Self { handlebars })
    }
}

impl Renderer for HandlebarsRenderer {
    fn render(&self, model: &ReportModel) -> Result<String, RenderError> {
        Ok(self.handlebars.render(TEMPLATE_NAME, model)?)
    }
}

/// Human-friendly elapsed time from a seconds value; unparseable input is shown as-is
fn format_duration(time: &str) -> String {
    let Ok(secs) = time.trim().parse::<f64>() else {
        return time.to_string();
    };
    let ms = (secs * 1000.0).round().max(0.0) as u64;

    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60000;
        let seconds = (ms % 60000) as f64 / 1000.0;
        format!("{}m {:.0}s", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::builder::build_model;
    use crate::report::types::{Outcome, RunStatistics, TestCaseRecord};

    fn sample_model() -> ReportModel {
        let mut failed = TestCaseRecord::new("murano.tests.Deploy", "test_deploy", "75.2");
        failed.result = Outcome::Failure;
        failed.exc_type = Some("AssertionError".to_string());
        failed.exc_message = Some("<500> is not 200".to_string());
        failed.screenshot = Some("artifacts/screenshots/test_deploy.png".to_string());

        let passed = TestCaseRecord::new("murano.tests.Catalog", "test_list", "0.25");

        let stats = RunStatistics {
            total: 2,
            success: 1,
            failure: 1,
            unsuccess: 1,
            ..Default::default()
        };
        build_model(stats, vec![failed, passed], true)
    }

    #[test]
    fn test_default_template_renders_model() {
        let renderer = HandlebarsRenderer::new().expect("Failed to build renderer");
        let html = renderer.render(&sample_model()).expect("Failed to render");

        assert!(html.contains("<h3>murano.tests.Deploy</h3>"));
        assert!(html.contains("<h3>murano.tests.Catalog</h3>"));
        assert!(html.contains("AssertionError: &lt;500&gt; is not 200"));
        assert!(html.contains(r#"href="artifacts/screenshots/test_deploy.png""#));
        assert!(html.contains("Coverage report"));
        assert!(html.contains("1m 15s"));
        assert!(html.contains("250ms"));
    }

    #[test]
    fn test_class_order_follows_document() {
        let renderer = HandlebarsRenderer::new().expect("Failed to build renderer");
        let html = renderer.render(&sample_model()).expect("Failed to render");

        let deploy = html.find("murano.tests.Deploy").expect("deploy class");
        let catalog = html.find("murano.tests.Catalog").expect("catalog class");
        assert!(deploy < catalog);
    }

    #[test]
    fn test_template_from_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(TEMPLATE_NAME),
            "{{stats.total}}|{{coverage}}|{{#each report}}{{@key}}={{this.result}};{{/each}}",
        )
        .expect("write template");

        let renderer = HandlebarsRenderer::from_dir(dir.path()).expect("Failed to build renderer");
        let out = renderer.render(&sample_model()).expect("Failed to render");

        assert_eq!(
            out,
            "2|true|murano.tests.Deploy=failure;murano.tests.Catalog=success;"
        );
    }

    #[test]
    fn test_missing_template_dir_falls_back_to_builtin() {
        let renderer = HandlebarsRenderer::from_dir(Path::new("/nonexistent/templates"))
            .expect("Failed to build renderer");
        let html = renderer.render(&sample_model()).expect("Failed to render");
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_invalid_template_is_rejected() {
        assert!(matches!(
            HandlebarsRenderer::with_template("{{#each report}}"),
            Err(RenderError::Template(_))
        ));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration("0.25"), "250ms");
        assert_eq!(format_duration("12.5"), "12.5s");
        assert_eq!(format_duration("75.2"), "1m 15s");
        assert_eq!(format_duration("n/a"), "n/a");
    }
}
