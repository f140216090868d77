use clap::ValueEnum;
use std::path::PathBuf;

/// Directory holding `report.template`, next to the running executable
pub const TEMPLATE_DIR: &str = "templates";

/// Output document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Html,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root for `artifacts/screenshots` and `artifacts/coverage`; `None` disables artifact lookup
    pub workspace: Option<PathBuf>,

    /// Directory searched for the report template
    pub template_dir: PathBuf,

    pub format: ReportFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace: None,
            template_dir: default_template_dir(),
            format: ReportFormat::Html,
        }
    }
}

/// `templates/` beside the executable, falling back to the working directory
pub fn default_template_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(TEMPLATE_DIR)))
        .unwrap_or_else(|| PathBuf::from(TEMPLATE_DIR))
}
