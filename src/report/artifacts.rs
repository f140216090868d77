use crate::report::types::TestCaseRecord;
use log::debug;
use std::path::{Path, PathBuf};

const SCREENSHOTS_DIR: &str = "artifacts/screenshots";
const COVERAGE_DIR: &str = "artifacts/coverage";

/// Root directory that CI jobs drop their artifacts into.
///
/// Every probe is best effort: with no root configured, or when a path
/// cannot be inspected, the artifact is simply reported as absent.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    root: Option<PathBuf>,
}

impl Workspace {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Workspace-relative path of the screenshot for a case, if the file exists
    pub fn resolve_screenshot(&self, case_name: &str) -> Option<String> {
        let root = self.root.as_ref()?;
        let relative = format!("{}/{}.png", SCREENSHOTS_DIR, case_name);
        let candidate = root.join(&relative);

        match candidate.try_exists() {
            Ok(true) if candidate.is_file() => Some(relative),
            Ok(_) => None,
            Err(e) => {
                debug!("Cannot inspect {}: {}", candidate.display(), e);
                None
            }
        }
    }

    /// Attach screenshots to every failed or errored case
    pub fn attach_screenshots(&self, cases: &mut [TestCaseRecord]) {
        let Some(root) = self.root() else {
            debug!("No workspace configured, skipping screenshot lookup");
            return;
        };
        debug!("Looking up screenshots under {}", root.display());

        for case in cases.iter_mut().filter(|c| c.result.is_unsuccessful()) {
            case.screenshot = self.resolve_screenshot(&case.name);
            if let Some(path) = &case.screenshot {
                debug!("Found screenshot for {}: {}", case.name, path);
            }
        }
    }

    /// Whether a coverage artifact directory is present
    pub fn has_coverage(&self) -> bool {
        self.root
            .as_ref()
            .map(|root| root.join(COVERAGE_DIR).is_dir())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::Outcome;

    fn workspace_with_screenshot(name: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let shots = dir.path().join(SCREENSHOTS_DIR);
        std::fs::create_dir_all(&shots).expect("create screenshots dir");
        std::fs::write(shots.join(format!("{}.png", name)), b"\x89PNG").expect("write png");
        dir
    }

    #[test]
    fn test_resolve_existing_screenshot() {
        let dir = workspace_with_screenshot("test_login");
        let workspace = Workspace::new(Some(dir.path().to_path_buf()));
        assert_eq!(workspace.root(), Some(dir.path()));

        assert_eq!(
            workspace.resolve_screenshot("test_login").as_deref(),
            Some("artifacts/screenshots/test_login.png")
        );
        assert!(workspace.resolve_screenshot("test_other").is_none());
    }

    #[test]
    fn test_screenshot_only_for_failures_and_errors() {
        let dir = workspace_with_screenshot("test_a");
        let workspace = Workspace::new(Some(dir.path().to_path_buf()));

        let mut cases: Vec<TestCaseRecord> = [Outcome::Error, Outcome::Failure, Outcome::Skip, Outcome::Success]
            .into_iter()
            .map(|outcome| {
                let mut case = TestCaseRecord::new("a.B", "test_a", "0.1");
                case.result = outcome;
                case
            })
            .collect();

        workspace.attach_screenshots(&mut cases);

        let expected = Some("artifacts/screenshots/test_a.png".to_string());
        assert_eq!(cases[0].screenshot, expected);
        assert_eq!(cases[1].screenshot, expected);
        assert!(cases[2].screenshot.is_none());
        assert!(cases[3].screenshot.is_none());
    }

    #[test]
    fn test_unset_workspace_has_no_artifacts() {
        let workspace = Workspace::default();
        assert!(workspace.root().is_none());
        let mut case = TestCaseRecord::new("a.B", "test_a", "0.1");
        case.result = Outcome::Error;
        let mut cases = vec![case];

        workspace.attach_screenshots(&mut cases);

        assert!(cases[0].screenshot.is_none());
        assert!(workspace.resolve_screenshot("test_a").is_none());
        assert!(!workspace.has_coverage());
    }

    #[test]
    fn test_missing_workspace_root_is_not_an_error() {
        let workspace = Workspace::new(Some(PathBuf::from("/nonexistent/workspace/root")));
        assert!(workspace.resolve_screenshot("test_a").is_none());
        assert!(!workspace.has_coverage());
    }

    #[test]
    fn test_coverage_directory_detection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let workspace = Workspace::new(Some(dir.path().to_path_buf()));
        assert!(!workspace.has_coverage());

        std::fs::create_dir_all(dir.path().join(COVERAGE_DIR)).expect("create coverage dir");
        assert!(workspace.has_coverage());
    }
}
