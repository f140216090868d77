use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Outcome of a single test case
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Success,
    Failure,
    Error,
    Skip,
}

impl Outcome {
    /// Map an outcome-indicating child tag to its outcome
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"error" => Some(Outcome::Error),
            b"failure" => Some(Outcome::Failure),
            b"skipped" => Some(Outcome::Skip),
            _ => None,
        }
    }

    /// Failures and errors are the only outcomes that can carry a screenshot
    pub fn is_unsuccessful(&self) -> bool {
        matches!(self, Outcome::Failure | Outcome::Error)
    }
}

/// Aggregated outcome of a whole class. Errors fold into `Failure`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassOutcome {
    #[default]
    Success,
    Failure,
    Skip,
}

/// Statistics for the entire run, taken from the root element
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct RunStatistics {
    pub total: u64,
    pub success: u64,
    pub skip: u64,
    pub error: u64,
    pub failure: u64,
    pub unsuccess: u64,
}

/// Per-class counters, accumulated from the cases themselves
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct ClassStatistics {
    pub total: u64,
    pub failure: u64,
    pub error: u64,
    pub skip: u64,
    pub success: u64,
}

impl ClassStatistics {
    pub fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Success => self.success += 1,
            Outcome::Failure => self.failure += 1,
            Outcome::Error => self.error += 1,
            Outcome::Skip => self.skip += 1,
        }
    }

    /// Class-level outcome. Only meaningful once every case of the class is counted.
    pub fn outcome(&self) -> ClassOutcome {
        if self.failure > 0 || self.error > 0 {
            ClassOutcome::Failure
        } else if self.skip == self.total {
            ClassOutcome::Skip
        } else {
            ClassOutcome::Success
        }
    }
}

/// A single parsed `<testcase>`
#[derive(Debug, Clone, Serialize)]
pub struct TestCaseRecord {
    #[serde(skip)]
    pub classname: String,
    pub name: String,
    pub time: String,
    pub result: Outcome,
    pub exc_type: Option<String>,
    pub exc_message: Option<String>,
    pub traceback: Option<String>,
    pub output: Option<String>,
    pub screenshot: Option<String>,
    pub uuid: String,
}

impl TestCaseRecord {
    pub fn new(classname: &str, name: &str, time: &str) -> Self {
        Self {
            classname: classname.to_string(),
            name: name.to_string(),
            time: time.to_string(),
            result: Outcome::Success,
            exc_type: None,
            exc_message: None,
            traceback: None,
            output: None,
            screenshot: None,
            uuid: Uuid::new_v4().to_string(),
        }
    }
}

/// All cases sharing one `classname`
#[derive(Debug, Clone, Serialize)]
pub struct ClassReport {
    #[serde(skip)]
    pub name: String,
    pub tests: Vec<TestCaseRecord>,
    pub stats: ClassStatistics,
    pub result: ClassOutcome,
    pub uuid: String,
}

impl ClassReport {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tests: Vec::new(),
            stats: ClassStatistics::default(),
            result: ClassOutcome::Success,
            uuid: Uuid::new_v4().to_string(),
        }
    }
}

/// Everything the renderer needs
#[derive(Debug, Clone, Serialize)]
pub struct ReportModel {
    /// Class reports in order of first appearance, serialized as a name-keyed map
    #[serde(serialize_with = "serialize_classes")]
    pub report: Vec<ClassReport>,
    pub stats: RunStatistics,
    pub coverage: bool,
    pub generated_at: String,
}

impl ReportModel {
    pub fn class(&self, name: &str) -> Option<&ClassReport> {
        self.report.iter().find(|c| c.name == name)
    }
}

fn serialize_classes<S: Serializer>(classes: &[ClassReport], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(classes.len()))?;
    for class in classes {
        map.serialize_entry(&class.name, class)?;
    }
    map.end()
}
