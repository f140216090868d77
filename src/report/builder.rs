use super::types::{ClassReport, ReportModel, RunStatistics, TestCaseRecord};
use std::collections::HashMap;

/// Group cases by class name, preserving first-appearance order of classes
/// and document order of cases within each class.
pub fn group_by_class(cases: Vec<TestCaseRecord>) -> Vec<ClassReport> {
    let mut classes: Vec<ClassReport> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for case in cases {
        let slot = *index.entry(case.classname.clone()).or_insert_with(|| {
            classes.push(ClassReport::new(&case.classname));
            classes.len() - 1
        });

        let class = &mut classes[slot];
        class.stats.record(case.result);
        class.tests.push(case);
    }

    // The all-skipped rule needs each class's final total.
    for class in &mut classes {
        class.result = class.stats.outcome();
    }

    classes
}

/// Compose the render-ready model
pub fn build_model(
    stats: RunStatistics,
    cases: Vec<TestCaseRecord>,
    coverage: bool,
) -> ReportModel {
    ReportModel {
        report: group_by_class(cases),
        stats,
        coverage,
        generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}
