//! Derivation engine: component list in, flight-test verdicts out
//!
//! Every function here is pure. Nothing is cached; callers re-run the
//! pipeline whenever the build or the test config changes:
//!
//! ```text
//! aggregate(components) -> evaluate(test, summary, config) -> summarize + recommendation
//! ```

pub mod capability;
pub mod config;
pub mod evaluator;
pub mod parse;
pub mod performance;
pub mod progress;
pub mod result;
pub mod summary;

pub use capability::{aggregate, CapabilitySummary};
pub use config::{ConfigField, TestConfig};
pub use evaluator::{evaluate, TestId};
pub use performance::PerformancePanel;
pub use progress::{Phase, TestRun};
pub use result::{ResultStatus, TestResult, Trend};
pub use summary::{recommendation, summarize, BuildState, ResultSummary};

use crate::entities::build::Build;

/// Full evaluation of a build, ready for rendering
#[derive(Debug, Clone, serde::Serialize)]
pub struct Report {
    pub test: TestId,
    pub state: BuildState,
    pub config: TestConfig,
    pub capability: CapabilitySummary,
    pub results: Vec<TestResult>,
    pub summary: ResultSummary,
    pub recommendation: &'static str,
}

impl Report {
    /// Run the whole pipeline for one build and test
    pub fn run(build: &Build, test: TestId, config: &TestConfig) -> Self {
        let capability = aggregate(&build.components);
        let count = build.len();
        let results = evaluate(test, &capability, config, count);
        let summary = summarize(&results);
        let state = BuildState::classify(&capability, count);
        Self {
            test,
            state,
            config: *config,
            capability,
            results,
            recommendation: recommendation(state, summary.overall),
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::capability::fixtures::scenario_b;
    use crate::engine::summary::{RECOMMEND_EMPTY, RECOMMEND_FAIL};

    #[test]
    fn test_report_for_empty_build() {
        let build = Build::new("bare", None);
        let report = Report::run(&build, TestId::Hover, &TestConfig::default());
        assert_eq!(report.state, BuildState::Empty);
        assert_eq!(report.summary.fail_count, 4);
        assert_eq!(report.recommendation, RECOMMEND_EMPTY);
    }

    #[test]
    fn test_report_bundles_pipeline() {
        let build = scenario_b()
            .into_iter()
            .fold(Build::new("quad", None), |acc, placed| acc.with_placed(placed));
        let report = Report::run(&build, TestId::Speed, &TestConfig::default());

        assert_eq!(report.state, BuildState::Ready);
        assert_eq!(report.capability.total_weight, 346);
        assert_eq!(report.results[0].value, "34 km/h");
        assert_eq!(report.summary.overall, ResultStatus::Fail);
        assert_eq!(report.recommendation, RECOMMEND_FAIL);
    }
}
