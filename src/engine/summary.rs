//! Result/status reduction and the user-facing recommendation

use serde::Serialize;

use crate::engine::capability::CapabilitySummary;
use crate::engine::result::{ResultStatus, TestResult};

/// Which branch of the evaluator a build falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildState {
    /// No components placed
    Empty,
    /// Components placed but a required part is missing
    Incomplete,
    /// Flight ready; per-test formulas apply
    Ready,
}

impl BuildState {
    pub fn classify(summary: &CapabilitySummary, component_count: usize) -> Self {
        if component_count == 0 {
            BuildState::Empty
        } else if !summary.is_flight_ready {
            BuildState::Incomplete
        } else {
            BuildState::Ready
        }
    }
}

impl std::fmt::Display for BuildState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildState::Empty => write!(f, "empty"),
            BuildState::Incomplete => write!(f, "incomplete"),
            BuildState::Ready => write!(f, "ready"),
        }
    }
}

/// Status counts of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub pass_count: usize,
    pub warning_count: usize,
    pub fail_count: usize,
    pub overall: ResultStatus,
}

impl ResultSummary {
    pub fn total(&self) -> usize {
        self.pass_count + self.warning_count + self.fail_count
    }
}

/// Count statuses; the overall status is the worst one present
pub fn summarize(results: &[TestResult]) -> ResultSummary {
    let count = |status: ResultStatus| results.iter().filter(|r| r.status == status).count();
    let overall = results
        .iter()
        .map(|r| r.status)
        .max()
        .unwrap_or(ResultStatus::Pass);

    ResultSummary {
        pass_count: count(ResultStatus::Pass),
        warning_count: count(ResultStatus::Warning),
        fail_count: count(ResultStatus::Fail),
        overall,
    }
}

pub const RECOMMEND_EMPTY: &str = "Add components in the builder to run flight simulations.";
pub const RECOMMEND_INCOMPLETE: &str =
    "Build is incomplete. Add the missing parts before flight testing.";
pub const RECOMMEND_FAIL: &str =
    "Critical issues detected. Improve thrust-to-weight or ease test conditions before flying.";
pub const RECOMMEND_WARNING: &str =
    "Consider optimizing motor cooling or reducing sustained high-power operations.";
pub const RECOMMEND_READY: &str = "Performance is within optimal parameters. Ready for deployment.";

/// Recommendation text for a build state and overall verdict
pub fn recommendation(state: BuildState, overall: ResultStatus) -> &'static str {
    match (state, overall) {
        (BuildState::Empty, _) => RECOMMEND_EMPTY,
        (BuildState::Incomplete, _) => RECOMMEND_INCOMPLETE,
        (BuildState::Ready, ResultStatus::Fail) => RECOMMEND_FAIL,
        (BuildState::Ready, ResultStatus::Warning) => RECOMMEND_WARNING,
        (BuildState::Ready, ResultStatus::Pass) => RECOMMEND_READY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::capability::aggregate;
    use crate::engine::capability::fixtures::{placed, scenario_b};
    use crate::engine::config::TestConfig;
    use crate::engine::evaluator::{evaluate, TestId};
    use crate::engine::result::Trend;

    fn result(status: ResultStatus) -> TestResult {
        TestResult::new("x", "1", Trend::Neutral, status)
    }

    #[test]
    fn test_overall_is_worst_status() {
        let mixed = [
            result(ResultStatus::Pass),
            result(ResultStatus::Warning),
            result(ResultStatus::Pass),
        ];
        let summary = summarize(&mixed);
        assert_eq!(summary.pass_count, 2);
        assert_eq!(summary.warning_count, 1);
        assert_eq!(summary.fail_count, 0);
        assert_eq!(summary.overall, ResultStatus::Warning);

        let failing = [result(ResultStatus::Warning), result(ResultStatus::Fail)];
        assert_eq!(summarize(&failing).overall, ResultStatus::Fail);
    }

    #[test]
    fn test_counts_add_up_for_every_test() {
        let summary = aggregate(&scenario_b());
        for test in TestId::all() {
            let results = evaluate(*test, &summary, &TestConfig::default(), 5);
            assert_eq!(summarize(&results).total(), results.len());
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(BuildState::classify(&aggregate(&[]), 0), BuildState::Empty);
        let partial = placed(&["frame-x", "gps"]);
        assert_eq!(
            BuildState::classify(&aggregate(&partial), partial.len()),
            BuildState::Incomplete
        );
        assert_eq!(
            BuildState::classify(&aggregate(&scenario_b()), 5),
            BuildState::Ready
        );
    }

    #[test]
    fn test_recommendation_priority() {
        assert_eq!(recommendation(BuildState::Empty, ResultStatus::Fail), RECOMMEND_EMPTY);
        assert_eq!(
            recommendation(BuildState::Incomplete, ResultStatus::Pass),
            RECOMMEND_INCOMPLETE
        );
        assert_eq!(recommendation(BuildState::Ready, ResultStatus::Fail), RECOMMEND_FAIL);
        assert_eq!(
            recommendation(BuildState::Ready, ResultStatus::Warning),
            RECOMMEND_WARNING
        );
        assert_eq!(recommendation(BuildState::Ready, ResultStatus::Pass), RECOMMEND_READY);
    }

    #[test]
    fn test_empty_build_recommendation() {
        let summary = aggregate(&[]);
        let results = evaluate(TestId::Hover, &summary, &TestConfig::default(), 0);
        let overall = summarize(&results).overall;
        let state = BuildState::classify(&summary, 0);
        assert_eq!(recommendation(state, overall), RECOMMEND_EMPTY);
    }
}
