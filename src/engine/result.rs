//! Result rows produced by a test evaluation

use serde::{Deserialize, Serialize};

/// Qualitative outcome of one metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Pass,
    Warning,
    Fail,
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultStatus::Pass => write!(f, "pass"),
            ResultStatus::Warning => write!(f, "warning"),
            ResultStatus::Fail => write!(f, "fail"),
        }
    }
}

impl ResultStatus {
    /// Band for a metric where bigger is better
    pub fn at_least(value: f64, pass_min: f64, warn_min: f64) -> Self {
        if value >= pass_min {
            ResultStatus::Pass
        } else if value >= warn_min {
            ResultStatus::Warning
        } else {
            ResultStatus::Fail
        }
    }

    /// Band for a metric where smaller is better
    pub fn at_most(value: f64, pass_max: f64, warn_max: f64) -> Self {
        if value <= pass_max {
            ResultStatus::Pass
        } else if value <= warn_max {
            ResultStatus::Warning
        } else {
            ResultStatus::Fail
        }
    }

    pub fn from_flag(present: bool) -> Self {
        if present {
            ResultStatus::Pass
        } else {
            ResultStatus::Fail
        }
    }
}

/// Direction a metric moved relative to its neutral baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Neutral => write!(f, "neutral"),
        }
    }
}

impl Trend {
    /// Trend of a bigger-is-better metric against `baseline`
    pub fn higher_is_better(value: f64, baseline: f64) -> Self {
        if value > baseline {
            Trend::Up
        } else if value < baseline {
            Trend::Down
        } else {
            Trend::Neutral
        }
    }

    /// Trend of a smaller-is-better metric against `baseline`
    pub fn lower_is_better(value: f64, baseline: f64) -> Self {
        Trend::higher_is_better(baseline, value)
    }

    pub fn from_flag(present: bool) -> Self {
        if present {
            Trend::Up
        } else {
            Trend::Down
        }
    }

    /// Arrow glyph for terminal output
    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Neutral => "–",
        }
    }
}

/// One named, valued, statused metric row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub label: String,
    /// Formatted value with units
    pub value: String,
    pub trend: Trend,
    pub status: ResultStatus,
}

impl TestResult {
    pub fn new(label: impl Into<String>, value: impl Into<String>, trend: Trend, status: ResultStatus) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            trend,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_bands() {
        assert_eq!(ResultStatus::at_least(80.0, 80.0, 60.0), ResultStatus::Pass);
        assert_eq!(ResultStatus::at_least(79.9, 80.0, 60.0), ResultStatus::Warning);
        assert_eq!(ResultStatus::at_least(59.0, 80.0, 60.0), ResultStatus::Fail);

        assert_eq!(ResultStatus::at_most(0.5, 0.5, 1.0), ResultStatus::Pass);
        assert_eq!(ResultStatus::at_most(0.8, 0.5, 1.0), ResultStatus::Warning);
        assert_eq!(ResultStatus::at_most(1.2, 0.5, 1.0), ResultStatus::Fail);
    }

    #[test]
    fn test_trends() {
        assert_eq!(Trend::higher_is_better(90.0, 80.0), Trend::Up);
        assert_eq!(Trend::higher_is_better(70.0, 80.0), Trend::Down);
        assert_eq!(Trend::higher_is_better(80.0, 80.0), Trend::Neutral);
        assert_eq!(Trend::lower_is_better(20.0, 30.0), Trend::Up);
        assert_eq!(Trend::lower_is_better(40.0, 30.0), Trend::Down);
    }

    #[test]
    fn test_status_ordering_puts_fail_last() {
        let mut statuses = vec![ResultStatus::Fail, ResultStatus::Pass, ResultStatus::Warning];
        statuses.sort();
        assert_eq!(
            statuses,
            vec![ResultStatus::Pass, ResultStatus::Warning, ResultStatus::Fail]
        );
    }

    #[test]
    fn test_result_serializes_lowercase() {
        let row = TestResult::new("GPS Status", "No GPS", Trend::Down, ResultStatus::Fail);
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"label":"GPS Status","value":"No GPS","trend":"down","status":"fail"}"#
        );
    }
}
