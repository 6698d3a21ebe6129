//! Builder performance panel: build progress, headline metrics, suggestions

use serde::Serialize;

use crate::engine::capability::CapabilitySummary;
use crate::engine::evaluator::{flight_minutes, BaseMetrics};

/// Weight bands for the headline weight figure
const LIGHT_BUILD_GRAMS: u32 = 500;
const MEDIUM_BUILD_GRAMS: u32 = 800;
/// Above this the panel suggests lighter parts
const AGILITY_LIMIT_GRAMS: u32 = 600;

pub const ALL_CLEAR: &str = "Looking good! Ready to simulate.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Good,
    Warning,
    Bad,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
    pub status: MetricStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub text: &'static str,
    pub priority: Priority,
}

/// Everything the performance panel shows for one build
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformancePanel {
    /// Build progress in percent, 25 per core part
    pub completeness: u8,
    pub metrics: Vec<Metric>,
    pub suggestions: Vec<Suggestion>,
    pub component_count: usize,
}

impl PerformancePanel {
    pub fn from_summary(summary: &CapabilitySummary, component_count: usize) -> Self {
        Self {
            completeness: completeness(summary),
            metrics: metrics(summary),
            suggestions: suggestions(summary),
            component_count,
        }
    }

    pub fn is_all_clear(&self) -> bool {
        self.suggestions.is_empty()
    }
}

fn completeness(summary: &CapabilitySummary) -> u8 {
    let parts = [
        summary.has_motors,
        summary.has_frame,
        summary.has_battery,
        summary.has_flight_controller,
    ];
    parts.iter().filter(|p| **p).count() as u8 * 25
}

fn metrics(summary: &CapabilitySummary) -> Vec<Metric> {
    let base = BaseMetrics::from_summary(summary);

    let weight_status = if summary.total_weight < LIGHT_BUILD_GRAMS {
        MetricStatus::Good
    } else if summary.total_weight < MEDIUM_BUILD_GRAMS {
        MetricStatus::Warning
    } else {
        MetricStatus::Bad
    };

    let unavailable = |label| Metric {
        label,
        value: "N/A".to_string(),
        status: MetricStatus::Neutral,
    };

    let flight_time = if summary.has_battery {
        Metric {
            label: "Flight Time",
            value: format!("~{} min", flight_minutes(summary).round() as i64),
            status: MetricStatus::Good,
        }
    } else {
        unavailable("Flight Time")
    };

    let (max_speed, thrust_ratio) = if summary.has_motors {
        (
            Metric {
                label: "Max Speed",
                value: format!("{} km/h", base.max_speed_kmh as i64),
                status: MetricStatus::Good,
            },
            Metric {
                label: "Thrust/Weight",
                value: format!("{:.1}:1", summary.thrust_to_weight),
                status: MetricStatus::Good,
            },
        )
    } else {
        (unavailable("Max Speed"), unavailable("Thrust/Weight"))
    };

    vec![
        Metric {
            label: "Total Weight",
            value: format!("{}g", summary.total_weight),
            status: weight_status,
        },
        flight_time,
        max_speed,
        thrust_ratio,
    ]
}

fn suggestions(summary: &CapabilitySummary) -> Vec<Suggestion> {
    let candidates = [
        (!summary.has_frame, "Add a frame to start your build", Priority::High),
        (!summary.has_motors, "Add motors for propulsion", Priority::High),
        (!summary.has_battery, "Add a battery for power", Priority::Medium),
        (!summary.has_flight_controller, "Add a flight controller", Priority::Medium),
        (
            summary.total_weight > AGILITY_LIMIT_GRAMS,
            "Consider lighter components for better agility",
            Priority::Low,
        ),
        (
            summary.has_motors && !summary.has_propellers,
            "Don't forget the propellers!",
            Priority::High,
        ),
    ];

    candidates
        .into_iter()
        .filter(|(applies, _, _)| *applies)
        .map(|(_, text, priority)| Suggestion { text, priority })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::capability::aggregate;
    use crate::engine::capability::fixtures::{placed, scenario_b};

    fn panel(ids: &[&str]) -> PerformancePanel {
        let build = placed(ids);
        PerformancePanel::from_summary(&aggregate(&build), build.len())
    }

    fn metric<'a>(panel: &'a PerformancePanel, label: &str) -> &'a Metric {
        panel.metrics.iter().find(|m| m.label == label).unwrap()
    }

    #[test]
    fn test_empty_panel() {
        let panel = panel(&[]);
        assert_eq!(panel.completeness, 0);
        assert_eq!(metric(&panel, "Total Weight").value, "0g");
        assert_eq!(metric(&panel, "Total Weight").status, MetricStatus::Good);
        assert_eq!(metric(&panel, "Flight Time").value, "N/A");
        assert_eq!(metric(&panel, "Max Speed").value, "N/A");
        assert_eq!(panel.suggestions.len(), 4);
        assert_eq!(panel.suggestions[0].priority, Priority::High);
    }

    #[test]
    fn test_completeness_steps() {
        assert_eq!(panel(&["frame-x"]).completeness, 25);
        assert_eq!(panel(&["frame-x", "motor-2212"]).completeness, 50);
        assert_eq!(panel(&["frame-x", "motor-2212", "battery-3s"]).completeness, 75);
        // propellers are not part of the progress bar
        assert_eq!(panel(&["prop-5x4"]).completeness, 0);
    }

    #[test]
    fn test_ready_build_metrics() {
        let build = scenario_b();
        let panel = PerformancePanel::from_summary(&aggregate(&build), build.len());
        assert_eq!(panel.completeness, 100);
        assert_eq!(metric(&panel, "Total Weight").value, "346g");
        assert_eq!(metric(&panel, "Flight Time").value, "~21 min");
        assert_eq!(metric(&panel, "Max Speed").value, "44 km/h");
        assert_eq!(metric(&panel, "Thrust/Weight").value, "2.5:1");
        assert!(panel.is_all_clear());
    }

    #[test]
    fn test_missing_propellers_suggestion() {
        let panel = panel(&["frame-x", "motor-2212", "battery-4s", "fc-f4"]);
        assert_eq!(panel.suggestions.len(), 1);
        assert_eq!(panel.suggestions[0].text, "Don't forget the propellers!");
        assert_eq!(panel.suggestions[0].priority, Priority::High);
    }

    #[test]
    fn test_heavy_build() {
        let panel = panel(&[
            "frame-h", "motor-3115", "motor-3115", "motor-3115", "motor-3115", "battery-6s", "gimbal",
        ]);
        assert!(panel.suggestions.iter().any(|s| s.priority == Priority::Low));
        assert_ne!(metric(&panel, "Total Weight").status, MetricStatus::Good);
    }
}
