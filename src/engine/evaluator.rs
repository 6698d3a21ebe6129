//! Test evaluation - closed-form metric estimates per flight test
//!
//! The coefficients below are product-tuned estimates, not validated physics.
//! They are kept as named constants so results stay reproducible across
//! releases; change them only together with the expected values in the tests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::engine::capability::CapabilitySummary;
use crate::engine::config::TestConfig;
use crate::engine::result::{ResultStatus, TestResult, Trend};
use crate::engine::summary::BuildState;

/// Identifier of a flight test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestId {
    Hover,
    Ascent,
    Rotation,
    Wind,
    Speed,
    Thermal,
    Weather,
    Waypoint,
    /// General stability check, also used for unrecognized test ids
    Stability,
}

impl TestId {
    /// The eight selectable flight tests, in library order
    pub fn all() -> &'static [TestId] {
        &[
            TestId::Hover,
            TestId::Ascent,
            TestId::Rotation,
            TestId::Wind,
            TestId::Speed,
            TestId::Thermal,
            TestId::Weather,
            TestId::Waypoint,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TestId::Hover => "hover",
            TestId::Ascent => "ascent",
            TestId::Rotation => "rotation",
            TestId::Wind => "wind",
            TestId::Speed => "speed",
            TestId::Thermal => "thermal",
            TestId::Weather => "weather",
            TestId::Waypoint => "waypoint",
            TestId::Stability => "stability",
        }
    }

    /// Parse a test id, falling back to the stability set when unrecognized
    pub fn from_id_lenient(id: &str) -> Self {
        id.parse().unwrap_or_else(|_| {
            log::warn!("unrecognized test '{}', using the stability checks", id);
            TestId::Stability
        })
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TestId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        TestId::all()
            .iter()
            .chain(std::iter::once(&TestId::Stability))
            .copied()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| {
                format!(
                    "Invalid test: {}. Use hover, ascent, rotation, wind, speed, thermal, weather, or waypoint",
                    s
                )
            })
    }
}

// Base-quantity coefficients
const STABILITY_BASE: f64 = 70.0;
const STABILITY_PER_TWR: f64 = 8.0;
const STABILITY_GPS_BONUS: f64 = 10.0;
const STABILITY_CAP: f64 = 98.0;
const POWER_BASE: f64 = 60.0;
const POWER_MAH_DIVISOR: f64 = 50.0;
const POWER_HIGH_TWR_BONUS: f64 = 10.0;
const POWER_HIGH_TWR: f64 = 3.0;
const POWER_CAP: f64 = 95.0;
const RESPONSE_BASE_MS: f64 = 40.0;
const RESPONSE_PER_TWR_MS: f64 = 5.0;
const RESPONSE_FLOOR_MS: f64 = 15.0;
const SPEED_PER_TWR_KMH: f64 = 18.0;
const WIND_BASE_KMH: f64 = 15.0;
const WIND_PER_TWR_KMH: f64 = 5.0;
const WIND_HEAVY_BONUS_KMH: f64 = 5.0;
const HEAVY_BUILD_GRAMS: u32 = 400;

// Flight-time estimate: usable fraction of the pack and minutes per 100 g
const USABLE_CAPACITY: f64 = 0.8;

// Climb efficiency holds inside this temperature window
const COMFORT_MIN_C: f64 = 0.0;
const COMFORT_MAX_C: f64 = 35.0;

/// Quantities shared by every Ready-state formula
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseMetrics {
    pub stability: f64,
    pub power: f64,
    pub response_ms: f64,
    pub max_speed_kmh: f64,
    pub max_handled_wind_kmh: f64,
    pub flight_minutes: f64,
}

impl BaseMetrics {
    pub fn from_summary(summary: &CapabilitySummary) -> Self {
        let twr = summary.thrust_to_weight;
        let gps = if summary.has_gps { 1.0 } else { 0.0 };
        let high_twr = if twr > POWER_HIGH_TWR { 1.0 } else { 0.0 };
        let heavy = if summary.total_weight > HEAVY_BUILD_GRAMS { 1.0 } else { 0.0 };

        Self {
            stability: (STABILITY_BASE + STABILITY_PER_TWR * twr + STABILITY_GPS_BONUS * gps)
                .min(STABILITY_CAP),
            power: (POWER_BASE
                + summary.battery_capacity_mah as f64 / POWER_MAH_DIVISOR
                + POWER_HIGH_TWR_BONUS * high_twr)
                .min(POWER_CAP),
            response_ms: (RESPONSE_BASE_MS - RESPONSE_PER_TWR_MS * twr).max(RESPONSE_FLOOR_MS),
            max_speed_kmh: (SPEED_PER_TWR_KMH * twr).round(),
            max_handled_wind_kmh: WIND_BASE_KMH + WIND_PER_TWR_KMH * twr + WIND_HEAVY_BONUS_KMH * heavy,
            flight_minutes: flight_minutes(summary),
        }
    }
}

/// Estimated flight time in minutes, 0 for a weightless build
pub fn flight_minutes(summary: &CapabilitySummary) -> f64 {
    if summary.total_weight == 0 {
        return 0.0;
    }
    let amp_hours = summary.battery_capacity_mah as f64 / 1000.0;
    amp_hours * USABLE_CAPACITY * 60.0 / (summary.total_weight as f64 / 100.0)
}

/// Degrees outside the comfortable operating window
fn temperature_excursion(celsius: f64) -> f64 {
    if celsius < COMFORT_MIN_C {
        COMFORT_MIN_C - celsius
    } else if celsius > COMFORT_MAX_C {
        celsius - COMFORT_MAX_C
    } else {
        0.0
    }
}

fn percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Format rounded to a whole number
fn whole(value: f64) -> String {
    format!("{}", value.round() as i64)
}

/// Format rounded to one decimal place
fn tenths(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

fn higher_row(label: &str, value: f64, shown: String, pass: f64, warn: f64) -> TestResult {
    TestResult::new(
        label,
        shown,
        Trend::higher_is_better(value.round(), pass),
        ResultStatus::at_least(value.round(), pass, warn),
    )
}

fn lower_row(label: &str, value: f64, shown: String, pass: f64, warn: f64) -> TestResult {
    TestResult::new(
        label,
        shown,
        Trend::lower_is_better(value, pass),
        ResultStatus::at_most(value, pass, warn),
    )
}

/// Evaluate a test against a build summary
///
/// `component_count` is the number of placed components; an empty build
/// and an incomplete build short-circuit to fixed result sets before any
/// test formula runs.
pub fn evaluate(
    test: TestId,
    summary: &CapabilitySummary,
    config: &TestConfig,
    component_count: usize,
) -> Vec<TestResult> {
    match BuildState::classify(summary, component_count) {
        BuildState::Empty => empty_results(),
        BuildState::Incomplete => readiness_checklist(summary),
        BuildState::Ready => {
            let base = BaseMetrics::from_summary(summary);
            match test {
                TestId::Hover => hover(summary, &base, config),
                TestId::Ascent => ascent(summary, &base, config),
                TestId::Rotation => rotation(summary, &base, config),
                TestId::Wind => wind(summary, &base, config),
                TestId::Speed => speed(&base, config),
                TestId::Thermal => thermal(summary, config),
                TestId::Weather => weather(&base, config),
                TestId::Waypoint => waypoint(summary, &base, config),
                TestId::Stability => stability(summary, &base),
            }
        }
    }
}

fn empty_results() -> Vec<TestResult> {
    vec![
        TestResult::new("Components", "None", Trend::Neutral, ResultStatus::Fail),
        TestResult::new("Flight Readiness", "N/A", Trend::Neutral, ResultStatus::Fail),
        TestResult::new("Thrust/Weight", "N/A", Trend::Neutral, ResultStatus::Fail),
        TestResult::new("Flight Time", "N/A", Trend::Neutral, ResultStatus::Fail),
    ]
}

fn readiness_checklist(summary: &CapabilitySummary) -> Vec<TestResult> {
    fn row(label: &str, present: bool, value: String) -> TestResult {
        let value = if present { value } else { "Missing".to_string() };
        TestResult::new(label, value, Trend::from_flag(present), ResultStatus::from_flag(present))
    }

    let battery_value = if summary.battery_capacity_mah > 0 {
        format!("{}mAh", summary.battery_capacity_mah)
    } else {
        "OK".to_string()
    };

    vec![
        row("Frame", summary.has_frame, "OK".to_string()),
        row("Motors", summary.has_motors, format!("{}x", summary.motor_count)),
        row("Propellers", summary.has_propellers, format!("{}x", summary.propeller_count)),
        row("Battery", summary.has_battery, battery_value),
        row("Flight Controller", summary.has_flight_controller, "OK".to_string()),
    ]
}

fn position_hold(summary: &CapabilitySummary, config: &TestConfig) -> TestResult {
    let gps_factor = if summary.has_gps { 0.5 } else { 1.0 };
    let drift = (0.2 + config.wind_speed / 40.0) * gps_factor;
    lower_row("Position Hold", drift, format!("±{}m", tenths(drift)), 0.5, 1.0)
}

fn hover(summary: &CapabilitySummary, base: &BaseMetrics, config: &TestConfig) -> Vec<TestResult> {
    let stability = percent(base.stability - 0.4 * config.wind_speed - config.altitude / 100.0);
    let efficiency = percent(base.power - config.altitude / 50.0);
    let hover_time = (base.flight_minutes * (1.0 - config.wind_speed / 200.0)).max(0.0);

    vec![
        higher_row("Stability Score", stability, format!("{}%", whole(stability)), 80.0, 60.0),
        position_hold(summary, config),
        higher_row("Power Efficiency", efficiency, format!("{}%", whole(efficiency)), 75.0, 60.0),
        TestResult::new(
            "Hover Time",
            format!("{} min", tenths(hover_time)),
            Trend::higher_is_better(hover_time, 10.0),
            ResultStatus::at_least(hover_time, 10.0, 5.0),
        ),
    ]
}

fn ascent(summary: &CapabilitySummary, base: &BaseMetrics, config: &TestConfig) -> Vec<TestResult> {
    let climb_rate = ((summary.thrust_to_weight - 1.0) * 3.5).max(0.0);
    let efficiency = percent(base.power - 2.0 * temperature_excursion(config.temperature));
    let drain = if summary.battery_capacity_mah == 0 {
        100.0
    } else {
        (config.altitude * summary.total_weight as f64
            / (2.0 * summary.battery_capacity_mah as f64))
            .min(100.0)
    };

    let time_to_altitude = if climb_rate > 0.0 {
        let seconds = config.altitude / climb_rate;
        lower_row("Time to Altitude", seconds.round(), format!("{}s", whole(seconds)), 60.0, 120.0)
    } else {
        TestResult::new("Time to Altitude", "N/A", Trend::Down, ResultStatus::Fail)
    };

    vec![
        TestResult::new(
            "Climb Rate",
            format!("{} m/s", tenths(climb_rate)),
            Trend::higher_is_better(climb_rate, 5.0),
            ResultStatus::at_least(climb_rate, 5.0, 2.0),
        ),
        time_to_altitude,
        higher_row("Climb Efficiency", efficiency, format!("{}%", whole(efficiency)), 75.0, 60.0),
        lower_row("Battery Drain", drain.round(), format!("{}%", whole(drain)), 20.0, 40.0),
    ]
}

fn rotation(summary: &CapabilitySummary, base: &BaseMetrics, config: &TestConfig) -> Vec<TestResult> {
    let yaw_rate = 60.0 * summary.thrust_to_weight + 20.0 * config.precision;
    let response = base.response_ms + 2.0 * config.precision;
    let gps_bonus = if summary.has_gps { 0.5 } else { 0.0 };
    let heading = (0.5 + 0.3 * config.precision - gps_bonus).max(0.1);
    let stability = percent(base.stability - 1.5 * config.precision);

    vec![
        higher_row("Yaw Rate", yaw_rate, format!("{}°/s", whole(yaw_rate)), 180.0, 90.0),
        lower_row("Response Time", response.round(), format!("{}ms", whole(response)), 30.0, 50.0),
        lower_row("Heading Accuracy", heading, format!("±{}°", tenths(heading)), 2.0, 3.5),
        higher_row("Stability Score", stability, format!("{}%", whole(stability)), 80.0, 60.0),
    ]
}

/// Wind compensation score; never increases as wind speed rises
pub fn wind_compensation(base: &BaseMetrics, config: &TestConfig) -> f64 {
    let overload = (config.wind_speed - base.max_handled_wind_kmh).max(0.0);
    percent(base.stability - 0.5 * config.wind_speed - overload - config.altitude / 100.0)
}

fn wind(summary: &CapabilitySummary, base: &BaseMetrics, config: &TestConfig) -> Vec<TestResult> {
    let compensation = wind_compensation(base, config);
    let handled = base.max_handled_wind_kmh;
    let impact = 0.8 * config.wind_speed + config.altitude / 50.0;

    vec![
        higher_row("Wind Compensation", compensation, format!("{}%", whole(compensation)), 80.0, 60.0),
        position_hold(summary, config),
        TestResult::new(
            "Max Wind Handled",
            format!("{} km/h", whole(handled)),
            Trend::higher_is_better(handled, config.wind_speed),
            ResultStatus::at_least(handled, config.wind_speed, 0.75 * config.wind_speed),
        ),
        lower_row("Battery Impact", impact.round(), format!("+{}%", whole(impact)), 15.0, 30.0),
    ]
}

fn speed(base: &BaseMetrics, config: &TestConfig) -> Vec<TestResult> {
    let target = config.precision * 10.0;
    let achieved = (base.max_speed_kmh - 0.5 * config.wind_speed).max(0.0);
    let headwind = config.wind_speed;
    let motor_temp = 40.0 + 0.3 * achieved + 0.2 * headwind;

    let headwind_status = if headwind < 20.0 {
        ResultStatus::Pass
    } else if headwind < 40.0 {
        ResultStatus::Warning
    } else {
        ResultStatus::Fail
    };
    let headwind_trend = if headwind > 0.0 { Trend::Down } else { Trend::Neutral };

    vec![
        TestResult::new(
            "Achieved Speed",
            format!("{} km/h", whole(achieved)),
            Trend::higher_is_better(achieved, target),
            ResultStatus::at_least(achieved, target, 0.8 * target),
        ),
        TestResult::new(
            "Target Speed",
            format!("{} km/h", whole(target)),
            Trend::Neutral,
            ResultStatus::Pass,
        ),
        TestResult::new(
            "Headwind",
            format!("{} km/h", whole(headwind)),
            headwind_trend,
            headwind_status,
        ),
        lower_row("Motor Temp", motor_temp.round(), format!("{}°C", whole(motor_temp)), 70.0, 85.0),
    ]
}

fn thermal(summary: &CapabilitySummary, config: &TestConfig) -> Vec<TestResult> {
    let twr = summary.thrust_to_weight;
    let motor_temp = config.temperature + 20.0 + 4.0 * twr + 0.05 * config.humidity;
    let esc_temp = config.temperature + 15.0 + 3.0 * twr;
    let battery_temp = config.temperature + 10.0 + summary.battery_capacity_mah as f64 / 500.0;
    let cooling = percent(100.0 - 1.5 * (config.temperature - 20.0).max(0.0) - 0.2 * config.humidity);

    let rounded_battery = battery_temp.round();
    let battery_status = if (15.0..=45.0).contains(&rounded_battery) {
        ResultStatus::Pass
    } else if (0.0..=55.0).contains(&rounded_battery) {
        ResultStatus::Warning
    } else {
        ResultStatus::Fail
    };
    let battery_trend = if battery_status == ResultStatus::Pass {
        Trend::Neutral
    } else {
        Trend::Down
    };

    vec![
        lower_row("Motor Temp", motor_temp.round(), format!("{}°C", whole(motor_temp)), 70.0, 85.0),
        lower_row("ESC Temp", esc_temp.round(), format!("{}°C", whole(esc_temp)), 65.0, 80.0),
        TestResult::new(
            "Battery Temp",
            format!("{}°C", whole(battery_temp)),
            battery_trend,
            battery_status,
        ),
        higher_row("Cooling Efficiency", cooling, format!("{}%", whole(cooling)), 70.0, 50.0),
    ]
}

/// Weather resilience score; never increases as wind speed rises
pub fn weather_resilience(base: &BaseMetrics, config: &TestConfig) -> f64 {
    percent(
        base.stability
            - 0.6 * config.wind_speed
            - 0.2 * config.humidity
            - temperature_excursion(config.temperature),
    )
}

fn weather(base: &BaseMetrics, config: &TestConfig) -> Vec<TestResult> {
    let resilience = weather_resilience(base, config);
    let visibility = percent(100.0 - 0.6 * config.humidity);
    let margin = base.max_handled_wind_kmh - config.wind_speed;
    let impact = 0.5 * config.wind_speed
        + 0.3 * config.humidity
        + 1.5 * temperature_excursion(config.temperature);

    let rounded_margin = margin.round();
    vec![
        higher_row("Weather Resilience", resilience, format!("{}%", whole(resilience)), 75.0, 50.0),
        higher_row("Sensor Visibility", visibility, format!("{}%", whole(visibility)), 70.0, 40.0),
        TestResult::new(
            "Wind Margin",
            format!("{:+} km/h", rounded_margin as i64),
            Trend::higher_is_better(rounded_margin, 0.0),
            ResultStatus::at_least(rounded_margin, 10.0, 0.0),
        ),
        lower_row("Battery Impact", impact.round(), format!("+{}%", whole(impact)), 20.0, 40.0),
    ]
}

fn waypoint(summary: &CapabilitySummary, base: &BaseMetrics, config: &TestConfig) -> Vec<TestResult> {
    let gps_penalty = if summary.has_gps { 0.0 } else { 25.0 };
    let navigation = percent(base.stability - 0.3 * config.wind_speed - gps_penalty);
    let base_error = if summary.has_gps { 0.5 } else { 3.0 };
    let error = base_error + config.wind_speed / 50.0 + config.altitude / 200.0;
    let tolerance = (11.0 - config.precision) * 0.5;
    let completion = (8.0 * base.flight_minutes).min(100.0);

    let gps_row = if summary.has_gps {
        TestResult::new("GPS Status", "Locked", Trend::Up, ResultStatus::Pass)
    } else {
        TestResult::new("GPS Status", "No GPS", Trend::Down, ResultStatus::Fail)
    };

    vec![
        gps_row,
        higher_row("Navigation Score", navigation, format!("{}%", whole(navigation)), 80.0, 60.0),
        lower_row(
            "Position Error",
            error,
            format!("±{}m", tenths(error)),
            tolerance,
            2.0 * tolerance,
        ),
        higher_row("Route Completion", completion, format!("{}%", whole(completion)), 95.0, 70.0),
    ]
}

fn stability(summary: &CapabilitySummary, base: &BaseMetrics) -> Vec<TestResult> {
    let twr = summary.thrust_to_weight;
    let vibration = if twr > 4.0 {
        TestResult::new("Vibration Level", "High", Trend::Down, ResultStatus::Warning)
    } else if twr >= 1.5 {
        TestResult::new("Vibration Level", "Low", Trend::Up, ResultStatus::Pass)
    } else {
        TestResult::new("Vibration Level", "Medium", Trend::Neutral, ResultStatus::Warning)
    };

    vec![
        higher_row("Stability Score", base.stability, format!("{}%", whole(base.stability)), 80.0, 60.0),
        higher_row("Power Efficiency", base.power, format!("{}%", whole(base.power)), 75.0, 60.0),
        lower_row(
            "Response Time",
            base.response_ms.round(),
            format!("{}ms", whole(base.response_ms)),
            30.0,
            50.0,
        ),
        vibration,
    ]
}
