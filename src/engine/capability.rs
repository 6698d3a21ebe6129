//! Capability aggregation - reduce placed components to a summary of facts

use serde::Serialize;

use crate::engine::parse;
use crate::entities::component::{ComponentCategory, PlacedComponent};

/// Aggregate facts about a build
///
/// Derived on demand, never stored. Identical component lists always give
/// identical summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CapabilitySummary {
    /// Sum of component weights in grams
    pub total_weight: u32,
    pub motor_count: u32,
    pub propeller_count: u32,
    /// Sum of motor thrust in grams-force
    pub total_thrust: u32,
    /// total_thrust / total_weight, 0 for a weightless build
    pub thrust_to_weight: f64,
    pub battery_capacity_mah: u32,
    pub battery_voltage: f64,
    pub has_frame: bool,
    pub has_motors: bool,
    pub has_propellers: bool,
    pub has_battery: bool,
    pub has_flight_controller: bool,
    pub has_gps: bool,
    pub is_flight_ready: bool,
}

fn is_battery(c: &PlacedComponent) -> bool {
    c.category() == ComponentCategory::Power && c.id().contains("battery")
}

fn is_flight_controller(c: &PlacedComponent) -> bool {
    c.category() == ComponentCategory::Electronics && c.id().contains("fc")
}

/// Reduce a component list to its capability summary
pub fn aggregate(components: &[PlacedComponent]) -> CapabilitySummary {
    let mut total_weight: u32 = 0;
    let mut total_thrust: u32 = 0;
    let mut motor_count: u32 = 0;
    let mut propeller_count: u32 = 0;
    let mut has_frame = false;
    let mut has_flight_controller = false;
    let mut has_gps = false;

    for placed in components {
        total_weight = total_weight.saturating_add(placed.component.weight_grams());

        match placed.category() {
            ComponentCategory::Motors => {
                motor_count += 1;
                total_thrust = total_thrust.saturating_add(placed.component.thrust_grams());
            }
            ComponentCategory::Propellers => propeller_count += 1,
            ComponentCategory::Frames => has_frame = true,
            _ => {}
        }

        has_flight_controller |= is_flight_controller(placed);
        has_gps |= placed.id() == "gps";
    }

    let battery = components.iter().find(|c| is_battery(c));
    let battery_capacity_mah = battery
        .and_then(|b| parse::integer_before_unit(b.name(), "mAh"))
        .unwrap_or(0);
    let battery_voltage = battery
        .and_then(|b| b.component.specs.power.as_deref())
        .and_then(|p| parse::decimal_before_unit(p, "V"))
        .unwrap_or(0.0);

    let thrust_to_weight = if total_weight == 0 {
        0.0
    } else {
        total_thrust as f64 / total_weight as f64
    };

    let has_motors = motor_count > 0;
    let has_propellers = propeller_count > 0;
    let has_battery = battery.is_some();

    CapabilitySummary {
        total_weight,
        motor_count,
        propeller_count,
        total_thrust,
        thrust_to_weight,
        battery_capacity_mah,
        battery_voltage,
        has_frame,
        has_motors,
        has_propellers,
        has_battery,
        has_flight_controller,
        has_gps,
        is_flight_ready: has_frame
            && has_motors
            && has_battery
            && has_flight_controller
            && has_propellers,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Catalog-backed component helpers shared by engine tests

    use crate::entities::catalog::Catalog;
    use crate::entities::component::{PlacedComponent, Position};

    pub fn placed(ids: &[&str]) -> Vec<PlacedComponent> {
        let catalog = Catalog::builtin().unwrap();
        ids.iter()
            .map(|id| PlacedComponent::place(catalog.require(id).unwrap().clone(), Position::default()))
            .collect()
    }

    /// Frame, one 2212 motor, one 5x4 prop, 4S battery and an F4 controller
    pub fn scenario_b() -> Vec<PlacedComponent> {
        placed(&["frame-x", "motor-2212", "prop-5x4", "battery-4s", "fc-f4"])
    }
}
