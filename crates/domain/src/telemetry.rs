//! Telemetry — a partial state report sent by a device.

use serde::{Deserialize, Serialize};

use crate::device::{DeviceState, Level, Switch};

/// Subset of live readings reported by a device.
///
/// Every field is optional: `None` means "not reported" and leaves the
/// stored value untouched when merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telemetry {
    #[serde(rename = "bomba", default, skip_serializing_if = "Option::is_none")]
    pub pump: Option<Switch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servo: Option<Switch>,
    #[serde(rename = "nivelComida", default, skip_serializing_if = "Option::is_none")]
    pub food_dish: Option<Level>,
    #[serde(rename = "nivelAgua", default, skip_serializing_if = "Option::is_none")]
    pub water_dish: Option<Level>,
    #[serde(
        rename = "nivelContenedorComida",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub food_container: Option<Level>,
    #[serde(
        rename = "nivelContenedorAgua",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub water_container: Option<Level>,
}

impl Telemetry {
    /// Whether the report carries no reading at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite only the reported fields of `state`.
    pub fn apply_to(&self, state: &mut DeviceState) {
        if let Some(pump) = self.pump {
            state.pump = pump;
        }
        if let Some(servo) = self.servo {
            state.servo = servo;
        }
        if let Some(level) = self.food_dish {
            state.food_dish = level;
        }
        if let Some(level) = self.water_dish {
            state.water_dish = level;
        }
        if let Some(level) = self.food_container {
            state.food_container = level;
        }
        if let Some(level) = self.water_container {
            state.water_container = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_only_touch_reported_fields() {
        let mut state = DeviceState {
            pump: Switch::On,
            ..DeviceState::default()
        };
        let before = state;

        let telemetry = Telemetry {
            servo: Some(Switch::On),
            ..Telemetry::default()
        };
        telemetry.apply_to(&mut state);

        assert_eq!(state.servo, Switch::On);
        assert_eq!(state.pump, Switch::On);
        assert_eq!(
            DeviceState {
                servo: before.servo,
                ..state
            },
            before
        );
    }

    #[test]
    fn should_map_wire_names_to_dish_and_container_levels() {
        let telemetry: Telemetry = serde_json::from_value(json!({
            "nivelComida": "VACIO",
            "nivelAgua": "MEDIO",
            "nivelContenedorComida": "LLENO",
            "nivelContenedorAgua": "VACIO"
        }))
        .unwrap();

        let mut state = DeviceState::default();
        telemetry.apply_to(&mut state);

        assert_eq!(state.food_dish, Level::Empty);
        assert_eq!(state.water_dish, Level::Medium);
        assert_eq!(state.food_container, Level::Full);
        assert_eq!(state.water_container, Level::Empty);
        assert_eq!(state.pump, Switch::Off);
    }

    #[test]
    fn should_leave_state_unchanged_when_report_is_empty() {
        let telemetry: Telemetry = serde_json::from_value(json!({})).unwrap();
        assert!(telemetry.is_empty());

        let mut state = DeviceState::default();
        telemetry.apply_to(&mut state);
        assert_eq!(state, DeviceState::default());
    }

    #[test]
    fn should_not_be_empty_when_one_field_reported() {
        let telemetry = Telemetry {
            pump: Some(Switch::Off),
            ..Telemetry::default()
        };
        assert!(!telemetry.is_empty());
    }
}
