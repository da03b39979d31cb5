// ── Sensor alert event type ──

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::alert_level::AlertLevelId;
use super::lifecycle::{InternalState, impl_lifecycle};
use super::sensor::{SensorData, SensorDataType, SensorId};

/// A timestamped event: either a concrete sensor transition or a
/// notification raised by rule evaluation over whole alert levels.
///
/// Sensor alerts have no key; the store keeps them in arrival order
/// sorted by `time_received`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorAlert {
    #[serde(default)]
    pub rules_activated: bool,
    /// `None` for rule-triggered events (the wire format's `-1`).
    #[serde(default)]
    pub sensor_id: Option<SensorId>,
    /// 1 = triggered, 0 = normal. Always 1 for rule-triggered events.
    pub state: i32,
    #[serde(default)]
    pub description: String,
    /// Unix seconds.
    pub time_received: i64,
    #[serde(default)]
    pub alert_levels: BTreeSet<AlertLevelId>,
    #[serde(default)]
    pub optional_data: Option<serde_json::Value>,
    /// Whether the event moves the sensor to `state`.
    #[serde(default)]
    pub change_state: bool,
    /// Whether `data` is the sensor's latest reading.
    #[serde(default)]
    pub has_latest_data: bool,
    #[serde(default)]
    pub data: SensorData,

    #[serde(skip)]
    pub(crate) internal_state: InternalState,
}

impl SensorAlert {
    /// Event raised by a concrete sensor.
    pub fn for_sensor(sensor_id: SensorId, state: i32, time_received: i64) -> Self {
        Self {
            rules_activated: false,
            sensor_id: Some(sensor_id),
            state,
            description: String::new(),
            time_received,
            alert_levels: BTreeSet::new(),
            optional_data: None,
            change_state: false,
            has_latest_data: false,
            data: SensorData::None,
            internal_state: InternalState::New,
        }
    }

    /// Event raised by rule evaluation, not tied to any sensor.
    pub fn from_rules(time_received: i64, alert_levels: impl IntoIterator<Item = AlertLevelId>) -> Self {
        Self {
            rules_activated: true,
            sensor_id: None,
            state: 1,
            description: String::new(),
            time_received,
            alert_levels: alert_levels.into_iter().collect(),
            optional_data: None,
            change_state: false,
            has_latest_data: false,
            data: SensorData::None,
            internal_state: InternalState::New,
        }
    }

    pub fn data_type(&self) -> SensorDataType {
        self.data.data_type()
    }

    pub fn has_optional_data(&self) -> bool {
        self.optional_data.is_some()
    }
}

impl_lifecycle!(SensorAlert);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_events_carry_no_sensor() {
        let event = SensorAlert::from_rules(100, [1, 3]);
        assert!(event.rules_activated);
        assert_eq!(event.sensor_id, None);
        assert_eq!(event.state, 1);
        assert!(!event.has_optional_data());
        assert_eq!(event.data_type(), SensorDataType::None);
    }
}
