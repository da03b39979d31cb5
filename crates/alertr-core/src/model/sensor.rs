// ── Sensor domain types ──

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::Display;

use super::alert_level::AlertLevelId;
use super::lifecycle::{InternalState, Record, impl_lifecycle};
use super::node::NodeId;

pub type SensorId = u32;

/// Declared type of the data a sensor reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SensorDataType {
    #[default]
    None,
    Int,
    Float,
}

/// Sensor data, typed by its variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum SensorData {
    #[default]
    None,
    Int(i64),
    Float(f64),
}

impl SensorData {
    pub fn data_type(&self) -> SensorDataType {
        match self {
            Self::None => SensorDataType::None,
            Self::Int(_) => SensorDataType::Int,
            Self::Float(_) => SensorDataType::Float,
        }
    }
}

/// A sensor attached to a sensor (or server) node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub sensor_id: SensorId,
    pub node_id: NodeId,
    pub remote_sensor_id: u32,
    /// Seconds to wait before a triggered state raises an alert.
    #[serde(default)]
    pub alert_delay: u32,
    #[serde(default)]
    pub alert_levels: BTreeSet<AlertLevelId>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub last_state_updated: i64,
    /// 1 = triggered, 0 = normal.
    #[serde(default)]
    pub state: i32,
    #[serde(default)]
    pub data: SensorData,

    #[serde(skip)]
    pub(crate) internal_state: InternalState,
}

impl Sensor {
    pub fn new(sensor_id: SensorId, node_id: NodeId, remote_sensor_id: u32) -> Self {
        Self {
            sensor_id,
            node_id,
            remote_sensor_id,
            alert_delay: 0,
            alert_levels: BTreeSet::new(),
            description: String::new(),
            last_state_updated: 0,
            state: 0,
            data: SensorData::None,
            internal_state: InternalState::New,
        }
    }

    pub fn data_type(&self) -> SensorDataType {
        self.data.data_type()
    }
}

impl_lifecycle!(Sensor);

impl Record for Sensor {
    type Key = SensorId;

    fn key(&self) -> SensorId {
        self.sensor_id
    }

    fn merge(&mut self, incoming: Self) {
        let Self {
            sensor_id,
            node_id,
            remote_sensor_id,
            alert_delay,
            alert_levels,
            description,
            last_state_updated,
            state,
            data,
            internal_state: _,
        } = incoming;
        self.sensor_id = sensor_id;
        self.node_id = node_id;
        self.remote_sensor_id = remote_sensor_id;
        self.alert_delay = alert_delay;
        self.alert_levels = alert_levels;
        self.description = description;
        self.last_state_updated = last_state_updated;
        self.state = state;
        self.data = data;
    }
}
