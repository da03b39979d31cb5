//! Topology snapshots: a TOML document of records applied to a store.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use alertr_core::{
    Alert, AlertLevel, CoreError, DataStore, Manager, Node, Sensor, SensorAlert, SystemOption,
};

use crate::error::CliError;

/// Every record kind of the store, in the order they are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Topology {
    pub options: Vec<SystemOption>,
    pub alert_levels: Vec<AlertLevel>,
    pub nodes: Vec<Node>,
    pub sensors: Vec<Sensor>,
    pub alerts: Vec<Alert>,
    pub managers: Vec<Manager>,
    pub sensor_alerts: Vec<SensorAlert>,
}

/// A record the store refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub entity: &'static str,
    pub key: String,
    pub reason: String,
}

impl Rejection {
    fn new(entity: &'static str, key: impl ToString, err: &CoreError) -> Self {
        Self {
            entity,
            key: key.to_string(),
            reason: err.to_string(),
        }
    }
}

impl Topology {
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::TopologyRead {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| CliError::TopologyParse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply every record to `store`. A rejected record is reported and
    /// the rest are still applied.
    pub fn apply(self, store: &DataStore) -> Vec<Rejection> {
        let mut rejected = Vec::new();

        for option in self.options {
            store.update_option(option);
        }
        for level in self.alert_levels {
            store.update_alert_level(level);
        }
        for node in self.nodes {
            store.update_node(node);
        }
        for sensor in self.sensors {
            let key = sensor.sensor_id;
            if let Err(err) = store.update_sensor(sensor) {
                rejected.push(Rejection::new("sensor", key, &err));
            }
        }
        for alert in self.alerts {
            let key = alert.alert_id;
            if let Err(err) = store.update_alert(alert) {
                rejected.push(Rejection::new("alert", key, &err));
            }
        }
        for manager in self.managers {
            let key = manager.manager_id;
            if let Err(err) = store.update_manager(manager) {
                rejected.push(Rejection::new("manager", key, &err));
            }
        }
        for (index, event) in self.sensor_alerts.into_iter().enumerate() {
            if let Err(err) = store.add_sensor_alert(event) {
                rejected.push(Rejection::new("sensor alert", format!("#{index}"), &err));
            }
        }

        for rejection in &rejected {
            warn!(
                entity = rejection.entity,
                key = %rejection.key,
                reason = %rejection.reason,
                "record rejected"
            );
        }
        debug!(rejected = rejected.len(), "topology applied");
        rejected
    }
}
