// ── Store tables and cascading delete ──
//
// Everything here runs with the store mutex held. The public `DataStore`
// methods lock once and call into these helpers, so a cascade is applied
// atomically with respect to every other caller.

use tracing::debug;

use super::sensor_alerts::SensorAlertQueue;
use super::table::Table;
use crate::model::{
    Alert, AlertId, AlertLevel, AlertLevelId, ChildKind, Manager, ManagerId, Node, NodeId,
    NodeType, Sensor, SensorId, SystemOption,
};

pub(crate) struct Tables {
    pub(crate) options: Table<SystemOption>,
    pub(crate) nodes: Table<Node>,
    pub(crate) sensors: Table<Sensor>,
    pub(crate) alerts: Table<Alert>,
    pub(crate) managers: Table<Manager>,
    pub(crate) alert_levels: Table<AlertLevel>,
    pub(crate) sensor_alerts: SensorAlertQueue,
}

impl Tables {
    pub(crate) fn new() -> Self {
        Self {
            options: Table::new(),
            nodes: Table::new(),
            sensors: Table::new(),
            alerts: Table::new(),
            managers: Table::new(),
            alert_levels: Table::new(),
            sensor_alerts: SensorAlertQueue::new(),
        }
    }

    /// Delete a sensor together with every sensor alert it raised.
    pub(crate) fn delete_sensor(&mut self, sensor_id: SensorId) -> bool {
        if !self.sensors.contains_key(&sensor_id) {
            return false;
        }
        let events = self.sensor_alerts.remove_for_sensor(sensor_id);
        self.sensors.remove(&sensor_id);
        debug!(sensor_id, events, "sensor deleted");
        true
    }

    pub(crate) fn delete_alert(&mut self, alert_id: AlertId) -> bool {
        self.alerts.remove(&alert_id).is_some()
    }

    pub(crate) fn delete_manager(&mut self, manager_id: ManagerId) -> bool {
        self.managers.remove(&manager_id).is_some()
    }

    /// Delete a node and everything it owns.
    pub(crate) fn delete_node(&mut self, node_id: NodeId) -> bool {
        let Some(node_type) = self.nodes.get(&node_id).map(|node| node.read().node_type) else {
            return false;
        };
        self.delete_children_of(node_id, node_type);
        self.nodes.remove(&node_id);
        true
    }

    /// Delete every child record owned by `node_id` under `node_type`.
    ///
    /// Called with the node's current (old) type, before a type change
    /// is merged or the node is removed.
    pub(crate) fn delete_children_of(&mut self, node_id: NodeId, node_type: NodeType) -> usize {
        let kind = node_type.child_kind();
        let deleted = match kind {
            ChildKind::Sensor => {
                let ids = self.sensors.keys_where(|sensor| sensor.node_id == node_id);
                ids.into_iter().filter(|id| self.delete_sensor(*id)).count()
            }
            ChildKind::Alert => {
                let ids = self.alerts.keys_where(|alert| alert.node_id == node_id);
                ids.into_iter().filter(|id| self.delete_alert(*id)).count()
            }
            ChildKind::Manager => {
                let ids = self.managers.keys_where(|manager| manager.node_id == node_id);
                ids.into_iter().filter(|id| self.delete_manager(*id)).count()
            }
        };
        if deleted > 0 {
            debug!(node_id, %kind, deleted, "cascaded delete of node children");
        }
        deleted
    }

    /// Delete an alert level after stripping it from every sensor and
    /// alert. The referrers themselves survive.
    pub(crate) fn delete_alert_level(&mut self, level: AlertLevelId) -> bool {
        if !self.alert_levels.contains_key(&level) {
            return false;
        }
        for sensor in self.sensors.iter() {
            if sensor.read().alert_levels.contains(&level) {
                sensor.update(|sensor| sensor.alert_levels.remove(&level));
            }
        }
        for alert in self.alerts.iter() {
            if alert.read().alert_levels.contains(&level) {
                alert.update(|alert| alert.alert_levels.remove(&level));
            }
        }
        self.alert_levels.remove(&level);
        debug!(level, "alert level deleted");
        true
    }
}
