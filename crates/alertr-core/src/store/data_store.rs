// ── Central data store ──
//
// One mutex guards every table. Each public method takes it exactly once,
// so validation and the write it guards are atomic with respect to every
// other caller, and cross-table cascades are never half-visible.

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use super::tables::Tables;
use super::validate;
use crate::error::CoreError;
use crate::model::{
    Alert, AlertId, AlertLevel, AlertLevelId, ChildKind, Manager, ManagerId, Node, NodeId,
    Sensor, SensorAlert, SensorData, SensorId, Shared, SystemOption,
};

/// Row counts of every table, taken under one lock acquisition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub options: usize,
    pub nodes: usize,
    pub sensors: usize,
    pub alerts: usize,
    pub managers: usize,
    pub alert_levels: usize,
    pub sensor_alerts: usize,
}

/// Authoritative in-memory state of the alert network.
///
/// Getters return [`Shared`] handles to live objects, not copies. A later
/// update is published behind the same handle and a delete flips it to
/// [`InternalState::Deleted`](crate::model::InternalState::Deleted).
/// Reading a handle takes no lock, so callers may keep the values they
/// read for as long as they like without holding up the store.
pub struct DataStore {
    tables: Mutex<Tables>,
    version: watch::Sender<u64>,
}

impl DataStore {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        Self {
            tables: Mutex::new(Tables::new()),
            version,
        }
    }

    // ── Change notification ──────────────────────────────────────────

    /// Version counter, bumped by every call that changed the store.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    /// Subscribe to version bumps.
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    fn bump_version(&self) {
        // `send_modify` updates unconditionally, even with zero receivers.
        self.version.send_modify(|v| *v += 1);
    }

    pub fn counts(&self) -> StoreCounts {
        let tables = self.tables.lock();
        StoreCounts {
            options: tables.options.len(),
            nodes: tables.nodes.len(),
            sensors: tables.sensors.len(),
            alerts: tables.alerts.len(),
            managers: tables.managers.len(),
            alert_levels: tables.alert_levels.len(),
            sensor_alerts: tables.sensor_alerts.len(),
        }
    }

    // ── Options ──────────────────────────────────────────────────────

    pub fn update_option(&self, option: SystemOption) -> Shared<SystemOption> {
        let (handle, _) = self.tables.lock().options.upsert(option);
        self.bump_version();
        handle
    }

    pub fn delete_option_by_type(&self, option_type: &str) {
        let removed = self.tables.lock().options.remove(option_type).is_some();
        if removed {
            self.bump_version();
        }
    }

    pub fn get_option_by_type(&self, option_type: &str) -> Option<Shared<SystemOption>> {
        self.tables.lock().options.get(option_type).cloned()
    }

    pub fn get_options_list(&self) -> Vec<Shared<SystemOption>> {
        self.tables.lock().options.handles()
    }

    // ── Nodes ────────────────────────────────────────────────────────

    /// Insert or merge a node. A changed node type first deletes every
    /// child owned under the old type.
    pub fn update_node(&self, node: Node) -> Shared<Node> {
        let handle = {
            let mut tables = self.tables.lock();
            let old_type = tables
                .nodes
                .get(&node.node_id)
                .map(|stored| stored.read().node_type);

            if let Some(old_type) = old_type {
                if old_type != node.node_type {
                    debug!(
                        node_id = node.node_id,
                        from = %old_type,
                        to = %node.node_type,
                        "node type changed"
                    );
                    tables.delete_children_of(node.node_id, old_type);
                }
            }
            tables.nodes.upsert(node).0
        };
        self.bump_version();
        handle
    }

    pub fn delete_node_by_id(&self, node_id: NodeId) {
        let removed = self.tables.lock().delete_node(node_id);
        if removed {
            self.bump_version();
        }
    }

    pub fn get_node_by_id(&self, node_id: NodeId) -> Option<Shared<Node>> {
        self.tables.lock().nodes.get(&node_id).cloned()
    }

    pub fn get_nodes_list(&self) -> Vec<Shared<Node>> {
        self.tables.lock().nodes.handles()
    }

    // ── Sensors ──────────────────────────────────────────────────────

    pub fn update_sensor(&self, sensor: Sensor) -> Result<Shared<Sensor>, CoreError> {
        let handle = {
            let mut tables = self.tables.lock();
            validate::check_sensor(&tables, &sensor)?;
            tables.sensors.upsert(sensor).0
        };
        self.bump_version();
        Ok(handle)
    }

    /// Delete a sensor and every sensor alert it raised.
    pub fn delete_sensor_by_id(&self, sensor_id: SensorId) {
        let removed = self.tables.lock().delete_sensor(sensor_id);
        if removed {
            self.bump_version();
        }
    }

    pub fn get_sensor_by_id(&self, sensor_id: SensorId) -> Option<Shared<Sensor>> {
        self.tables.lock().sensors.get(&sensor_id).cloned()
    }

    pub fn get_sensors_list(&self, order_by_description: bool) -> Vec<Shared<Sensor>> {
        let tables = self.tables.lock();
        let mut sensors = tables.sensors.handles();
        if order_by_description {
            sort_by_description(&mut sensors, |sensor| sensor.description.as_str());
        }
        sensors
    }

    /// Sensors of a node. Empty when the node is missing or cannot own
    /// sensors.
    pub fn get_sensors_by_node_id(&self, node_id: NodeId) -> Vec<Shared<Sensor>> {
        let tables = self.tables.lock();
        if !owns(&tables, node_id, ChildKind::Sensor) {
            return Vec::new();
        }
        tables
            .sensors
            .handles_where(|sensor| sensor.node_id == node_id)
    }

    /// Record a live state transition of an existing sensor.
    ///
    /// The data type travels as the `SensorData` variant; it must equal the
    /// variant the sensor currently holds, otherwise nothing changes and
    /// `CoreError::TypeMismatch` is returned.
    pub fn sensor_state_change(
        &self,
        sensor_id: SensorId,
        state: i32,
        data: SensorData,
    ) -> Result<(), CoreError> {
        {
            let tables = self.tables.lock();
            let handle = tables
                .sensors
                .get(&sensor_id)
                .ok_or_else(|| CoreError::NotFound {
                    entity_type: "sensor",
                    identifier: sensor_id.to_string(),
                })?;

            let expected = handle.read().data_type();
            if expected != data.data_type() {
                return Err(CoreError::TypeMismatch {
                    sensor_id,
                    expected,
                    got: data.data_type(),
                });
            }
            handle.update(|sensor| {
                sensor.state = state;
                sensor.data = data;
            });
        }
        self.bump_version();
        Ok(())
    }

    // ── Alerts ───────────────────────────────────────────────────────

    pub fn update_alert(&self, alert: Alert) -> Result<Shared<Alert>, CoreError> {
        let handle = {
            let mut tables = self.tables.lock();
            validate::check_alert(&tables, &alert)?;
            tables.alerts.upsert(alert).0
        };
        self.bump_version();
        Ok(handle)
    }

    pub fn delete_alert_by_id(&self, alert_id: AlertId) {
        let removed = self.tables.lock().delete_alert(alert_id);
        if removed {
            self.bump_version();
        }
    }

    pub fn get_alert_by_id(&self, alert_id: AlertId) -> Option<Shared<Alert>> {
        self.tables.lock().alerts.get(&alert_id).cloned()
    }

    pub fn get_alerts_list(&self, order_by_description: bool) -> Vec<Shared<Alert>> {
        let tables = self.tables.lock();
        let mut alerts = tables.alerts.handles();
        if order_by_description {
            sort_by_description(&mut alerts, |alert| alert.description.as_str());
        }
        alerts
    }

    pub fn get_alerts_by_node_id(&self, node_id: NodeId) -> Vec<Shared<Alert>> {
        let tables = self.tables.lock();
        if !owns(&tables, node_id, ChildKind::Alert) {
            return Vec::new();
        }
        tables.alerts.handles_where(|alert| alert.node_id == node_id)
    }

    // ── Managers ─────────────────────────────────────────────────────

    pub fn update_manager(&self, manager: Manager) -> Result<Shared<Manager>, CoreError> {
        let handle = {
            let mut tables = self.tables.lock();
            validate::check_manager(&tables, &manager)?;
            tables.managers.upsert(manager).0
        };
        self.bump_version();
        Ok(handle)
    }

    pub fn delete_manager_by_id(&self, manager_id: ManagerId) {
        let removed = self.tables.lock().delete_manager(manager_id);
        if removed {
            self.bump_version();
        }
    }

    pub fn get_manager_by_id(&self, manager_id: ManagerId) -> Option<Shared<Manager>> {
        self.tables.lock().managers.get(&manager_id).cloned()
    }

    pub fn get_managers_list(&self, order_by_description: bool) -> Vec<Shared<Manager>> {
        let tables = self.tables.lock();
        let mut managers = tables.managers.handles();
        if order_by_description {
            sort_by_description(&mut managers, |manager| manager.description.as_str());
        }
        managers
    }

    pub fn get_managers_by_node_id(&self, node_id: NodeId) -> Vec<Shared<Manager>> {
        let tables = self.tables.lock();
        if !owns(&tables, node_id, ChildKind::Manager) {
            return Vec::new();
        }
        tables
            .managers
            .handles_where(|manager| manager.node_id == node_id)
    }

    // ── Alert levels ─────────────────────────────────────────────────

    pub fn update_alert_level(&self, alert_level: AlertLevel) -> Shared<AlertLevel> {
        let (handle, _) = self.tables.lock().alert_levels.upsert(alert_level);
        self.bump_version();
        handle
    }

    /// Delete a level after removing it from every sensor and alert.
    pub fn delete_alert_level_by_level(&self, level: AlertLevelId) {
        let removed = self.tables.lock().delete_alert_level(level);
        if removed {
            self.bump_version();
        }
    }

    pub fn get_alert_level_by_level(&self, level: AlertLevelId) -> Option<Shared<AlertLevel>> {
        self.tables.lock().alert_levels.get(&level).cloned()
    }

    pub fn get_alert_levels_list(&self, order_by_level: bool) -> Vec<Shared<AlertLevel>> {
        let tables = self.tables.lock();
        let mut levels = tables.alert_levels.handles();
        if order_by_level {
            levels.sort_by_cached_key(|level| level.read().level);
        }
        levels
    }

    // ── Sensor alerts ────────────────────────────────────────────────

    /// Validate and store a sensor alert, applying its side effects to the
    /// sensor it is tied to: `state` when `change_state` is set and `data`
    /// when `has_latest_data` is set.
    pub fn add_sensor_alert(&self, event: SensorAlert) -> Result<Shared<SensorAlert>, CoreError> {
        let handle = {
            let mut tables = self.tables.lock();
            if let Some(sensor) = validate::check_sensor_alert(&tables, &event)? {
                if event.change_state || event.has_latest_data {
                    sensor.update(|sensor| {
                        if event.change_state {
                            sensor.state = event.state;
                        }
                        if event.has_latest_data {
                            sensor.data = event.data;
                        }
                    });
                }
            }
            tables.sensor_alerts.insert(event)
        };
        self.bump_version();
        Ok(handle)
    }

    /// Drop every sensor alert received strictly before `timestamp`.
    pub fn delete_sensor_alerts_received_before(&self, timestamp: i64) {
        let removed = self
            .tables
            .lock()
            .sensor_alerts
            .remove_received_before(timestamp);
        if removed > 0 {
            debug!(removed, timestamp, "pruned sensor alerts");
            self.bump_version();
        }
    }

    /// All sensor alerts, ascending by `time_received`.
    pub fn get_sensor_alerts_list(&self) -> Vec<Shared<SensorAlert>> {
        self.tables.lock().sensor_alerts.handles()
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

// ── Private helpers ─────────────────────────────────────────────────

fn owns(tables: &Tables, node_id: NodeId, kind: ChildKind) -> bool {
    tables
        .nodes
        .get(&node_id)
        .is_some_and(|node| node.read().node_type.can_own(kind))
}

/// Case-insensitive sort by description. Stable, so equal descriptions
/// keep insertion order.
fn sort_by_description<T>(items: &mut [Shared<T>], description: impl Fn(&T) -> &str) {
    items.sort_by_cached_key(|item| description(&*item.read()).to_lowercase());
}
