// ── Referential validation ──
//
// Pure checks against the current tables. Callers hold the store mutex
// across the check and the write that follows it.

use crate::error::ValidationError;
use crate::model::{
    Alert, AlertLevel, AlertLevelId, ChildKind, Manager, Node, NodeId, Sensor, SensorAlert,
    Shared,
};

use super::table::Table;
use super::tables::Tables;

/// The owner must exist and be of a type that can own `kind`.
fn check_owner(
    nodes: &Table<Node>,
    node_id: NodeId,
    kind: ChildKind,
    owner_id: u32,
) -> Result<(), ValidationError> {
    let node = nodes.get(&node_id).ok_or(ValidationError::UnknownNode {
        node_id,
        kind,
        owner_id,
    })?;

    let found = node.read().node_type;
    if !found.can_own(kind) {
        return Err(ValidationError::WrongNodeType {
            node_id,
            found,
            kind,
            owner_id,
        });
    }
    Ok(())
}

fn check_alert_levels<'a>(
    alert_levels: &Table<AlertLevel>,
    levels: impl IntoIterator<Item = &'a AlertLevelId>,
    referrer: impl Fn() -> String,
) -> Result<(), ValidationError> {
    match levels
        .into_iter()
        .find(|level| !alert_levels.contains_key(*level))
    {
        Some(&level) => Err(ValidationError::UnknownAlertLevel {
            level,
            referrer: referrer(),
        }),
        None => Ok(()),
    }
}

pub(crate) fn check_sensor(tables: &Tables, sensor: &Sensor) -> Result<(), ValidationError> {
    check_owner(
        &tables.nodes,
        sensor.node_id,
        ChildKind::Sensor,
        sensor.sensor_id,
    )?;
    check_alert_levels(&tables.alert_levels, &sensor.alert_levels, || {
        format!("sensor {}", sensor.sensor_id)
    })
}

pub(crate) fn check_alert(tables: &Tables, alert: &Alert) -> Result<(), ValidationError> {
    check_owner(&tables.nodes, alert.node_id, ChildKind::Alert, alert.alert_id)?;
    check_alert_levels(&tables.alert_levels, &alert.alert_levels, || {
        format!("alert {}", alert.alert_id)
    })
}

pub(crate) fn check_manager(tables: &Tables, manager: &Manager) -> Result<(), ValidationError> {
    check_owner(
        &tables.nodes,
        manager.node_id,
        ChildKind::Manager,
        manager.manager_id,
    )
}

/// Validate a sensor alert and resolve the sensor it is tied to.
///
/// Rule-triggered events resolve to `None`.
pub(crate) fn check_sensor_alert(
    tables: &Tables,
    event: &SensorAlert,
) -> Result<Option<Shared<Sensor>>, ValidationError> {
    check_alert_levels(&tables.alert_levels, &event.alert_levels, || {
        "sensor alert".to_owned()
    })?;

    let Some(sensor_id) = event.sensor_id else {
        return Ok(None);
    };

    let handle = tables
        .sensors
        .get(&sensor_id)
        .ok_or(ValidationError::UnknownSensor { sensor_id })?;

    {
        let sensor = handle.read();
        if let Some(&level) = event
            .alert_levels
            .iter()
            .find(|level| !sensor.alert_levels.contains(*level))
        {
            return Err(ValidationError::UnhandledAlertLevel { sensor_id, level });
        }

        if sensor.data_type() != event.data_type() {
            return Err(ValidationError::DataTypeMismatch {
                sensor_id,
                expected: sensor.data_type(),
                got: event.data_type(),
            });
        }
    }

    Ok(Some(handle.clone()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{NodeType, SensorData};
    use pretty_assertions::assert_eq;

    fn tables() -> Tables {
        let mut tables = Tables::new();
        tables.alert_levels.upsert(AlertLevel::new(1, "home"));
        tables.alert_levels.upsert(AlertLevel::new(2, "away"));
        tables.nodes.upsert(Node::new(1, "pi", NodeType::Sensor));
        tables.nodes.upsert(Node::new(2, "siren", NodeType::Alert));
        tables.nodes.upsert(Node::new(3, "console", NodeType::Manager));
        tables.nodes.upsert(Node::new(4, "server", NodeType::Server));

        let mut sensor = Sensor::new(10, 1, 0);
        sensor.alert_levels.insert(1);
        sensor.data = SensorData::Int(0);
        tables.sensors.upsert(sensor);
        tables
    }

    #[test]
    fn sensor_needs_existing_owner() {
        let tables = tables();
        let err = check_sensor(&tables, &Sensor::new(11, 9, 0)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownNode {
                node_id: 9,
                kind: ChildKind::Sensor,
                owner_id: 11,
            }
        );
    }

    #[test]
    fn sensor_may_hang_off_server() {
        let tables = tables();
        assert!(check_sensor(&tables, &Sensor::new(11, 4, 0)).is_ok());
    }

    #[test]
    fn alert_on_sensor_node_is_rejected() {
        let tables = tables();
        let err = check_alert(&tables, &Alert::new(20, 1, 0)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::WrongNodeType {
                found: NodeType::Sensor,
                kind: ChildKind::Alert,
                ..
            }
        ));
    }

    #[test]
    fn manager_owner_checked() {
        let tables = tables();
        assert!(check_manager(&tables, &Manager::new(30, 3, "ui")).is_ok());
        assert!(check_manager(&tables, &Manager::new(30, 2, "ui")).is_err());
    }

    #[test]
    fn unknown_alert_level_names_referrer() {
        let tables = tables();
        let mut alert = Alert::new(20, 2, 0);
        alert.alert_levels.extend([1, 7]);
        let err = check_alert(&tables, &alert).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownAlertLevel {
                level: 7,
                referrer: "alert 20".into(),
            }
        );
    }

    #[test]
    fn rule_alert_resolves_to_no_sensor() {
        let tables = tables();
        let event = SensorAlert::from_rules(1, [2]);
        assert!(check_sensor_alert(&tables, &event).unwrap().is_none());
    }

    #[test]
    fn sensor_alert_rules() {
        let tables = tables();

        let missing = SensorAlert::for_sensor(99, 1, 1);
        assert_eq!(
            check_sensor_alert(&tables, &missing).unwrap_err(),
            ValidationError::UnknownSensor { sensor_id: 99 }
        );

        let mut unhandled = SensorAlert::for_sensor(10, 1, 1);
        unhandled.alert_levels.insert(2);
        unhandled.data = SensorData::Int(1);
        assert_eq!(
            check_sensor_alert(&tables, &unhandled).unwrap_err(),
            ValidationError::UnhandledAlertLevel {
                sensor_id: 10,
                level: 2,
            }
        );

        let mut wrong_type = SensorAlert::for_sensor(10, 1, 1);
        wrong_type.alert_levels.insert(1);
        wrong_type.data = SensorData::Float(1.5);
        assert!(matches!(
            check_sensor_alert(&tables, &wrong_type).unwrap_err(),
            ValidationError::DataTypeMismatch { sensor_id: 10, .. }
        ));

        let mut ok = SensorAlert::for_sensor(10, 1, 1);
        ok.alert_levels.insert(1);
        ok.data = SensorData::Int(5);
        let resolved = check_sensor_alert(&tables, &ok).unwrap().unwrap();
        assert_eq!(resolved.read().sensor_id, 10);
    }
}
