use chrono::DateTime;
use tabled::Tabled;
use tracing::debug;

use alertr_core::{
    Alert, AlertLevel, DataStore, Manager, Node, Sensor, SensorAlert, SensorData, Shared,
    SystemOption,
};

use crate::cli::{Entity, GlobalOpts, OutputFormat, ShowArgs};
use crate::error::CliError;
use crate::output::{self, join_ids, render_list};

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct OptionRow {
    #[tabled(rename = "Type")]
    option_type: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Type")]
    node_type: String,
    #[tabled(rename = "Instance")]
    instance: String,
    #[tabled(rename = "Connected")]
    connected: bool,
    #[tabled(rename = "Version")]
    version: String,
}

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Node")]
    node_id: u32,
    #[tabled(rename = "Remote ID")]
    remote_id: u32,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "State")]
    state: i32,
    #[tabled(rename = "Data")]
    data: String,
    #[tabled(rename = "Levels")]
    levels: String,
}

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Node")]
    node_id: u32,
    #[tabled(rename = "Remote ID")]
    remote_id: u32,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Levels")]
    levels: String,
}

#[derive(Tabled)]
struct ManagerRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Node")]
    node_id: u32,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct AlertLevelRow {
    #[tabled(rename = "Level")]
    level: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Trigger Always")]
    trigger_always: bool,
    #[tabled(rename = "Rules")]
    rules_activated: bool,
}

#[derive(Tabled)]
struct SensorAlertRow {
    #[tabled(rename = "Received")]
    received: String,
    #[tabled(rename = "Sensor")]
    sensor: String,
    #[tabled(rename = "State")]
    state: i32,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Levels")]
    levels: String,
    #[tabled(rename = "Data")]
    data: String,
}

fn format_data(data: &SensorData) -> String {
    match data {
        SensorData::None => "-".into(),
        SensorData::Int(value) => value.to_string(),
        SensorData::Float(value) => value.to_string(),
    }
}

fn format_time(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0).map_or_else(
        || timestamp.to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

// ── Handler ──────────────────────────────────────────────────────────

pub fn handle(args: &ShowArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if args.node.is_some() && !args.entity.supports_node_filter() {
        return Err(CliError::Validation {
            field: "--node".into(),
            reason: "only sensors, alerts and managers belong to a node".into(),
        });
    }
    if args.sort && !args.entity.supports_sort() {
        return Err(CliError::Validation {
            field: "--sort".into(),
            reason: "only sensors, alerts, managers and alert-levels can be sorted".into(),
        });
    }

    let loaded = super::load(&args.topology, global)?;
    let store = &loaded.store;

    if let Some(now) = args.now {
        let now = DateTime::from_timestamp(now, 0).ok_or_else(|| CliError::Validation {
            field: "--now".into(),
            reason: format!("{now} is not a representable unix time"),
        })?;
        let cutoff = loaded.config.store.sensor_alert_cutoff(now);
        debug!(cutoff, "pruning expired sensor alerts");
        store.delete_sensor_alerts_received_before(cutoff);
    }

    let out = render_entity(store, args, global.output)?;
    output::print_output(&out, global.quiet)
}

fn render_entity(
    store: &DataStore,
    args: &ShowArgs,
    format: OutputFormat,
) -> Result<String, CliError> {
    match args.entity {
        Entity::Options => render_list(
            format,
            &store.get_options_list(),
            |h: &Shared<SystemOption>| {
                let o = h.read();
                OptionRow {
                    option_type: o.option_type.clone(),
                    value: o.value.clone(),
                }
            },
            |h| h.read().option_type.clone(),
        ),
        Entity::Nodes => render_list(
            format,
            &store.get_nodes_list(),
            |h: &Shared<Node>| {
                let n = h.read();
                NodeRow {
                    id: n.node_id,
                    hostname: n.hostname.clone(),
                    node_type: n.node_type.to_string(),
                    instance: n.instance.clone(),
                    connected: n.connected,
                    version: format!("{}-{}", n.version, n.revision),
                }
            },
            |h| h.read().node_id.to_string(),
        ),
        Entity::Sensors => {
            let sensors = match args.node {
                Some(node_id) => store.get_sensors_by_node_id(node_id),
                None => store.get_sensors_list(args.sort),
            };
            render_list(
                format,
                &sensors,
                |h: &Shared<Sensor>| {
                    let s = h.read();
                    SensorRow {
                        id: s.sensor_id,
                        node_id: s.node_id,
                        remote_id: s.remote_sensor_id,
                        description: s.description.clone(),
                        state: s.state,
                        data: format_data(&s.data),
                        levels: join_ids(&s.alert_levels),
                    }
                },
                |h| h.read().sensor_id.to_string(),
            )
        }
        Entity::Alerts => {
            let alerts = match args.node {
                Some(node_id) => store.get_alerts_by_node_id(node_id),
                None => store.get_alerts_list(args.sort),
            };
            render_list(
                format,
                &alerts,
                |h: &Shared<Alert>| {
                    let a = h.read();
                    AlertRow {
                        id: a.alert_id,
                        node_id: a.node_id,
                        remote_id: a.remote_alert_id,
                        description: a.description.clone(),
                        levels: join_ids(&a.alert_levels),
                    }
                },
                |h| h.read().alert_id.to_string(),
            )
        }
        Entity::Managers => {
            let managers = match args.node {
                Some(node_id) => store.get_managers_by_node_id(node_id),
                None => store.get_managers_list(args.sort),
            };
            render_list(
                format,
                &managers,
                |h: &Shared<Manager>| {
                    let m = h.read();
                    ManagerRow {
                        id: m.manager_id,
                        node_id: m.node_id,
                        description: m.description.clone(),
                    }
                },
                |h| h.read().manager_id.to_string(),
            )
        }
        Entity::AlertLevels => render_list(
            format,
            &store.get_alert_levels_list(args.sort),
            |h: &Shared<AlertLevel>| {
                let l = h.read();
                AlertLevelRow {
                    level: l.level,
                    name: l.name.clone(),
                    trigger_always: l.trigger_always,
                    rules_activated: l.rules_activated,
                }
            },
            |h| h.read().level.to_string(),
        ),
        Entity::SensorAlerts => render_list(
            format,
            &store.get_sensor_alerts_list(),
            |h: &Shared<SensorAlert>| {
                let e = h.read();
                SensorAlertRow {
                    received: format_time(e.time_received),
                    sensor: e
                        .sensor_id
                        .map_or_else(|| "rules".to_owned(), |id| id.to_string()),
                    state: e.state,
                    description: e.description.clone(),
                    levels: join_ids(&e.alert_levels),
                    data: format_data(&e.data),
                }
            },
            |h| h.read().time_received.to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn data_cells() {
        assert_eq!(format_data(&SensorData::None), "-");
        assert_eq!(format_data(&SensorData::Int(-3)), "-3");
        assert_eq!(format_data(&SensorData::Float(1.5)), "1.5");
    }

    #[test]
    fn time_cells() {
        assert_eq!(format_time(0), "1970-01-01 00:00:00");
        assert_eq!(format_time(i64::MAX), i64::MAX.to_string());
    }
}
