//! Concurrency tests for the data store.
//!
//! Several threads race sensor updates against owner type flips and
//! deletes. Validation and write share one critical section, so no sensor
//! may ever outlive its owner or sit on a node that cannot own it.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use alertr_core::{AlertLevel, DataStore, Node, NodeType, Sensor, SensorAlert, SensorData};

const OWNER: u32 = 7;
const ROUNDS: u32 = 2_000;

fn assert_no_orphans(store: &DataStore) {
    for handle in store.get_sensors_list(false) {
        let node_id = handle.read().node_id;
        let node = store
            .get_node_by_id(node_id)
            .expect("sensor survived its owner");
        assert!(
            matches!(node.read().node_type, NodeType::Sensor | NodeType::Server),
            "sensor survived its owner's type change"
        );
    }
    for handle in store.get_sensor_alerts_list() {
        if let Some(sensor_id) = handle.read().sensor_id {
            assert!(store.get_sensor_by_id(sensor_id).is_some());
        }
    }
}

#[test]
fn sensor_updates_race_owner_changes() {
    let store = Arc::new(DataStore::new());
    store.update_alert_level(AlertLevel::new(1, "home"));
    store.update_node(Node::new(OWNER, "pi", NodeType::Sensor));
    let done = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = (0..4u32)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    let sensor_id = worker * ROUNDS + round;
                    let mut sensor = Sensor::new(sensor_id, OWNER, round);
                    sensor.alert_levels.insert(1);
                    if store.update_sensor(sensor).is_ok() {
                        let mut event =
                            SensorAlert::for_sensor(sensor_id, 1, i64::from(round));
                        event.alert_levels.insert(1);
                        // The owner may have flipped in between; a rejection is fine.
                        let _ = store.add_sensor_alert(event);
                    }
                }
            })
        })
        .collect();

    let flipper = {
        let store = Arc::clone(&store);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut round = 0u32;
            while !done.load(Ordering::Relaxed) {
                match round % 3 {
                    0 => {
                        store.update_node(Node::new(OWNER, "pi", NodeType::Alert));
                    }
                    1 => store.delete_node_by_id(OWNER),
                    _ => {
                        store.update_node(Node::new(OWNER, "pi", NodeType::Sensor));
                    }
                }
                round = round.wrapping_add(1);
            }
        })
    };

    let checker = {
        let store = Arc::clone(&store);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            while !done.load(Ordering::Relaxed) {
                // Counts come from one lock acquisition: without the owner
                // there can be no sensors, and without sensors no events.
                let counts = store.counts();
                if counts.nodes == 0 {
                    assert_eq!(counts.sensors, 0);
                }
                if counts.sensors == 0 {
                    assert_eq!(counts.sensor_alerts, 0);
                }
                thread::yield_now();
            }
        })
    };

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::Relaxed);
    flipper.join().unwrap();
    checker.join().unwrap();

    assert_no_orphans(&store);

    // One final flip must clear every sensor the writers left behind.
    store.update_node(Node::new(OWNER, "pi", NodeType::Sensor));
    store.update_node(Node::new(OWNER, "pi", NodeType::Manager));
    assert!(store.get_sensors_list(false).is_empty());
    assert!(store.get_sensor_alerts_list().is_empty());
}

#[test]
fn handle_tracks_updates_from_other_threads() {
    let store = Arc::new(DataStore::new());
    store.update_node(Node::new(1, "pi", NodeType::Sensor));
    let handle = store.update_sensor(Sensor::new(1, 1, 0)).unwrap();

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for round in 0..500u32 {
                let mut sensor = Sensor::new(1, 1, 0);
                sensor.alert_delay = round;
                store.update_sensor(sensor).unwrap();
            }
        })
    };
    writer.join().unwrap();

    assert!(handle.ptr_eq(&store.get_sensor_by_id(1).unwrap()));
    assert_eq!(handle.read().alert_delay, 499);
}

#[test]
fn held_read_does_not_stall_other_callers() {
    let store = Arc::new(DataStore::new());
    store.update_node(Node::new(1, "pi", NodeType::Sensor));
    store.update_node(Node::new(2, "siren", NodeType::Alert));
    let handle = store.update_sensor(Sensor::new(1, 1, 0)).unwrap();

    let held = handle.read();

    let (tx, rx) = mpsc::channel();
    let worker = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let mut sensor = Sensor::new(1, 1, 0);
            sensor.description = "door".into();
            store.update_sensor(sensor).unwrap();
            store.sensor_state_change(1, 1, SensorData::None).unwrap();
            let node = store.get_node_by_id(2).map(|node| node.read().hostname.clone());
            tx.send(node).unwrap();
        })
    };

    let node = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(node.as_deref(), Some("siren"));
    worker.join().unwrap();

    // The held value stays as it was; the handle shows the new one.
    assert_eq!(held.description, "");
    assert_eq!(handle.read().description, "door");
    assert_eq!(handle.read().state, 1);
}

#[test]
fn held_read_on_the_writing_thread_does_not_deadlock() {
    let store = DataStore::new();
    store.update_node(Node::new(1, "pi", NodeType::Sensor));
    store.update_alert_level(AlertLevel::new(1, "home"));
    let mut sensor = Sensor::new(1, 1, 0);
    sensor.alert_levels.insert(1);
    let handle = store.update_sensor(sensor).unwrap();

    let held = handle.read();
    store.delete_alert_level_by_level(1);
    store.delete_node_by_id(1);

    assert!(held.alert_levels.contains(&1));
    assert!(handle.read().alert_levels.is_empty());
    assert!(handle.is_deleted());
}
