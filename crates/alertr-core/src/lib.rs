//! Authoritative in-memory state of an alertr sensor/alert network.
//!
//! Every inbound update from a protocol session and every query from a
//! manager UI passes through the [`DataStore`]. It is the only place where
//! referential integrity between the entity kinds is enforced:
//!
//! - **Nodes** own sensors, alerts, or managers depending on their
//!   [`NodeType`]. Changing a node's type or deleting it cascades to the
//!   children that no longer fit.
//! - **Sensors** and **alerts** subscribe to [`AlertLevel`]s. Deleting a
//!   level strips it from every subscriber.
//! - **Sensor alerts** form a queue ordered by `time_received`, pruned from
//!   the head.
//!
//! Getters hand out [`Shared`] handles to the live objects. Updates are
//! published behind those same handles, and deletes flip them to
//! [`InternalState::Deleted`], so a holder of an old handle always sees
//! either the current values or that the object was retired.
//!
//! All tables sit behind one mutex; validation and the write it guards run
//! in the same critical section. Reading a handle never takes that mutex
//! or any other lock.

pub mod error;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::{CoreError, ValidationError};
pub use store::{DataStore, StoreCounts};

pub use model::{
    Alert, AlertId, AlertLevel, AlertLevelId, ChildKind, InternalState, Lifecycle, Manager,
    ManagerId, Node, NodeId, NodeType, Record, Sensor, SensorAlert, SensorData, SensorDataType,
    SensorId, Shared, SystemOption,
};
