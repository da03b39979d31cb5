// ── Domain model ──
//
// Plain records for every entity the store tracks. Each carries an
// `internal_state` tag that only the store changes; updates reach stored
// objects through `Record::merge`.

pub mod lifecycle;

pub mod alert;
pub mod alert_level;
pub mod node;
pub mod option;
pub mod sensor;
pub mod sensor_alert;

// ── Re-exports ──────────────────────────────────────────────────────

pub use lifecycle::{InternalState, Lifecycle, Record, Shared};

pub use alert::{Alert, AlertId, Manager, ManagerId};
pub use alert_level::{AlertLevel, AlertLevelId};
pub use node::{ChildKind, Node, NodeId, NodeType};
pub use option::SystemOption;
pub use sensor::{Sensor, SensorData, SensorDataType, SensorId};
pub use sensor_alert::SensorAlert;
