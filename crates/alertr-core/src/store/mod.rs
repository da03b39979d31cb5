// ── Data store ──
//
// Keyed tables plus the time-ordered sensor alert queue, all behind one
// mutex, with referential validation and cascading delete.

mod data_store;
mod sensor_alerts;
mod table;
mod tables;
mod validate;

pub use data_store::{DataStore, StoreCounts};
