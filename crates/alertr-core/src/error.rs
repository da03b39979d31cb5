// ── Core error types ──
//
// Every rejected store call maps to exactly one variant. The store never
// logs or retries; callers decide whether to drop the inbound message,
// retry, or close the offending connection.

use thiserror::Error;

use crate::model::{AlertLevelId, ChildKind, NodeId, NodeType, SensorDataType, SensorId};

/// A referential rule an incoming record broke. The store is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("node {node_id} for {kind} {owner_id} does not exist")]
    UnknownNode {
        node_id: NodeId,
        kind: ChildKind,
        owner_id: u32,
    },

    #[error("node {node_id} is of type {found} and cannot own {kind} {owner_id}")]
    WrongNodeType {
        node_id: NodeId,
        found: NodeType,
        kind: ChildKind,
        owner_id: u32,
    },

    #[error("alert level {level} referenced by {referrer} does not exist")]
    UnknownAlertLevel { level: AlertLevelId, referrer: String },

    #[error("sensor {sensor_id} referenced by sensor alert does not exist")]
    UnknownSensor { sensor_id: SensorId },

    #[error("sensor {sensor_id} does not handle alert level {level}")]
    UnhandledAlertLevel {
        sensor_id: SensorId,
        level: AlertLevelId,
    },

    #[error("sensor {sensor_id} has data type {expected}, sensor alert carries {got}")]
    DataTypeMismatch {
        sensor_id: SensorId,
        expected: SensorDataType,
        got: SensorDataType,
    },
}

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("sensor {sensor_id} has data type {expected}, state change carries {got}")]
    TypeMismatch {
        sensor_id: SensorId,
        expected: SensorDataType,
        got: SensorDataType,
    },

    #[error("{entity_type} {identifier} not found")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },
}

impl CoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The broken rule, if this is a validation failure.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}
