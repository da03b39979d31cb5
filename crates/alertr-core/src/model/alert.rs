// ── Alert and manager domain types ──

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::alert_level::AlertLevelId;
use super::lifecycle::{InternalState, Record, impl_lifecycle};
use super::node::NodeId;

pub type AlertId = u32;
pub type ManagerId = u32;

/// An actuator (siren, notifier, ...) attached to an alert node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub alert_id: AlertId,
    pub node_id: NodeId,
    pub remote_alert_id: u32,
    #[serde(default)]
    pub alert_levels: BTreeSet<AlertLevelId>,
    #[serde(default)]
    pub description: String,

    #[serde(skip)]
    pub(crate) internal_state: InternalState,
}

impl Alert {
    pub fn new(alert_id: AlertId, node_id: NodeId, remote_alert_id: u32) -> Self {
        Self {
            alert_id,
            node_id,
            remote_alert_id,
            alert_levels: BTreeSet::new(),
            description: String::new(),
            internal_state: InternalState::New,
        }
    }
}

/// A dashboard or console attached to a manager node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    pub manager_id: ManagerId,
    pub node_id: NodeId,
    #[serde(default)]
    pub description: String,

    #[serde(skip)]
    pub(crate) internal_state: InternalState,
}

impl Manager {
    pub fn new(manager_id: ManagerId, node_id: NodeId, description: impl Into<String>) -> Self {
        Self {
            manager_id,
            node_id,
            description: description.into(),
            internal_state: InternalState::New,
        }
    }
}

impl_lifecycle!(Alert, Manager);

impl Record for Alert {
    type Key = AlertId;

    fn key(&self) -> AlertId {
        self.alert_id
    }

    fn merge(&mut self, incoming: Self) {
        let Self {
            alert_id,
            node_id,
            remote_alert_id,
            alert_levels,
            description,
            internal_state: _,
        } = incoming;
        self.alert_id = alert_id;
        self.node_id = node_id;
        self.remote_alert_id = remote_alert_id;
        self.alert_levels = alert_levels;
        self.description = description;
    }
}

impl Record for Manager {
    type Key = ManagerId;

    fn key(&self) -> ManagerId {
        self.manager_id
    }

    fn merge(&mut self, incoming: Self) {
        let Self {
            manager_id,
            node_id,
            description,
            internal_state: _,
        } = incoming;
        self.manager_id = manager_id;
        self.node_id = node_id;
        self.description = description;
    }
}
