// ── Alert level domain type ──

use serde::{Deserialize, Serialize};

use super::lifecycle::{InternalState, Record, impl_lifecycle};

pub type AlertLevelId = u32;

/// A named tier that sensors and alerts subscribe to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertLevel {
    pub level: AlertLevelId,
    pub name: String,
    #[serde(default)]
    pub trigger_always: bool,
    #[serde(default)]
    pub rules_activated: bool,

    #[serde(skip)]
    pub(crate) internal_state: InternalState,
}

impl AlertLevel {
    pub fn new(level: AlertLevelId, name: impl Into<String>) -> Self {
        Self {
            level,
            name: name.into(),
            trigger_always: false,
            rules_activated: false,
            internal_state: InternalState::New,
        }
    }
}

impl_lifecycle!(AlertLevel);

impl Record for AlertLevel {
    type Key = AlertLevelId;

    fn key(&self) -> AlertLevelId {
        self.level
    }

    fn merge(&mut self, incoming: Self) {
        let Self {
            level,
            name,
            trigger_always,
            rules_activated,
            internal_state: _,
        } = incoming;
        self.level = level;
        self.name = name;
        self.trigger_always = trigger_always;
        self.rules_activated = rules_activated;
    }
}
