// ── Server option domain type ──

use serde::{Deserialize, Serialize};

use super::lifecycle::{InternalState, Record, impl_lifecycle};

/// A free-form server option, keyed by its type string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemOption {
    #[serde(rename = "type")]
    pub option_type: String,
    pub value: String,

    #[serde(skip)]
    pub(crate) internal_state: InternalState,
}

impl SystemOption {
    pub fn new(option_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            option_type: option_type.into(),
            value: value.into(),
            internal_state: InternalState::New,
        }
    }
}

impl_lifecycle!(SystemOption);

impl Record for SystemOption {
    type Key = String;

    fn key(&self) -> String {
        self.option_type.clone()
    }

    fn merge(&mut self, incoming: Self) {
        let Self {
            option_type,
            value,
            internal_state: _,
        } = incoming;
        self.option_type = option_type;
        self.value = value;
    }
}
