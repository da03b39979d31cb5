// ── Node domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::lifecycle::{InternalState, Record, impl_lifecycle};

pub type NodeId = u32;

/// Role of a network participant. Decides which child records it may own.
///
/// Parsed case-insensitively from both strings and serialized input;
/// always written lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase", try_from = "String")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NodeType {
    Sensor,
    Alert,
    Manager,
    Server,
}

impl TryFrom<String> for NodeType {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Child record kinds that hang off a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ChildKind {
    Sensor,
    Alert,
    Manager,
}

impl NodeType {
    /// The child kind a node of this type owns. The server owns its
    /// internal sensors.
    pub fn child_kind(self) -> ChildKind {
        match self {
            Self::Sensor | Self::Server => ChildKind::Sensor,
            Self::Alert => ChildKind::Alert,
            Self::Manager => ChildKind::Manager,
        }
    }

    pub fn can_own(self, kind: ChildKind) -> bool {
        self.child_kind() == kind
    }
}

/// A participant of the alert network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub node_id: NodeId,
    pub hostname: String,
    pub node_type: NodeType,
    #[serde(default)]
    pub instance: String,
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub version: f64,
    #[serde(default)]
    pub revision: u32,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub persistent: bool,

    #[serde(skip)]
    pub(crate) internal_state: InternalState,
}

impl Node {
    pub fn new(node_id: NodeId, hostname: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            node_id,
            hostname: hostname.into(),
            node_type,
            instance: String::new(),
            connected: false,
            version: 0.0,
            revision: 0,
            username: String::new(),
            persistent: false,
            internal_state: InternalState::New,
        }
    }
}

impl_lifecycle!(Node);

impl Record for Node {
    type Key = NodeId;

    fn key(&self) -> NodeId {
        self.node_id
    }

    fn merge(&mut self, incoming: Self) {
        let Self {
            node_id,
            hostname,
            node_type,
            instance,
            connected,
            version,
            revision,
            username,
            persistent,
            internal_state: _,
        } = incoming;
        self.node_id = node_id;
        self.hostname = hostname;
        self.node_type = node_type;
        self.instance = instance;
        self.connected = connected;
        self.version = version;
        self.revision = revision;
        self.username = username;
        self.persistent = persistent;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn node_type_parses_case_insensitively() {
        assert_eq!("Sensor".parse::<NodeType>().unwrap(), NodeType::Sensor);
        assert_eq!("ALERT".parse::<NodeType>().unwrap(), NodeType::Alert);
        assert!("sensr".parse::<NodeType>().is_err());
        assert_eq!(NodeType::Manager.to_string(), "manager");
    }

    #[test]
    fn node_type_deserializes_case_insensitively() {
        let parsed: NodeType = serde_json::from_str("\"Server\"").unwrap();
        assert_eq!(parsed, NodeType::Server);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"server\"");
        assert!(serde_json::from_str::<NodeType>("\"router\"").is_err());

        let node: Node = serde_json::from_value(serde_json::json!({
            "node_id": 3,
            "hostname": "pi",
            "node_type": "SENSOR",
        }))
        .unwrap();
        assert_eq!(node.node_type, NodeType::Sensor);
    }

    #[test]
    fn server_owns_sensors() {
        assert!(NodeType::Server.can_own(ChildKind::Sensor));
        assert!(NodeType::Sensor.can_own(ChildKind::Sensor));
        assert!(!NodeType::Alert.can_own(ChildKind::Sensor));
        assert!(!NodeType::Server.can_own(ChildKind::Manager));
    }

    #[test]
    fn merge_keeps_lifecycle_tag() {
        let mut stored = Node::new(1, "old", NodeType::Sensor);
        stored.internal_state = InternalState::Stored;

        let mut incoming = Node::new(1, "new", NodeType::Alert);
        incoming.connected = true;
        stored.merge(incoming);

        assert_eq!(stored.hostname, "new");
        assert_eq!(stored.node_type, NodeType::Alert);
        assert!(stored.connected);
        assert_eq!(stored.internal_state, InternalState::Stored);
    }
}
