//! Ad-hoc bundles: wires formed from point-to-point port connections.

use serde::{Deserialize, Serialize};

use crate::ids::WireId;
use crate::wire::PortRef;

/// A group of ad-hoc connections that share at least one port, with no
/// endpoint on the top component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdHoc {
    /// The bundle name, taken from its first connection.
    pub name: String,
    /// The wire the bundle's ports are joined by.
    pub wire: WireId,
    /// Every port referenced by the bundle's connections, deduplicated.
    pub ports: Vec<PortRef>,
    /// The constant the bundle's input ports are tied to, if any.
    pub tie_off: Option<String>,
}

impl AdHoc {
    /// Returns `true` if the bundle references `(instance, port)`.
    pub fn contains(&self, instance: &str, port: &str) -> bool {
        self.ports
            .iter()
            .any(|p| p.instance == instance && p.port == port)
    }
}
