//! Interconnections: the signal groups behind bus-level connections.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use weave_common::Vlnv;

use crate::ids::WireId;

/// The signal group shared by every endpoint of one source connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interconnection {
    /// The source connection name.
    pub name: String,
    /// The bus type of the first bus interface that joined.
    pub bus_type: Option<Vlnv>,
    /// The top component bus interface this connection is exported through.
    pub top_interface: Option<String>,
    /// Wires keyed by logical port name. Empty when exported.
    pub wires: BTreeMap<String, WireId>,
}

impl Interconnection {
    /// Creates an interconnection with no wires.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bus_type: None,
            top_interface: None,
            wires: BTreeMap::new(),
        }
    }

    /// Returns `true` if this connection passes through the top component.
    pub fn is_hierarchical(&self) -> bool {
        self.top_interface.is_some()
    }

    /// Returns the name of the wire carrying `logical` on this connection.
    pub fn wire_name(&self, logical: &str) -> String {
        format!("{}_{}", self.name, logical)
    }
}
