//! Wires: named signals shared by the ports they connect.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bounds::Bounds;
use crate::ids::{AdHocId, InterconnectionId};

/// One physical port of one instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PortRef {
    /// The instance name.
    pub instance: String,
    /// The physical port name.
    pub port: String,
}

impl PortRef {
    /// Creates a port reference.
    pub fn new(instance: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            port: port.into(),
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.instance, self.port)
    }
}

/// The record a wire belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireOwner {
    /// A bus-level interconnection.
    Interconnection(InterconnectionId),
    /// An ad-hoc bundle.
    AdHoc(AdHocId),
}

/// A named signal shared by every port it connects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    /// The wire name.
    pub name: String,
    /// The bit range, taken from the first contributing port.
    pub bounds: Bounds,
    /// The ports connected to this wire, in the order they joined.
    pub ports: Vec<PortRef>,
    /// The interconnection or bundle this wire belongs to.
    pub owner: WireOwner,
}

impl Wire {
    /// Creates an unconnected wire with no bounds.
    pub fn new(name: impl Into<String>, owner: WireOwner) -> Self {
        Self {
            name: name.into(),
            bounds: Bounds::empty(),
            ports: Vec::new(),
            owner,
        }
    }

    /// Adds a port and offers its bounds.
    ///
    /// The bounds are taken only while the wire has none; once set they are
    /// authoritative. Returns `true` if the offered bounds were taken.
    pub fn connect(&mut self, port: PortRef, bounds: Bounds) -> bool {
        self.ports.push(port);
        if self.bounds.is_empty() && !bounds.is_empty() {
            self.bounds = bounds;
            true
        } else {
            false
        }
    }

    /// Removes a port. The wire keeps its bounds.
    pub fn disconnect(&mut self, port: &PortRef) -> bool {
        let before = self.ports.len();
        self.ports.retain(|p| p != port);
        self.ports.len() != before
    }
}
