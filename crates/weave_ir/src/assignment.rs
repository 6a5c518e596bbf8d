//! Port assignments: what each instance port is bound to.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bounds::Bounds;
use crate::ids::WireId;

/// A constant a port is tied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieOff {
    /// A literal value, already resolved from `default` where needed.
    Value(String),
    /// Explicitly left unconnected.
    Open,
}

/// The single target a port is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    /// An internal wire.
    Wire(WireId),
    /// A port of the top component, by name.
    External(String),
    /// A constant.
    TieOff(TieOff),
    /// Nothing: the connection has no counterpart for this port.
    Unconnected,
}

/// Which kind of connection produced an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentOrigin {
    /// A bus interface port map.
    BusInterface,
    /// An ad-hoc connection.
    AdHoc,
}

impl fmt::Display for AssignmentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentOrigin::BusInterface => f.write_str("bus interface"),
            AssignmentOrigin::AdHoc => f.write_str("ad-hoc"),
        }
    }
}

/// The binding of one physical port of one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortAssignment {
    /// The port's resolved physical range.
    pub bounds: Bounds,
    /// What the port is bound to.
    pub binding: Binding,
    /// Which kind of connection produced this assignment.
    pub origin: AssignmentOrigin,
}

impl PortAssignment {
    /// Creates an assignment.
    pub fn new(bounds: Bounds, binding: Binding, origin: AssignmentOrigin) -> Self {
        Self {
            bounds,
            binding,
            origin,
        }
    }

    /// Returns the wire, if the port is bound to one.
    pub fn wire(&self) -> Option<WireId> {
        match self.binding {
            Binding::Wire(id) => Some(id),
            _ => None,
        }
    }

    /// Returns the top port name, if the port is bound to one.
    pub fn external_name(&self) -> Option<&str> {
        match &self.binding {
            Binding::External(name) => Some(name),
            _ => None,
        }
    }

    /// Returns `true` if the port was assigned but left without a target.
    pub fn is_unconnected(&self) -> bool {
        self.binding == Binding::Unconnected
    }

    /// Returns the tie-off, if the port is bound to a constant.
    pub fn tie_off(&self) -> Option<&TieOff> {
        match &self.binding {
            Binding::TieOff(t) => Some(t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_accessors_are_exclusive() {
        let a = PortAssignment::new(
            Bounds::new("7", "0"),
            Binding::External("irq_o".to_string()),
            AssignmentOrigin::AdHoc,
        );
        assert_eq!(a.external_name(), Some("irq_o"));
        assert!(a.wire().is_none());
        assert!(a.tie_off().is_none());

        let t = PortAssignment::new(
            Bounds::empty(),
            Binding::TieOff(TieOff::Open),
            AssignmentOrigin::AdHoc,
        );
        assert_eq!(t.tie_off(), Some(&TieOff::Open));
        assert!(!t.is_unconnected());
    }

    #[test]
    fn serialized_shape() {
        let a = PortAssignment::new(
            Bounds::empty(),
            Binding::Wire(WireId::from_raw(3)),
            AssignmentOrigin::BusInterface,
        );
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(
            json,
            r#"{"bounds":{"left":"","right":""},"binding":{"wire":3},"origin":"bus_interface"}"#
        );

        let u = PortAssignment::new(
            Bounds::new("0", "0"),
            Binding::Unconnected,
            AssignmentOrigin::BusInterface,
        );
        let json = serde_json::to_value(&u).unwrap();
        assert_eq!(json["binding"], "unconnected");
        assert!(u.is_unconnected());
    }
}
