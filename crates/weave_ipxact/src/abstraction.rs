//! Abstraction definitions: logical ports and their per-mode widths.

use serde::{Deserialize, Serialize};
use weave_common::Vlnv;

use crate::component::{Direction, InterfaceMode};

/// The constraints a logical wire port has in one interface mode.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WirePort {
    /// The required direction in this mode.
    #[serde(default)]
    pub direction: Option<Direction>,
    /// The declared width expression in this mode.
    #[serde(default)]
    pub width: Option<String>,
}

impl WirePort {
    /// Creates a wire port with a declared width.
    pub fn with_width(width: impl Into<String>) -> Self {
        Self {
            direction: None,
            width: Some(width.into()),
        }
    }
}

/// The wire-level description of a logical port.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireAbstraction {
    /// Constraints on master (and mirrored master) interfaces.
    #[serde(default)]
    pub on_master: Option<WirePort>,
    /// Constraints on slave (and mirrored slave) interfaces.
    #[serde(default)]
    pub on_slave: Option<WirePort>,
    /// Constraints on system (and mirrored system) interfaces.
    #[serde(default)]
    pub on_system: Vec<WirePort>,
}

impl WireAbstraction {
    /// Returns the wire port governing `mode`, if any.
    pub fn port_for_mode(&self, mode: InterfaceMode) -> Option<&WirePort> {
        match mode {
            InterfaceMode::Master | InterfaceMode::MirroredMaster => self.on_master.as_ref(),
            InterfaceMode::Slave | InterfaceMode::MirroredSlave => self.on_slave.as_ref(),
            InterfaceMode::System | InterfaceMode::MirroredSystem => self.on_system.first(),
            InterfaceMode::Monitor => None,
        }
    }

    /// Returns the declared, non-empty width for `mode`.
    pub fn width(&self, mode: InterfaceMode) -> Option<&str> {
        self.port_for_mode(mode)
            .and_then(|p| p.width.as_deref())
            .map(str::trim)
            .filter(|w| !w.is_empty())
    }
}

/// A logical port declared by an abstraction definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortAbstraction {
    /// The logical port name.
    pub logical_name: String,
    /// The wire description; absent for transactional ports.
    #[serde(default)]
    pub wire: Option<WireAbstraction>,
}

/// An abstraction definition document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractionDefinition {
    /// The abstraction definition identifier.
    pub vlnv: Vlnv,
    /// The bus definition this abstraction implements.
    #[serde(default)]
    pub bus_type: Option<Vlnv>,
    /// Logical ports.
    #[serde(default)]
    pub ports: Vec<PortAbstraction>,
}

impl AbstractionDefinition {
    /// Creates an empty abstraction definition.
    pub fn new(vlnv: Vlnv) -> Self {
        Self {
            vlnv,
            bus_type: None,
            ports: Vec::new(),
        }
    }

    /// Finds the logical port `name` that has a wire description for `mode`.
    pub fn port(&self, name: &str, mode: InterfaceMode) -> Option<&PortAbstraction> {
        self.ports.iter().find(|p| {
            p.logical_name == name
                && p.wire
                    .as_ref()
                    .is_some_and(|w| w.port_for_mode(mode).is_some())
        })
    }

    /// Returns the declared width of logical port `name` in `mode`.
    pub fn wire_width(&self, name: &str, mode: InterfaceMode) -> Option<&str> {
        self.port(name, mode)
            .and_then(|p| p.wire.as_ref())
            .and_then(|w| w.width(mode))
    }
}
