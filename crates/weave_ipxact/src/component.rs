//! Components: ports, bus interfaces, views, and instantiations.

use serde::{Deserialize, Serialize};
use weave_common::Vlnv;

use crate::parameter::Parameter;

/// The direction of a physical port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Data flows into the component.
    In,
    /// Data flows out of the component.
    Out,
    /// Data flows both ways.
    InOut,
}

/// A left/right pair of bound expressions, e.g. `WIDTH-1` and `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    /// The left (usually most significant) bound expression.
    pub left: String,
    /// The right bound expression.
    pub right: String,
}

impl Range {
    /// Creates a range from two expressions.
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// A physical wire port of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// The port name.
    pub name: String,
    /// The direction of data flow.
    pub direction: Direction,
    /// The declared vector bounds; `None` for a scalar port.
    #[serde(default)]
    pub vector: Option<Range>,
    /// The driver default value, used by `default` tie-offs.
    #[serde(default)]
    pub default_value: Option<String>,
}

impl Port {
    /// Creates a scalar port.
    pub fn new(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction,
            vector: None,
            default_value: None,
        }
    }

    /// Sets the vector bounds.
    pub fn with_vector(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.vector = Some(Range::new(left, right));
        self
    }

    /// Sets the driver default value.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// The role a bus interface plays on its bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceMode {
    /// Initiator side.
    Master,
    /// Target side.
    Slave,
    /// System signals such as clock and reset.
    System,
    /// The mirror of a master, used on interconnect components.
    MirroredMaster,
    /// The mirror of a slave.
    MirroredSlave,
    /// The mirror of a system interface.
    MirroredSystem,
    /// A passive observer.
    Monitor,
}

/// The logical side of a port map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalPort {
    /// The logical port name declared by the abstraction definition.
    pub name: String,
    /// An optional slice of the logical port.
    #[serde(default)]
    pub range: Option<Range>,
}

/// The physical side of a port map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalPort {
    /// The name of the component port.
    pub name: String,
}

/// A binding between one logical port and one physical port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMap {
    /// The abstraction side.
    pub logical_port: LogicalPort,
    /// The component side; absent for logical tie-offs.
    #[serde(default)]
    pub physical_port: Option<PhysicalPort>,
}

impl PortMap {
    /// Creates a port map from logical to physical port names.
    pub fn new(logical: impl Into<String>, physical: impl Into<String>) -> Self {
        Self {
            logical_port: LogicalPort {
                name: logical.into(),
                range: None,
            },
            physical_port: Some(PhysicalPort {
                name: physical.into(),
            }),
        }
    }

    /// Sets the logical range.
    pub fn with_logical_range(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.logical_port.range = Some(Range::new(left, right));
        self
    }
}

/// The abstraction a bus interface is implemented with, and its port maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractionType {
    /// The abstraction definition this type references.
    #[serde(default)]
    pub abstraction_ref: Option<Vlnv>,
    /// Views this abstraction type applies to; empty means all views.
    #[serde(default)]
    pub view_refs: Vec<String>,
    /// The logical-to-physical port maps.
    #[serde(default)]
    pub port_maps: Vec<PortMap>,
}

impl AbstractionType {
    /// Returns `true` if this abstraction type applies to the named view.
    pub fn applies_to_view(&self, view: &str) -> bool {
        self.view_refs.is_empty() || self.view_refs.iter().any(|v| v == view)
    }
}

/// A named, typed connection point on a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusInterface {
    /// The bus interface name.
    pub name: String,
    /// The bus definition this interface implements.
    pub bus_type: Vlnv,
    /// The interface mode.
    pub interface_mode: InterfaceMode,
    /// The abstraction types with their port maps.
    #[serde(default)]
    pub abstraction_types: Vec<AbstractionType>,
}

impl BusInterface {
    /// Finds the port map whose logical port has the given name, across all
    /// abstraction types.
    pub fn port_map_for_logical(&self, logical: &str) -> Option<&PortMap> {
        self.abstraction_types
            .iter()
            .flat_map(|t| t.port_maps.iter())
            .find(|pm| pm.logical_port.name == logical)
    }
}

/// A selectable implementation variant of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    /// The view name.
    pub name: String,
    /// The component instantiation this view uses.
    #[serde(default)]
    pub component_instantiation_ref: Option<String>,
    /// The design instantiation this view uses (hierarchical components).
    #[serde(default)]
    pub design_instantiation_ref: Option<String>,
    /// The design configuration instantiation this view uses.
    #[serde(default)]
    pub design_configuration_instantiation_ref: Option<String>,
}

impl View {
    /// Creates a view referencing a component instantiation.
    pub fn new(name: impl Into<String>, instantiation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            component_instantiation_ref: Some(instantiation.into()),
            design_instantiation_ref: None,
            design_configuration_instantiation_ref: None,
        }
    }
}

/// The HDL module a view is implemented by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInstantiation {
    /// The instantiation name.
    pub name: String,
    /// The HDL module name, if it differs from the component name.
    #[serde(default)]
    pub module_name: Option<String>,
    /// The HDL language.
    #[serde(default)]
    pub language: Option<String>,
    /// Parameters passed to the HDL module.
    #[serde(default)]
    pub module_parameters: Vec<Parameter>,
}

impl ComponentInstantiation {
    /// Creates an instantiation with no module parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module_name: None,
            language: None,
            module_parameters: Vec::new(),
        }
    }
}

/// A reference from a view to a design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignInstantiation {
    /// The instantiation name.
    pub name: String,
    /// The referenced design.
    pub design_ref: Vlnv,
}

/// A reference from a view to a design configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignConfigurationInstantiation {
    /// The instantiation name.
    pub name: String,
    /// The referenced design configuration.
    pub design_configuration_ref: Vlnv,
}

/// A component document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// The component identifier.
    pub vlnv: Vlnv,
    /// Physical ports, in declaration order.
    #[serde(default)]
    pub ports: Vec<Port>,
    /// Bus interfaces, in declaration order.
    #[serde(default)]
    pub bus_interfaces: Vec<BusInterface>,
    /// Component parameters.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Views.
    #[serde(default)]
    pub views: Vec<View>,
    /// Component instantiations referenced by views.
    #[serde(default)]
    pub component_instantiations: Vec<ComponentInstantiation>,
    /// Design instantiations referenced by views.
    #[serde(default)]
    pub design_instantiations: Vec<DesignInstantiation>,
    /// Design configuration instantiations referenced by views.
    #[serde(default)]
    pub design_configuration_instantiations: Vec<DesignConfigurationInstantiation>,
}

impl Component {
    /// Creates an empty component.
    pub fn new(vlnv: Vlnv) -> Self {
        Self {
            vlnv,
            ports: Vec::new(),
            bus_interfaces: Vec::new(),
            parameters: Vec::new(),
            views: Vec::new(),
            component_instantiations: Vec::new(),
            design_instantiations: Vec::new(),
            design_configuration_instantiations: Vec::new(),
        }
    }

    /// Finds a view by name.
    pub fn find_view(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|v| v.name == name)
    }

    /// Finds a component instantiation by name.
    pub fn find_component_instantiation(&self, name: &str) -> Option<&ComponentInstantiation> {
        self.component_instantiations.iter().find(|i| i.name == name)
    }

    /// Finds a design instantiation by name.
    pub fn find_design_instantiation(&self, name: &str) -> Option<&DesignInstantiation> {
        self.design_instantiations.iter().find(|i| i.name == name)
    }

    /// Finds a design configuration instantiation by name.
    pub fn find_design_configuration_instantiation(
        &self,
        name: &str,
    ) -> Option<&DesignConfigurationInstantiation> {
        self.design_configuration_instantiations
            .iter()
            .find(|i| i.name == name)
    }

    /// Finds a physical port by name.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Finds a bus interface by name.
    pub fn bus_interface(&self, name: &str) -> Option<&BusInterface> {
        self.bus_interfaces.iter().find(|b| b.name == name)
    }
}
