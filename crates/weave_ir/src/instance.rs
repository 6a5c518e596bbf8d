//! Generation instances: resolved design instances and their bindings.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use weave_common::Vlnv;
use weave_ipxact::{Component, ComponentInstantiation, View};

use crate::assignment::PortAssignment;
use crate::ids::InterconnectionId;

/// A design instance whose component, active view and component
/// instantiation all resolved.
///
/// Serializes the referenced documents by identifier only.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationInstance<'a> {
    /// The instance name.
    pub name: String,
    /// The resolved component.
    #[serde(serialize_with = "component_vlnv")]
    pub component: &'a Component,
    /// The active view.
    #[serde(serialize_with = "view_name")]
    pub view: &'a View,
    /// The component instantiation the active view references.
    #[serde(serialize_with = "instantiation_name")]
    pub instantiation: &'a ComponentInstantiation,
    /// The design behind the active view, for hierarchical components.
    pub design: Option<Vlnv>,
    /// The design configuration behind the active view.
    pub design_configuration: Option<Vlnv>,
    /// Module name assigned when the sub-design was elaborated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Bus interface name to the interconnection it takes part in.
    pub interfaces: BTreeMap<String, InterconnectionId>,
    /// Physical port name to its binding. At most one per port.
    pub port_assignments: BTreeMap<String, PortAssignment>,
}

impl<'a> GenerationInstance<'a> {
    /// Creates an instance with no bindings.
    pub fn new(
        name: impl Into<String>,
        component: &'a Component,
        view: &'a View,
        instantiation: &'a ComponentInstantiation,
    ) -> Self {
        Self {
            name: name.into(),
            component,
            view,
            instantiation,
            design: None,
            design_configuration: None,
            module: None,
            interfaces: BTreeMap::new(),
            port_assignments: BTreeMap::new(),
        }
    }

    /// Returns `true` if the active view refers to a sub-design.
    pub fn is_hierarchical(&self) -> bool {
        self.design.is_some()
    }

    /// Binds `port` unless it is already bound.
    ///
    /// Returns `false`, leaving the existing binding in place, if the port
    /// already has an assignment.
    pub fn assign(&mut self, port: impl Into<String>, assignment: PortAssignment) -> bool {
        match self.port_assignments.entry(port.into()) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(assignment);
                true
            }
        }
    }

    /// Binds `port`, replacing any existing binding.
    ///
    /// Returns the replaced assignment.
    pub fn rebind(
        &mut self,
        port: impl Into<String>,
        assignment: PortAssignment,
    ) -> Option<PortAssignment> {
        self.port_assignments.insert(port.into(), assignment)
    }

    /// Returns the assignment of a port.
    pub fn assignment(&self, port: &str) -> Option<&PortAssignment> {
        self.port_assignments.get(port)
    }

    /// Returns the HDL module name: the name given to an elaborated
    /// sub-design, else the instantiation's module name, else the component
    /// name.
    pub fn module_name(&self) -> &str {
        self.module
            .as_deref()
            .or(self.instantiation.module_name.as_deref())
            .unwrap_or(&self.component.vlnv.name)
    }
}

fn component_vlnv<S: Serializer>(component: &&Component, s: S) -> Result<S::Ok, S::Error> {
    component.vlnv.serialize(s)
}

fn view_name<S: Serializer>(view: &&View, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&view.name)
}

fn instantiation_name<S: Serializer>(
    instantiation: &&ComponentInstantiation,
    s: S,
) -> Result<S::Ok, S::Error> {
    s.serialize_str(&instantiation.name)
}
