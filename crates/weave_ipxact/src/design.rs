//! Designs: component instances and the connections between them.

use serde::{Deserialize, Serialize};
use weave_common::Vlnv;

use crate::parameter::{ConfigurableElementValue, Parameter};

/// A placed component inside a design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInstance {
    /// The instance name, unique within the design.
    pub instance_name: String,
    /// The instantiated component.
    pub component_ref: Vlnv,
    /// Parameter overrides for this instance.
    #[serde(default)]
    pub configurable_element_values: Vec<ConfigurableElementValue>,
}

impl ComponentInstance {
    /// Creates an instance with no parameter overrides.
    pub fn new(instance_name: impl Into<String>, component_ref: Vlnv) -> Self {
        Self {
            instance_name: instance_name.into(),
            component_ref,
            configurable_element_values: Vec::new(),
        }
    }
}

/// A bus interface endpoint on an instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveInterface {
    /// The instance name.
    pub component_ref: String,
    /// The bus interface name on that instance's component.
    pub bus_ref: String,
}

impl ActiveInterface {
    /// Creates an endpoint.
    pub fn new(component_ref: impl Into<String>, bus_ref: impl Into<String>) -> Self {
        Self {
            component_ref: component_ref.into(),
            bus_ref: bus_ref.into(),
        }
    }

    /// Returns `true` if this endpoint is `bus` on `instance`.
    pub fn references(&self, instance: &str, bus: &str) -> bool {
        self.component_ref == instance && self.bus_ref == bus
    }
}

/// A bus interface endpoint on the enclosing (top) component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierInterface {
    /// The bus interface name on the top component.
    pub bus_ref: String,
}

/// A bus-level connection between instance interfaces, optionally exported
/// through the top component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interconnection {
    /// The connection name.
    pub name: String,
    /// The first endpoint.
    pub start_interface: ActiveInterface,
    /// Further instance endpoints.
    #[serde(default)]
    pub active_interfaces: Vec<ActiveInterface>,
    /// Endpoints on the top component.
    #[serde(default)]
    pub hier_interfaces: Vec<HierInterface>,
}

impl Interconnection {
    /// Iterates the start interface followed by the active interfaces.
    pub fn endpoints(&self) -> impl Iterator<Item = &ActiveInterface> {
        std::iter::once(&self.start_interface).chain(self.active_interfaces.iter())
    }

    /// Returns `true` if any endpoint is `bus` on `instance`.
    pub fn references(&self, instance: &str, bus: &str) -> bool {
        self.endpoints().any(|e| e.references(instance, bus))
    }
}

/// A port on an instance referenced by an ad-hoc connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InternalPortReference {
    /// The instance name.
    pub component_ref: String,
    /// The port name on that instance's component.
    pub port_ref: String,
}

impl InternalPortReference {
    /// Creates a port reference.
    pub fn new(component_ref: impl Into<String>, port_ref: impl Into<String>) -> Self {
        Self {
            component_ref: component_ref.into(),
            port_ref: port_ref.into(),
        }
    }
}

impl<I: Into<String>, P: Into<String>> From<(I, P)> for InternalPortReference {
    fn from((component_ref, port_ref): (I, P)) -> Self {
        Self::new(component_ref, port_ref)
    }
}

/// A port on the top component referenced by an ad-hoc connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalPortReference {
    /// The top component port name.
    pub port_ref: String,
}

/// A direct port-to-port connection that bypasses bus interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdHocConnection {
    /// The connection name.
    pub name: String,
    /// A constant the connected ports are tied to (`default`, `open`, or a value).
    #[serde(default)]
    pub tied_value: Option<String>,
    /// Instance ports.
    #[serde(default)]
    pub internal_port_references: Vec<InternalPortReference>,
    /// Top component ports.
    #[serde(default)]
    pub external_port_references: Vec<ExternalPortReference>,
}

impl AdHocConnection {
    /// Creates a connection between instance ports only.
    pub fn internal<R: Into<InternalPortReference>>(
        name: impl Into<String>,
        ports: impl IntoIterator<Item = R>,
    ) -> Self {
        Self {
            name: name.into(),
            tied_value: None,
            internal_port_references: ports.into_iter().map(Into::into).collect(),
            external_port_references: Vec::new(),
        }
    }

    /// Adds an external port reference.
    pub fn with_external(mut self, port: impl Into<String>) -> Self {
        self.external_port_references.push(ExternalPortReference {
            port_ref: port.into(),
        });
        self
    }

    /// Sets the tied value.
    pub fn with_tied_value(mut self, value: impl Into<String>) -> Self {
        self.tied_value = Some(value.into());
        self
    }

    /// Returns `true` if the connection reaches the top component.
    pub fn is_external(&self) -> bool {
        !self.external_port_references.is_empty()
    }
}

/// A design document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Design {
    /// The design identifier.
    pub vlnv: Vlnv,
    /// Component instances, in declaration order.
    #[serde(default)]
    pub component_instances: Vec<ComponentInstance>,
    /// Bus-level interconnections, in declaration order.
    #[serde(default)]
    pub interconnections: Vec<Interconnection>,
    /// Ad-hoc connections, in declaration order.
    #[serde(default)]
    pub ad_hoc_connections: Vec<AdHocConnection>,
    /// Design parameters.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl Design {
    /// Creates an empty design.
    pub fn new(vlnv: Vlnv) -> Self {
        Self {
            vlnv,
            component_instances: Vec::new(),
            interconnections: Vec::new(),
            ad_hoc_connections: Vec::new(),
            parameters: Vec::new(),
        }
    }

    /// Finds an instance by name.
    pub fn instance(&self, name: &str) -> Option<&ComponentInstance> {
        self.component_instances
            .iter()
            .find(|i| i.instance_name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interconnection_endpoints_start_first() {
        let ic = Interconnection {
            name: "c0".to_string(),
            start_interface: ActiveInterface::new("u0", "m"),
            active_interfaces: vec![ActiveInterface::new("u1", "s")],
            hier_interfaces: vec![],
        };
        let names: Vec<_> = ic.endpoints().map(|e| e.component_ref.as_str()).collect();
        assert_eq!(names, vec!["u0", "u1"]);
        assert!(ic.references("u1", "s"));
        assert!(!ic.references("u1", "m"));
    }

    #[test]
    fn adhoc_builders() {
        let c = AdHocConnection::internal("n0", [InternalPortReference::new("u0", "irq")])
            .with_external("irq_out")
            .with_tied_value("0");
        assert!(c.is_external());
        assert_eq!(c.tied_value.as_deref(), Some("0"));
    }

    #[test]
    fn deserialize_minimal_design() {
        let json = r#"{
            "vlnv": "acme:soc:top.design:1.0",
            "component_instances": [
                {"instance_name": "u0", "component_ref": "acme:ip:uart:1.0"}
            ]
        }"#;
        let d: Design = serde_json::from_str(json).unwrap();
        assert_eq!(d.component_instances.len(), 1);
        assert!(d.interconnections.is_empty());
        assert!(d.instance("u0").is_some());
    }
}
