//! Conformance test helpers for the weave elaboration pipeline.
//!
//! Provides builders for components and top-level designs so integration
//! tests can describe a small system in a few lines, elaborate it, and assert
//! on the resulting generation model and diagnostics.

#![warn(missing_docs)]

use weave_common::Vlnv;
use weave_config::ProjectConfig;
use weave_diagnostics::{DiagnosticCode, Severity};
use weave_elaborate::{
    elaborate, elaborate_hierarchy, DesignElaboration, ElaborateOptions, Elaboration, TopDesign,
};
use weave_ipxact::{
    AbstractionDefinition, AbstractionType, ActiveInterface, AdHocConnection, BusInterface,
    Component, ComponentInstance, ComponentInstantiation, ConfigurableElementValue, Design,
    DesignConfiguration, DesignConfigurationInstantiation, DesignInstantiation, Direction,
    Document, HierInterface, Interconnection, InterfaceMode, MemoryLibrary, Parameter, Port,
    PortAbstraction, PortMap, View, ViewConfiguration, WireAbstraction, WirePort,
};

/// The view every built leaf component offers.
pub const LEAF_VIEW: &str = "rtl";
/// The view of the top component.
pub const TOP_VIEW: &str = "hier";

/// Returns `acme:ip:<name>:1.0`.
pub fn vlnv(name: &str) -> Vlnv {
    Vlnv::new("acme", "ip", name, "1.0")
}

/// Returns the bus type used by built bus interfaces, `acme:bus:<name>:1.0`.
pub fn bus_type(name: &str) -> Vlnv {
    Vlnv::new("acme", "bus", name, "1.0")
}

/// Creates a `ProjectConfig` for the given top component and view.
pub fn make_config(top: &Vlnv, view: &str) -> ProjectConfig {
    let toml_str = format!(
        r#"
[project]
name = "conformance_test"
version = "0.1.0"

[top]
component = "{top}"
view = "{view}"
"#
    );
    toml::from_str(&toml_str).unwrap()
}

/// Builds a leaf component with one `rtl` view.
pub struct ComponentBuilder {
    component: Component,
}

impl ComponentBuilder {
    /// Starts a component named `acme:ip:<name>:1.0`.
    pub fn new(name: &str) -> Self {
        let mut component = Component::new(vlnv(name));
        component.views.push(View::new(LEAF_VIEW, "verilog"));
        component
            .component_instantiations
            .push(ComponentInstantiation::new("verilog"));
        Self { component }
    }

    /// Adds a scalar port.
    pub fn port(mut self, name: &str, direction: Direction) -> Self {
        self.component.ports.push(Port::new(name, direction));
        self
    }

    /// Adds a vector port.
    pub fn vector(mut self, name: &str, direction: Direction, left: &str, right: &str) -> Self {
        self.component
            .ports
            .push(Port::new(name, direction).with_vector(left, right));
        self
    }

    /// Adds a port with a default value.
    pub fn port_with_default(mut self, name: &str, direction: Direction, default: &str) -> Self {
        self.component
            .ports
            .push(Port::new(name, direction).with_default(default));
        self
    }

    /// Adds a component parameter with a value id.
    pub fn parameter(mut self, name: &str, id: &str, value: &str) -> Self {
        self.component
            .parameters
            .push(Parameter::new(name, value).with_id(id));
        self
    }

    /// Adds a module parameter to the `rtl` instantiation.
    pub fn module_parameter(mut self, name: &str, id: &str, value: &str) -> Self {
        if let Some(inst) = self.component.component_instantiations.first_mut() {
            inst.module_parameters
                .push(Parameter::new(name, value).with_id(id));
        }
        self
    }

    /// Sets the HDL module name of the `rtl` instantiation.
    pub fn module(mut self, name: &str) -> Self {
        if let Some(inst) = self.component.component_instantiations.first_mut() {
            inst.module_name = Some(name.to_string());
        }
        self
    }

    /// Adds a bus interface of bus type `apb` mapping `(logical, physical)`
    /// port pairs.
    pub fn bus(self, name: &str, mode: InterfaceMode, maps: &[(&str, &str)]) -> Self {
        self.bus_with(bus_interface(name, mode, maps))
    }

    /// Adds a prepared bus interface.
    pub fn bus_with(mut self, bus: BusInterface) -> Self {
        self.component.bus_interfaces.push(bus);
        self
    }

    /// Finishes the component.
    pub fn build(self) -> Component {
        self.component
    }
}

/// Creates a bus interface of bus type `apb` with one abstraction type
/// mapping `(logical, physical)` port pairs.
pub fn bus_interface(name: &str, mode: InterfaceMode, maps: &[(&str, &str)]) -> BusInterface {
    BusInterface {
        name: name.to_string(),
        bus_type: bus_type("apb"),
        interface_mode: mode,
        abstraction_types: vec![AbstractionType {
            abstraction_ref: None,
            view_refs: Vec::new(),
            port_maps: maps
                .iter()
                .map(|(logical, physical)| PortMap::new(*logical, *physical))
                .collect(),
        }],
    }
}

/// Creates an abstraction definition declaring the same width on master and
/// slave sides for each `(logical, width)` pair.
pub fn abstraction_definition(vlnv: Vlnv, widths: &[(&str, &str)]) -> AbstractionDefinition {
    let mut def = AbstractionDefinition::new(vlnv);
    for (logical, width) in widths {
        def.ports.push(PortAbstraction {
            logical_name: logical.to_string(),
            wire: Some(WireAbstraction {
                on_master: Some(WirePort::with_width(*width)),
                on_slave: Some(WirePort::with_width(*width)),
                on_system: Vec::new(),
            }),
        });
    }
    def
}

/// A top component, its design and configuration, and a library.
///
/// Every instance added with [`Soc::instance`] is given the `rtl` view in the
/// design configuration.
pub struct Soc {
    /// The top component.
    pub top: Component,
    /// The top component's active view.
    pub top_view: View,
    /// The design under test.
    pub design: Design,
    /// The design configuration.
    pub configuration: DesignConfiguration,
    /// Documents available to elaboration.
    pub library: MemoryLibrary,
}

impl Default for Soc {
    fn default() -> Self {
        Self::new()
    }
}

impl Soc {
    /// Creates an empty system with top component `acme:ip:soc:1.0`.
    pub fn new() -> Self {
        Self::named("soc")
    }

    /// Creates an empty system with top component `acme:ip:<name>:1.0`,
    /// design `<name>.design` and configuration `<name>.designcfg`.
    pub fn named(name: &str) -> Self {
        let top_view = View {
            name: TOP_VIEW.to_string(),
            component_instantiation_ref: None,
            design_instantiation_ref: None,
            design_configuration_instantiation_ref: None,
        };
        let mut top = Component::new(vlnv(name));
        top.views.push(top_view.clone());
        Self {
            top,
            top_view,
            design: Design::new(vlnv(&format!("{name}.design"))),
            configuration: DesignConfiguration::new(vlnv(&format!("{name}.designcfg"))),
            library: MemoryLibrary::new(),
        }
    }

    /// Adds an instance of `acme:ip:<component>:1.0` with the given active
    /// view.
    pub fn instance_in_view(mut self, name: &str, component: &str, view: &str) -> Self {
        self.configuration = self.configuration.with_active_view(name, view);
        self.design
            .component_instances
            .push(ComponentInstance::new(name, vlnv(component)));
        self
    }

    /// Packages this system for use inside another one.
    ///
    /// The top component's `hier` view gains a component instantiation and
    /// references the design and configuration, so an instance of it in
    /// that view is elaborated as a sub-design. Returns the top component,
    /// design, configuration and every library document.
    pub fn into_sub_design(mut self) -> Vec<Document> {
        self.top
            .component_instantiations
            .push(ComponentInstantiation::new("verilog"));
        self.top.design_instantiations.push(DesignInstantiation {
            name: "design".to_string(),
            design_ref: self.design.vlnv.clone(),
        });
        self.top
            .design_configuration_instantiations
            .push(DesignConfigurationInstantiation {
                name: "config".to_string(),
                design_configuration_ref: self.configuration.vlnv.clone(),
            });
        if let Some(view) = self.top.views.iter_mut().find(|v| v.name == TOP_VIEW) {
            view.component_instantiation_ref = Some("verilog".to_string());
            view.design_instantiation_ref = Some("design".to_string());
            view.design_configuration_instantiation_ref = Some("config".to_string());
        }

        let mut documents = vec![
            Document::Component(self.top),
            Document::Design(self.design),
            Document::DesignConfiguration(self.configuration),
        ];
        documents.extend(self.library.documents().cloned());
        documents
    }

    /// Adds every document of a packaged sub-system to the library.
    pub fn embed(self, documents: impl IntoIterator<Item = Document>) -> Self {
        documents.into_iter().fold(self, Self::document)
    }

    /// Adds a document to the library.
    pub fn document(mut self, document: Document) -> Self {
        self.library = self.library.with(document);
        self
    }

    /// Adds a component to the library.
    pub fn component(self, component: Component) -> Self {
        self.document(Document::Component(component))
    }

    /// Adds an instance of `acme:ip:<component>:1.0` with the `rtl` view.
    pub fn instance(self, name: &str, component: &str) -> Self {
        self.instance_with(ComponentInstance::new(name, vlnv(component)))
    }

    /// Adds a prepared instance with the `rtl` view.
    pub fn instance_with(mut self, instance: ComponentInstance) -> Self {
        self.configuration = self
            .configuration
            .with_active_view(instance.instance_name.clone(), LEAF_VIEW);
        self.design.component_instances.push(instance);
        self
    }

    /// Adds configurable element values to the view configuration of `instance`.
    pub fn configure(mut self, instance: &str, values: &[(&str, &str)]) -> Self {
        let cevs = values
            .iter()
            .map(|(id, value)| ConfigurableElementValue::new(*id, *value));
        if let Some(vc) = self
            .configuration
            .view_configurations
            .iter_mut()
            .find(|vc| vc.instance_name == instance)
        {
            vc.configurable_element_values.extend(cevs);
        } else {
            self.configuration.view_configurations.push(ViewConfiguration {
                instance_name: instance.to_string(),
                view_ref: LEAF_VIEW.to_string(),
                configurable_element_values: cevs.collect(),
            });
        }
        self
    }

    /// Connects bus interfaces of instances; the first endpoint starts the
    /// interconnection.
    pub fn connect(mut self, name: &str, endpoints: &[(&str, &str)]) -> Self {
        let mut ends = endpoints
            .iter()
            .map(|(inst, bus)| ActiveInterface::new(*inst, *bus));
        let Some(start_interface) = ends.next() else {
            return self;
        };
        self.design.interconnections.push(Interconnection {
            name: name.to_string(),
            start_interface,
            active_interfaces: ends.collect(),
            hier_interfaces: Vec::new(),
        });
        self
    }

    /// Connects a bus interface of an instance to a bus interface of the top
    /// component.
    pub fn connect_hier(mut self, name: &str, endpoint: (&str, &str), top_bus: &str) -> Self {
        self.design.interconnections.push(Interconnection {
            name: name.to_string(),
            start_interface: ActiveInterface::new(endpoint.0, endpoint.1),
            active_interfaces: Vec::new(),
            hier_interfaces: vec![HierInterface {
                bus_ref: top_bus.to_string(),
            }],
        });
        self
    }

    /// Adds an ad-hoc connection.
    pub fn adhoc(mut self, connection: AdHocConnection) -> Self {
        self.design.ad_hoc_connections.push(connection);
        self
    }

    /// Adds a port to the top component.
    pub fn top_port(mut self, port: Port) -> Self {
        self.top.ports.push(port);
        self
    }

    /// Adds a bus interface to the top component.
    pub fn top_bus(mut self, bus: BusInterface) -> Self {
        self.top.bus_interfaces.push(bus);
        self
    }

    /// Adds a parameter to the top component.
    pub fn top_parameter(mut self, name: &str, id: &str, value: &str) -> Self {
        self.top
            .parameters
            .push(Parameter::new(name, value).with_id(id));
        self
    }

    /// Elaborates with default options.
    pub fn elaborate(&self) -> Elaboration<'_> {
        self.elaborate_with(ElaborateOptions::default())
    }

    /// Elaborates with the given options.
    pub fn elaborate_with(&self, options: ElaborateOptions) -> Elaboration<'_> {
        elaborate(
            &self.top,
            &self.top_view,
            &self.design,
            Some(&self.configuration),
            &self.library,
            options,
        )
    }

    /// Elaborates the design and every sub-design below it.
    pub fn elaborate_hierarchy(&self) -> Vec<DesignElaboration<'_>> {
        let top = TopDesign {
            component: &self.top,
            view: &self.top_view,
            design: &self.design,
            configuration: Some(&self.configuration),
        };
        elaborate_hierarchy(top, &self.library, ElaborateOptions::default())
    }
}

/// Returns the diagnostic codes of an elaboration, in emission order.
pub fn codes(elaboration: &Elaboration<'_>) -> Vec<DiagnosticCode> {
    elaboration.diagnostics.iter().map(|d| d.code).collect()
}

/// Returns the number of warnings of an elaboration.
pub fn warning_count(elaboration: &Elaboration<'_>) -> usize {
    elaboration.count(Severity::Warning)
}

/// An APB master with a 32-bit address and a write strobe.
pub fn apb_master(name: &str) -> Component {
    ComponentBuilder::new(name)
        .vector("m_paddr", Direction::Out, "31", "0")
        .port("m_pwrite", Direction::Out)
        .bus(
            "apb_m",
            InterfaceMode::Master,
            &[("PADDR", "m_paddr"), ("PWRITE", "m_pwrite")],
        )
        .build()
}

/// An APB slave with a parameterized address width.
pub fn apb_slave(name: &str) -> Component {
    ComponentBuilder::new(name)
        .parameter("ADDR_W", "addr_w", "12")
        .vector("s_paddr", Direction::In, "ADDR_W-1", "0")
        .port("s_pwrite", Direction::In)
        .bus(
            "apb_s",
            InterfaceMode::Slave,
            &[("PADDR", "s_paddr"), ("PWRITE", "s_pwrite")],
        )
        .build()
}
